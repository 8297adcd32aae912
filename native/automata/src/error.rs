//! Errors reported by the automaton engine.

use thiserror::Error;

/// Errors that can occur while compiling or running an automaton.
///
/// Rejection of a word is never an error: a DFA run that reads an unknown
/// symbol ends in a `failed` session instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("automaton declares no states")]
    NoStates,

    #[error("initial state `{0}` is not a declared state")]
    UnknownInitialState(String),

    #[error("state `{0}` is not a declared state")]
    UnknownState(String),

    #[error("transition symbol `{0}` is not in the alphabet")]
    UnknownSymbol(String),

    #[error("the empty-string symbol cannot be part of the alphabet")]
    EpsilonInAlphabet,

    #[error("input symbol `{symbol}` at position {position} is not in the alphabet")]
    SymbolNotInAlphabet { symbol: String, position: usize },

    #[error("DFA state limit exceeded: {states} states (max: {max})")]
    StateLimitExceeded { states: usize, max: usize },

    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::SymbolNotInAlphabet {
            symbol: "d".to_string(),
            position: 2,
        };
        assert_eq!(
            err.to_string(),
            "input symbol `d` at position 2 is not in the alphabet"
        );

        let err = EngineError::StateLimitExceeded {
            states: 11,
            max: 10,
        };
        assert!(err.to_string().contains("max: 10"));
    }
}
