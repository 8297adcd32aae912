//! Finite-automaton engine.
//!
//! This module provides compiled DFA and ε-NFA representations with:
//! - Step-traced DFA simulation and set-tracking NFA simulation
//! - Epsilon closure computation
//! - Subset construction (NFA to DFA conversion)
//! - Moore-style DFA minimization
//! - PyO3 bindings for Python interoperability (feature `python`)

mod definition;
mod dfa;
mod epsilon_nfa;
mod labels;
mod minimization;
#[cfg(feature = "python")]
mod python_bindings;
mod simulation;
mod state;
mod subset_construction;
mod symbol;

pub use definition::{AutomatonDefinition, DfaDefinition, NfaDefinition};
pub use dfa::Dfa;
pub use epsilon_nfa::{EpsilonNfa, epsilon_closure};
pub use labels::Labels;
pub use minimization::{MinimizationResult, minimize_dfa};
#[cfg(feature = "python")]
pub use python_bindings::automaton;
pub use simulation::{
    NfaRun, NfaTraceStep, SessionStatus, SimulationSession, TraceStep, Verdict, simulate_dfa,
    simulate_nfa,
};
pub use state::{StateId, StateSet};
pub use subset_construction::{
    ConversionResult, EMPTY_SUBSET_KEY, convert_nfa_to_dfa, convert_nfa_to_dfa_with_config,
    subset_construction, subset_key,
};
pub use symbol::{EPSILON_LABEL, SymbolId, is_epsilon_label};
