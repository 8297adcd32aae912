//! Finite-automaton engine for the course backend.
//!
//! Request handlers decode and validate automaton definitions, then call the
//! pure functions re-exported here. Nothing is kept between calls.

pub mod automaton;
pub mod config;
pub mod error;

#[cfg(test)]
mod testing;

pub use automaton::{
    ConversionResult, Dfa, DfaDefinition, EpsilonNfa, MinimizationResult, NfaDefinition, NfaRun,
    SessionStatus, SimulationSession, TraceStep, Verdict, convert_nfa_to_dfa,
    convert_nfa_to_dfa_with_config, epsilon_closure, minimize_dfa, simulate_dfa, simulate_nfa,
};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn automata_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    automaton::automaton(m)
}
