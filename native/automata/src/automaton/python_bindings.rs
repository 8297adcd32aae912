//! PyO3 bindings for the automaton module.
//!
//! Definitions and results cross the boundary as JSON strings, the same
//! shape request handlers exchange with clients.

use crate::automaton::definition::{DfaDefinition, NfaDefinition};
use crate::automaton::dfa::Dfa;
use crate::automaton::{epsilon_nfa, minimization, simulation, subset_construction};
use crate::config::EngineConfig;
use crate::error::EngineError;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

impl From<EngineError> for PyErr {
    fn from(err: EngineError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

fn parse<T: DeserializeOwned>(json: &str) -> PyResult<T> {
    serde_json::from_str(json)
        .map_err(|e| PyValueError::new_err(format!("Invalid automaton definition: {e}")))
}

fn dump<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Run a word against a DFA definition; returns the session as JSON.
#[pyfunction]
fn simulate_dfa(definition: &str, word: &str) -> PyResult<String> {
    let definition: DfaDefinition = parse(definition)?;
    dump(&simulation::simulate_dfa(&definition, word)?)
}

/// Run a word against an NFA definition; returns `{accepted, trace}` as JSON.
#[pyfunction]
fn simulate_nfa(definition: &str, word: &str) -> PyResult<String> {
    let definition: NfaDefinition = parse(definition)?;
    dump(&simulation::simulate_nfa(&definition, word)?)
}

#[pyfunction]
fn epsilon_closure(definition: &str, states: Vec<String>) -> PyResult<Vec<String>> {
    let definition: NfaDefinition = parse(definition)?;
    Ok(epsilon_nfa::epsilon_closure(&definition, &states)?)
}

#[pyfunction]
#[pyo3(signature = (definition, max_dfa_states=None))]
fn convert_nfa_to_dfa(definition: &str, max_dfa_states: Option<usize>) -> PyResult<String> {
    let definition: NfaDefinition = parse(definition)?;
    let mut config = EngineConfig::default();
    if let Some(max_dfa_states) = max_dfa_states {
        config.max_dfa_states = max_dfa_states;
    }
    let result = subset_construction::convert_nfa_to_dfa_with_config(&definition, &config)?;
    dump(&result)
}

#[pyfunction]
fn minimize_dfa(definition: &str) -> PyResult<String> {
    let definition: DfaDefinition = parse(definition)?;
    dump(&minimization::minimize_dfa(&definition)?)
}

/// A compiled DFA, for running many words without re-reading the definition.
#[pyclass(name = "DFA", module = "automata_engine.automaton", frozen)]
pub struct PyDfa {
    dfa: Dfa,
}

#[pymethods]
impl PyDfa {
    #[new]
    fn new(definition: &str) -> PyResult<Self> {
        let definition: DfaDefinition = parse(definition)?;
        Ok(Self {
            dfa: Dfa::from_definition(&definition)?,
        })
    }

    #[getter]
    fn num_states(&self) -> usize {
        self.dfa.num_states()
    }

    fn simulate(&self, word: &str) -> PyResult<String> {
        dump(&self.dfa.simulate(word))
    }

    fn accepts(&self, word: &str) -> bool {
        self.dfa.simulate(word).is_accepted()
    }

    /// Check if the DFA's language is empty.
    fn is_empty(&self) -> bool {
        self.dfa.is_empty()
    }

    fn minimize(&self) -> PyResult<String> {
        dump(&self.dfa.minimize()?)
    }

    fn to_json(&self) -> PyResult<String> {
        dump(&self.dfa.to_definition())
    }
}

/// Register the automaton functions and classes.
pub fn automaton(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(simulate_dfa, m)?)?;
    m.add_function(wrap_pyfunction!(simulate_nfa, m)?)?;
    m.add_function(wrap_pyfunction!(epsilon_closure, m)?)?;
    m.add_function(wrap_pyfunction!(convert_nfa_to_dfa, m)?)?;
    m.add_function(wrap_pyfunction!(minimize_dfa, m)?)?;
    m.add_class::<PyDfa>()?;
    Ok(())
}
