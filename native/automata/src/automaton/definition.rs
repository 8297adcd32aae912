//! Wire-level automaton definitions.
//!
//! These are the already-validated objects handed to the engine by request
//! handlers. They keep string labels; the compiled forms in [`super::dfa`]
//! and [`super::epsilon_nfa`] intern them to dense indices.

use crate::automaton::labels::Labels;
use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::is_epsilon_label;
use crate::error::{EngineError, EngineResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Shared shape of DFA and NFA definitions. `T` is the transition target:
/// a single state for a DFA, a list of states for an NFA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomatonDefinition<T> {
    pub alphabet: Vec<String>,
    pub states: Vec<String>,
    pub initial_state: String,
    pub accept_states: Vec<String>,
    #[serde(default)]
    pub transitions: IndexMap<String, IndexMap<String, T>>,
}

/// `transitions[state][symbol] = state`
pub type DfaDefinition = AutomatonDefinition<String>;

/// `transitions[state][symbol or ε] = [states]`
pub type NfaDefinition = AutomatonDefinition<Vec<String>>;

impl<T> AutomatonDefinition<T> {
    /// Create a definition without transitions.
    pub fn new<A, S, F>(alphabet: A, states: S, initial_state: &str, accept_states: F) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            alphabet: alphabet.into_iter().map(Into::into).collect(),
            states: states.into_iter().map(Into::into).collect(),
            initial_state: initial_state.to_string(),
            accept_states: accept_states.into_iter().map(Into::into).collect(),
            transitions: IndexMap::new(),
        }
    }

    /// Intern states and symbols and resolve the initial and accept states.
    pub(crate) fn compile_skeleton(&self) -> EngineResult<Skeleton> {
        if self.states.is_empty() {
            return Err(EngineError::NoStates);
        }

        let states: Labels = self.states.iter().map(String::as_str).collect();
        if let Some(symbol) = self.alphabet.iter().find(|s| is_epsilon_label(s)) {
            log::debug!("rejecting alphabet containing ε label {symbol:?}");
            return Err(EngineError::EpsilonInAlphabet);
        }
        let alphabet: Labels = self.alphabet.iter().map(String::as_str).collect();

        let start_state = states
            .get(&self.initial_state)
            .ok_or_else(|| EngineError::UnknownInitialState(self.initial_state.clone()))?;

        let mut final_states = StateSet::with_capacity(states.len());
        for label in &self.accept_states {
            final_states.insert(resolve_state(&states, label)?);
        }

        for source in self.transitions.keys() {
            resolve_state(&states, source)?;
        }

        Ok(Skeleton {
            states,
            alphabet,
            start_state,
            final_states,
        })
    }
}

impl DfaDefinition {
    /// Add or replace the transition `from --symbol--> to`.
    pub fn with_transition(mut self, from: &str, symbol: &str, to: &str) -> Self {
        self.transitions
            .entry(from.to_string())
            .or_default()
            .insert(symbol.to_string(), to.to_string());
        self
    }
}

impl NfaDefinition {
    /// Add targets to the transition `from --symbol--> {to...}`.
    pub fn with_transition(mut self, from: &str, symbol: &str, to: &[&str]) -> Self {
        self.transitions
            .entry(from.to_string())
            .or_default()
            .entry(symbol.to_string())
            .or_default()
            .extend(to.iter().map(|s| s.to_string()));
        self
    }
}

/// The parts shared by every compiled automaton.
#[derive(Debug, Clone)]
pub(crate) struct Skeleton {
    pub states: Labels,
    pub alphabet: Labels,
    pub start_state: StateId,
    pub final_states: StateSet,
}

pub(crate) fn resolve_state(states: &Labels, label: &str) -> EngineResult<StateId> {
    states
        .get(label)
        .ok_or_else(|| EngineError::UnknownState(label.to_string()))
}
