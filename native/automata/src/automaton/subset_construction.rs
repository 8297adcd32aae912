//! Subset construction algorithm for converting an ε-NFA to a DFA.

use crate::automaton::definition::{DfaDefinition, NfaDefinition};
use crate::automaton::epsilon_nfa::EpsilonNfa;
use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::SymbolId;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Key used for the empty subset.
pub const EMPTY_SUBSET_KEY: &str = "∅";

/// The DFA produced from an NFA, with the subsets behind its states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub dfa: DfaDefinition,
    /// DFA state name -> NFA states it stands for, sorted
    pub subset_map: IndexMap<String, Vec<String>>,
    /// Canonical subset key -> DFA state name
    pub subset_key_map: IndexMap<String, String>,
}

/// Canonical key of a subset: sorted labels joined by commas.
pub fn subset_key(labels: &[String]) -> String {
    if labels.is_empty() {
        EMPTY_SUBSET_KEY.to_string()
    } else {
        labels.join(",")
    }
}

fn dfa_state_name(idx: usize) -> String {
    format!("S{idx}")
}

/// Convert an ε-NFA to a DFA using the powerset construction algorithm.
///
/// Returns the discovered subsets in discovery order together with the
/// transition table over them. Every symbol has a move from every subset,
/// the empty subset included, so the result is total.
pub fn subset_construction(
    nfa: &EpsilonNfa,
    config: &EngineConfig,
) -> EngineResult<(IndexSet<StateSet>, Vec<Vec<StateId>>)> {
    let mut subsets: IndexSet<StateSet> = IndexSet::new();
    let mut table: Vec<Vec<StateId>> = Vec::new();
    let mut worklist: VecDeque<StateId> = VecDeque::new();

    let (initial, _) = subsets.insert_full(nfa.initial_closure());
    worklist.push_back(initial as StateId);

    while let Some(current) = worklist.pop_front() {
        let current_set = subsets
            .get_index(current as usize)
            .cloned()
            .ok_or_else(|| {
                EngineError::InvariantViolation(format!("subset {current} was never recorded"))
            })?;

        let mut row = Vec::with_capacity(nfa.num_symbols());
        for symbol in 0..nfa.num_symbols() as SymbolId {
            let next_set = nfa.move_on_symbol(&current_set, symbol);
            let (next, inserted) = subsets.insert_full(next_set);
            if inserted {
                if !config.allows_dfa_states(subsets.len()) {
                    return Err(EngineError::StateLimitExceeded {
                        states: subsets.len(),
                        max: config.max_dfa_states,
                    });
                }
                trace!("discovered subset S{next}: {:?}", subsets[next]);
                worklist.push_back(next as StateId);
            }
            row.push(next as StateId);
        }

        if table.len() != current as usize {
            return Err(EngineError::InvariantViolation(format!(
                "subset {current} expanded out of discovery order"
            )));
        }
        table.push(row);
    }

    Ok((subsets, table))
}

/// Convert an NFA definition into an equivalent DFA definition with the
/// default [`EngineConfig`].
pub fn convert_nfa_to_dfa(definition: &NfaDefinition) -> EngineResult<ConversionResult> {
    convert_nfa_to_dfa_with_config(definition, &EngineConfig::default())
}

/// Convert an NFA definition into an equivalent DFA definition.
pub fn convert_nfa_to_dfa_with_config(
    definition: &NfaDefinition,
    config: &EngineConfig,
) -> EngineResult<ConversionResult> {
    let mut nfa = EpsilonNfa::from_definition(definition)?;
    nfa.compute_epsilon_closures();

    let (subsets, table) = subset_construction(&nfa, config)?;
    debug!(
        "subset construction: {} NFA states -> {} DFA states",
        nfa.num_states(),
        subsets.len()
    );

    let alphabet: Vec<String> = nfa.alphabet().map(str::to_string).collect();
    let names: Vec<String> = (0..subsets.len()).map(dfa_state_name).collect();
    let mut subset_map = IndexMap::with_capacity(subsets.len());
    let mut subset_key_map = IndexMap::with_capacity(subsets.len());
    let mut accept_states = Vec::new();
    let mut transitions = IndexMap::with_capacity(subsets.len());

    for ((set, row), name) in subsets.iter().zip(&table).zip(&names) {
        let members = nfa.sorted_labels(set);
        subset_key_map.insert(subset_key(&members), name.clone());
        subset_map.insert(name.clone(), members);

        if set.intersects(nfa.final_states()) {
            accept_states.push(name.clone());
        }

        let moves: IndexMap<String, String> = alphabet
            .iter()
            .zip(row)
            .map(|(symbol, &target)| (symbol.clone(), names[target as usize].clone()))
            .collect();
        transitions.insert(name.clone(), moves);
    }

    let dfa = DfaDefinition {
        alphabet,
        initial_state: names[0].clone(),
        states: names,
        accept_states,
        transitions,
    };

    Ok(ConversionResult {
        dfa,
        subset_map,
        subset_key_map,
    })
}
