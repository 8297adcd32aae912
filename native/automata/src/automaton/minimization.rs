//! DFA minimization: reachability pruning followed by Moore-style
//! partition refinement.

use crate::automaton::definition::DfaDefinition;
use crate::automaton::dfa::Dfa;
use crate::automaton::state::StateId;
use crate::automaton::symbol::SymbolId;
use crate::error::{EngineError, EngineResult};
use indexmap::IndexMap;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the minimizer found out about a DFA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimizationResult {
    /// Reachable states, in declaration order
    pub reachable_states: Vec<String>,
    /// Unreachable states, in declaration order
    pub removed_unreachable: Vec<String>,
    /// Equivalence classes, each sorted, ordered by representative
    pub partitions: Vec<Vec<String>>,
    /// Reachable state -> label of its class representative
    pub state_map: IndexMap<String, String>,
    /// Classes with more than one member
    pub merged_states: Vec<Vec<String>>,
    pub minimized: DfaDefinition,
}

/// Destination block of every symbol, in alphabet order. `None` stands for
/// "no move", which only partial tables produce.
type Fingerprint = Vec<Option<usize>>;

impl Dfa {
    /// Minimize the DFA. The input is left untouched.
    pub fn minimize(&self) -> EngineResult<MinimizationResult> {
        let reachable = self.find_reachable_states();
        let all_states = 0..self.num_states() as StateId;
        let reachable_ids: Vec<StateId> = all_states
            .clone()
            .filter(|&s| reachable.contains(s))
            .collect();
        let removed_ids: Vec<StateId> = all_states.filter(|&s| !reachable.contains(s)).collect();
        if !removed_ids.is_empty() {
            debug!(
                "removing {} unreachable states: {:?}",
                removed_ids.len(),
                self.labels_of(&removed_ids)
            );
        }

        let partitions = self.refine_partitions(&reachable_ids)?;
        self.build_minimized_dfa(&reachable_ids, &removed_ids, &partitions)
    }

    fn labels_of(&self, states: &[StateId]) -> Vec<String> {
        states
            .iter()
            .map(|&s| self.state_label(s).to_string())
            .collect()
    }

    /// Sort members by label, then blocks by their first member. Block ids
    /// are positions in this order, which keeps fingerprints independent of
    /// table layout.
    fn canonicalize(&self, blocks: &mut [Vec<StateId>]) {
        for block in blocks.iter_mut() {
            block.sort_unstable_by(|&a, &b| self.state_label(a).cmp(self.state_label(b)));
        }
        blocks.sort_unstable_by(|a, b| self.state_label(a[0]).cmp(self.state_label(b[0])));
    }

    /// Split blocks until no block contains two states whose moves land in
    /// different blocks.
    fn refine_partitions(&self, reachable_ids: &[StateId]) -> EngineResult<Vec<Vec<StateId>>> {
        let (accepting, rejecting): (Vec<StateId>, Vec<StateId>) =
            reachable_ids.iter().partition(|&&s| self.is_final(s));
        let mut blocks: Vec<Vec<StateId>> = [accepting, rejecting]
            .into_iter()
            .filter(|block| !block.is_empty())
            .collect();
        self.canonicalize(&mut blocks);

        let max_rounds = reachable_ids.len() + 1;
        for round in 1..=max_rounds {
            let mut block_of: Vec<Option<usize>> = vec![None; self.num_states()];
            for (idx, block) in blocks.iter().enumerate() {
                for &state in block {
                    block_of[state as usize] = Some(idx);
                }
            }

            let mut next_blocks = Vec::with_capacity(blocks.len());
            for block in &blocks {
                let mut groups: BTreeMap<Fingerprint, Vec<StateId>> = BTreeMap::new();
                for &state in block {
                    let fingerprint = (0..self.num_symbols() as SymbolId)
                        .map(|symbol| {
                            self.transition(state, symbol)
                                .and_then(|dest| block_of[dest as usize])
                        })
                        .collect();
                    groups.entry(fingerprint).or_default().push(state);
                }
                next_blocks.extend(groups.into_values());
            }
            self.canonicalize(&mut next_blocks);

            trace!(
                "refinement round {round}: {:?}",
                next_blocks
                    .iter()
                    .map(|block| self.labels_of(block))
                    .collect::<Vec<_>>()
            );

            let stable = next_blocks.len() == blocks.len();
            blocks = next_blocks;
            if stable {
                return Ok(blocks);
            }
        }

        Err(EngineError::InvariantViolation(format!(
            "partition refinement did not stabilize within {max_rounds} rounds"
        )))
    }

    /// Build a minimized DFA from partitions.
    fn build_minimized_dfa(
        &self,
        reachable_ids: &[StateId],
        removed_ids: &[StateId],
        partitions: &[Vec<StateId>],
    ) -> EngineResult<MinimizationResult> {
        // Map old states to their partition (new state)
        let mut block_of: Vec<Option<usize>> = vec![None; self.num_states()];
        for (idx, block) in partitions.iter().enumerate() {
            for &state in block {
                block_of[state as usize] = Some(idx);
            }
            let accepting = self.is_final(block[0]);
            if block.iter().any(|&s| self.is_final(s) != accepting) {
                return Err(EngineError::InvariantViolation(format!(
                    "block {:?} mixes accepting and non-accepting states",
                    self.labels_of(block)
                )));
            }
        }

        let representative = |idx: usize| self.state_label(partitions[idx][0]).to_string();
        let block_of_state = |state: StateId| {
            block_of[state as usize].ok_or_else(|| {
                EngineError::InvariantViolation(format!(
                    "reachable state {} has no block",
                    self.state_label(state)
                ))
            })
        };

        let mut state_map = IndexMap::with_capacity(reachable_ids.len());
        for &state in reachable_ids {
            let block = block_of_state(state)?;
            state_map.insert(self.state_label(state).to_string(), representative(block));
        }

        let mut transitions: IndexMap<String, IndexMap<String, String>> = IndexMap::new();
        for (idx, block) in partitions.iter().enumerate() {
            // Every member moves alike, so the representative speaks for the block.
            let moves: IndexMap<String, String> = (0..self.num_symbols() as SymbolId)
                .filter_map(|symbol| {
                    let dest = self.transition(block[0], symbol)?;
                    let dest_block = block_of[dest as usize]?;
                    Some((
                        self.symbol_label(symbol).to_string(),
                        representative(dest_block),
                    ))
                })
                .collect();
            if !moves.is_empty() {
                transitions.insert(representative(idx), moves);
            }
        }

        let minimized = DfaDefinition {
            alphabet: self.alphabet().map(str::to_string).collect(),
            states: (0..partitions.len()).map(representative).collect(),
            initial_state: representative(block_of_state(self.start_state())?),
            accept_states: (0..partitions.len())
                .filter(|&idx| self.is_final(partitions[idx][0]))
                .map(representative)
                .collect(),
            transitions,
        };

        let partitions: Vec<Vec<String>> = partitions
            .iter()
            .map(|block| self.labels_of(block))
            .collect();
        let merged_states = partitions
            .iter()
            .filter(|block| block.len() > 1)
            .cloned()
            .collect();
        debug!(
            "minimized {} reachable states into {} classes",
            reachable_ids.len(),
            partitions.len()
        );

        Ok(MinimizationResult {
            reachable_states: self.labels_of(reachable_ids),
            removed_unreachable: self.labels_of(removed_ids),
            partitions,
            state_map,
            merged_states,
            minimized,
        })
    }
}

/// Minimize the DFA described by `definition`.
pub fn minimize_dfa(definition: &DfaDefinition) -> EngineResult<MinimizationResult> {
    Dfa::from_definition(definition)?.minimize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::simulation::simulate_dfa;
    use crate::automaton::subset_construction::convert_nfa_to_dfa;
    use crate::testing::{third_from_last_nfa, three_state_dfa, words};

    /// A, B, C reachable and pairwise distinguishable; D unreachable.
    fn dfa_with_unreachable() -> DfaDefinition {
        DfaDefinition::new(["0", "1"], ["A", "B", "C", "D"], "A", ["B"])
            .with_transition("A", "0", "B")
            .with_transition("A", "1", "C")
            .with_transition("B", "0", "B")
            .with_transition("B", "1", "C")
            .with_transition("C", "0", "C")
            .with_transition("C", "1", "C")
            .with_transition("D", "0", "A")
            .with_transition("D", "1", "D")
    }

    /// Textbook example where A and C are equivalent.
    fn textbook_dfa() -> DfaDefinition {
        DfaDefinition::new(["a", "b"], ["A", "B", "C", "D", "E"], "A", ["E"])
            .with_transition("A", "a", "B")
            .with_transition("A", "b", "C")
            .with_transition("B", "a", "B")
            .with_transition("B", "b", "D")
            .with_transition("C", "a", "B")
            .with_transition("C", "b", "C")
            .with_transition("D", "a", "B")
            .with_transition("D", "b", "E")
            .with_transition("E", "a", "B")
            .with_transition("E", "b", "C")
    }

    fn assert_same_language(
        original: &DfaDefinition,
        minimized: &DfaDefinition,
        alphabet: &[&str],
    ) {
        for word in words(alphabet, 6) {
            assert_eq!(
                simulate_dfa(original, &word).unwrap().result,
                simulate_dfa(minimized, &word).unwrap().result,
                "disagreement on {word:?}"
            );
        }
    }

    #[test]
    fn test_removes_unreachable() {
        let result = minimize_dfa(&dfa_with_unreachable()).unwrap();
        assert_eq!(result.removed_unreachable, vec!["D"]);
        assert_eq!(result.reachable_states, vec!["A", "B", "C"]);
        assert_eq!(result.minimized.states.len(), 3);
        assert!(result.merged_states.is_empty());
        assert!(!result.state_map.contains_key("D"));
    }

    #[test]
    fn test_merges_equivalent_states() {
        let result = minimize_dfa(&textbook_dfa()).unwrap();
        assert!(result.removed_unreachable.is_empty());
        assert_eq!(
            result.partitions,
            vec![vec!["A", "C"], vec!["B"], vec!["D"], vec!["E"]]
        );
        assert_eq!(result.merged_states, vec![vec!["A", "C"]]);
        assert_eq!(result.state_map["C"], "A");
        assert_eq!(result.state_map["B"], "B");

        let minimized = &result.minimized;
        assert_eq!(minimized.states, vec!["A", "B", "D", "E"]);
        assert_eq!(minimized.initial_state, "A");
        assert_eq!(minimized.accept_states, vec!["E"]);
        assert_eq!(minimized.transitions["A"]["b"], "A");
        assert_eq!(minimized.transitions["E"]["b"], "A");
    }

    #[test]
    fn test_minimization_preserves_language() {
        let definition = textbook_dfa();
        let result = minimize_dfa(&definition).unwrap();
        assert_same_language(&definition, &result.minimized, &["a", "b"]);

        let definition = three_state_dfa();
        let result = minimize_dfa(&definition).unwrap();
        assert_eq!(result.minimized.states.len(), 3);
        assert_same_language(&definition, &result.minimized, &["a", "b", "c", "x"]);
    }

    #[test]
    fn test_minimize_converted_dfa() {
        let converted = convert_nfa_to_dfa(&third_from_last_nfa()).unwrap();
        assert_eq!(converted.dfa.states.len(), 9);

        let result = minimize_dfa(&converted.dfa).unwrap();
        // The initial subset {s,t0} behaves exactly like {t0}.
        assert_eq!(result.minimized.states.len(), 8);
        assert_eq!(result.merged_states.len(), 1);
        assert_same_language(&converted.dfa, &result.minimized, &["0", "1"]);
    }

    #[test]
    fn test_partial_dfa() {
        // q1 and q2 are both accepting but only q1 has a move.
        let definition = DfaDefinition::new(["a"], ["q0", "q1", "q2"], "q0", ["q1", "q2"])
            .with_transition("q0", "a", "q1")
            .with_transition("q1", "a", "q2");
        let result = minimize_dfa(&definition).unwrap();
        assert_eq!(result.partitions.len(), 3);
        assert!(!result.minimized.transitions.contains_key("q2"));
        assert_same_language(&definition, &result.minimized, &["a"]);
    }

    #[test]
    fn test_single_state() {
        let definition = DfaDefinition::new(["a"], ["only"], "only", Vec::<String>::new())
            .with_transition("only", "a", "only");
        let result = minimize_dfa(&definition).unwrap();
        assert_eq!(result.partitions, vec![vec!["only"]]);
        assert!(result.minimized.accept_states.is_empty());
    }

    #[test]
    fn test_result_is_reproducible() {
        let definition = textbook_dfa();
        let mut reordered = definition.clone();
        reordered.states.reverse();
        reordered.transitions.reverse();

        let a = minimize_dfa(&definition).unwrap();
        let b = minimize_dfa(&reordered).unwrap();
        assert_eq!(a.partitions, b.partitions);
        assert_eq!(a.minimized.states, b.minimized.states);
        assert_eq!(a.minimized.transitions, b.minimized.transitions);
    }

    #[test]
    fn test_result_wire_shape() {
        let result = minimize_dfa(&dfa_with_unreachable()).unwrap();
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["removedUnreachable"][0], "D");
        assert!(json["reachableStates"].is_array());
        assert!(json["stateMap"].is_object());
        assert!(json["mergedStates"].is_array());
        assert_eq!(json["minimized"]["initialState"], "A");
    }
}
