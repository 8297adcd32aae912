//! Compiled non-deterministic finite automaton with ε-transitions.

use crate::automaton::definition::{NfaDefinition, resolve_state};
use crate::automaton::labels::Labels;
use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::{SymbolId, is_epsilon_label};
use crate::error::{EngineError, EngineResult};
use std::collections::VecDeque;

/// An ε-NFA with interned labels. Targets are stored per `(state, symbol)`
/// as bit sets; ε-targets are kept apart, one set per state.
#[derive(Debug, Clone)]
pub struct EpsilonNfa {
    states: Labels,
    alphabet: Labels,
    start_state: StateId,
    final_states: StateSet,
    /// Row-major: `transitions[state * num_symbols + symbol]`
    transitions: Vec<StateSet>,
    epsilon_transitions: Vec<StateSet>,
    /// Cached ε-closures for each state
    epsilon_closures: Option<Vec<StateSet>>,
}

impl EpsilonNfa {
    /// Compile a definition, checking every label it references.
    pub fn from_definition(definition: &NfaDefinition) -> EngineResult<Self> {
        let skeleton = definition.compile_skeleton()?;
        let num_states = skeleton.states.len();
        let num_symbols = skeleton.alphabet.len();
        let mut transitions = vec![StateSet::with_capacity(num_states); num_states * num_symbols];
        let mut epsilon_transitions = vec![StateSet::with_capacity(num_states); num_states];

        for (source, row) in &definition.transitions {
            let source = resolve_state(&skeleton.states, source)?;
            for (symbol, targets) in row {
                let slot = if is_epsilon_label(symbol) {
                    &mut epsilon_transitions[source as usize]
                } else {
                    let symbol = skeleton
                        .alphabet
                        .get(symbol)
                        .ok_or_else(|| EngineError::UnknownSymbol(symbol.clone()))?;
                    &mut transitions[source as usize * num_symbols + symbol as usize]
                };
                for target in targets {
                    slot.insert(resolve_state(&skeleton.states, target)?);
                }
            }
        }

        Ok(Self {
            states: skeleton.states,
            alphabet: skeleton.alphabet,
            start_state: skeleton.start_state,
            final_states: skeleton.final_states,
            transitions,
            epsilon_transitions,
            epsilon_closures: None,
        })
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_symbols(&self) -> usize {
        self.alphabet.len()
    }

    pub fn start_state(&self) -> StateId {
        self.start_state
    }

    pub fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    pub fn state_id(&self, label: &str) -> Option<StateId> {
        self.states.get(label)
    }

    pub fn state_label(&self, state: StateId) -> &str {
        self.states.label(state)
    }

    pub fn symbol_id(&self, label: &str) -> Option<SymbolId> {
        self.alphabet.get(label)
    }

    pub fn symbol_label(&self, symbol: SymbolId) -> &str {
        self.alphabet.label(symbol)
    }

    /// Alphabet labels in declaration order.
    pub fn alphabet(&self) -> impl Iterator<Item = &str> + '_ {
        self.alphabet.iter()
    }

    /// Targets of `state` on a real symbol, without closing over ε.
    pub fn targets(&self, state: StateId, symbol: SymbolId) -> &StateSet {
        &self.transitions[state as usize * self.alphabet.len() + symbol as usize]
    }

    /// Resolve labels into a state set.
    pub fn state_set<S: AsRef<str>>(&self, labels: &[S]) -> EngineResult<StateSet> {
        let mut set = StateSet::with_capacity(self.num_states());
        for label in labels {
            set.insert(resolve_state(&self.states, label.as_ref())?);
        }
        Ok(set)
    }

    /// Labels of a state set, sorted lexically.
    pub fn sorted_labels(&self, states: &StateSet) -> Vec<String> {
        let mut labels: Vec<String> = states
            .iter()
            .map(|s| self.state_label(s).to_string())
            .collect();
        labels.sort_unstable();
        labels
    }

    /// Worklist expansion over ε-edges until no new state is added.
    fn expand_epsilon(&self, states: &StateSet) -> StateSet {
        let mut closure = StateSet::with_capacity(self.num_states());
        let mut worklist: VecDeque<StateId> = states.iter().collect();

        while let Some(s) = worklist.pop_front() {
            if closure.contains(s) {
                continue;
            }
            closure.insert(s);

            for dest in self.epsilon_transitions[s as usize].iter() {
                if !closure.contains(dest) {
                    worklist.push_back(dest);
                }
            }
        }

        closure
    }

    /// Compute ε-closures for all states (cached).
    pub fn compute_epsilon_closures(&mut self) {
        if self.epsilon_closures.is_some() {
            return;
        }

        let closures: Vec<StateSet> = (0..self.num_states() as StateId)
            .map(|state| self.expand_epsilon(&StateSet::singleton(state, self.num_states())))
            .collect();
        self.epsilon_closures = Some(closures);
    }

    /// Get the ε-closure of a set of states.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        match &self.epsilon_closures {
            Some(cached) => {
                let mut closure = StateSet::with_capacity(self.num_states());
                for state in states.iter() {
                    closure.union_with(&cached[state as usize]);
                }
                closure
            }
            None => self.expand_epsilon(states),
        }
    }

    /// Get the states reachable from a set of states on a given symbol.
    /// Returns the ε-closure of the reached states.
    pub fn move_on_symbol(&self, states: &StateSet, symbol: SymbolId) -> StateSet {
        let mut reached = StateSet::with_capacity(self.num_states());

        for state in states.iter() {
            reached.union_with(self.targets(state, symbol));
        }

        self.epsilon_closure(&reached)
    }

    /// The active set before any input is read.
    pub fn initial_closure(&self) -> StateSet {
        self.epsilon_closure(&StateSet::singleton(self.start_state, self.num_states()))
    }

    /// Check if the NFA accepts no string at all.
    pub fn is_empty(&self) -> bool {
        let mut visited = self.initial_closure();
        let mut queue: VecDeque<StateId> = visited.iter().collect();

        while let Some(state) = queue.pop_front() {
            if self.final_states.contains(state) {
                return false;
            }

            for symbol in 0..self.num_symbols() as SymbolId {
                let closure = self.epsilon_closure(self.targets(state, symbol));
                for dest in closure.difference(&visited).iter() {
                    queue.push_back(dest);
                }
                visited.union_with(&closure);
            }
        }

        true
    }
}

/// ε-closure of the labelled states, sorted and deduplicated.
pub fn epsilon_closure<S: AsRef<str>>(
    definition: &NfaDefinition,
    states: &[S],
) -> EngineResult<Vec<String>> {
    let nfa = EpsilonNfa::from_definition(definition)?;
    let start = nfa.state_set(states)?;
    Ok(nfa.sorted_labels(&nfa.epsilon_closure(&start)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::epsilon_chain_nfa;

    #[test]
    fn test_epsilon_closure_single_edge() {
        let nfa = NfaDefinition::new(["a"], ["q0", "q1"], "q0", ["q1"])
            .with_transition("q0", "ε", &["q1"]);
        assert_eq!(epsilon_closure(&nfa, &["q0"]).unwrap(), vec!["q0", "q1"]);
        assert_eq!(epsilon_closure(&nfa, &["q1"]).unwrap(), vec!["q1"]);
    }

    #[test]
    fn test_epsilon_closure_without_epsilon_edges() {
        let nfa = NfaDefinition::new(["a"], ["z", "m", "b"], "z", ["b"])
            .with_transition("z", "a", &["m"])
            .with_transition("m", "a", &["b"]);
        assert_eq!(
            epsilon_closure(&nfa, &["z", "b", "z"]).unwrap(),
            vec!["b", "z"]
        );
        assert!(epsilon_closure(&nfa, &[] as &[&str]).unwrap().is_empty());
    }

    #[test]
    fn test_epsilon_closure_chain_and_cycle() {
        let definition = epsilon_chain_nfa().with_transition("q2", "ε", &["q0"]);
        assert_eq!(
            epsilon_closure(&definition, &["q1"]).unwrap(),
            vec!["q0", "q1", "q2"]
        );
    }

    #[test]
    fn test_cached_closures_match() {
        let mut nfa = EpsilonNfa::from_definition(&epsilon_chain_nfa()).unwrap();
        let start = nfa.state_set(&["q0"]).unwrap();
        let uncached = nfa.epsilon_closure(&start);
        nfa.compute_epsilon_closures();
        assert_eq!(nfa.epsilon_closure(&start), uncached);
        assert_eq!(uncached.len(), 3);
    }

    #[test]
    fn test_unknown_state_in_closure_request() {
        let nfa = epsilon_chain_nfa();
        assert_eq!(
            epsilon_closure(&nfa, &["nope"]).unwrap_err(),
            EngineError::UnknownState("nope".to_string())
        );
    }

    #[test]
    fn test_move_on_symbol() {
        // 0 -a-> 1, 0 -a-> 2, 1 -ε-> 3
        let definition = NfaDefinition::new(["a"], ["0", "1", "2", "3"], "0", ["3"])
            .with_transition("0", "a", &["1", "2"])
            .with_transition("1", "", &["3"]);
        let nfa = EpsilonNfa::from_definition(&definition).unwrap();

        let reached = nfa.move_on_symbol(&nfa.initial_closure(), 0);
        assert_eq!(nfa.sorted_labels(&reached), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_unknown_symbol_key() {
        let definition = NfaDefinition::new(["a"], ["q0"], "q0", ["q0"])
            .with_transition("q0", "b", &["q0"]);
        assert_eq!(
            EpsilonNfa::from_definition(&definition).unwrap_err(),
            EngineError::UnknownSymbol("b".to_string())
        );
    }

    #[test]
    fn test_empty_nfa() {
        let definition = NfaDefinition::new(["a"], ["0", "1"], "0", ["1"]);
        // No transitions - no path from 0 to 1
        assert!(EpsilonNfa::from_definition(&definition).unwrap().is_empty());

        let definition = definition.with_transition("0", "a", &["1"]);
        assert!(!EpsilonNfa::from_definition(&definition).unwrap().is_empty());
    }
}
