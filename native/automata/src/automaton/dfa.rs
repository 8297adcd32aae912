//! Compiled deterministic finite automaton.

use crate::automaton::definition::{DfaDefinition, resolve_state};
use crate::automaton::labels::Labels;
use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::SymbolId;
use crate::error::{EngineError, EngineResult};
use indexmap::IndexMap;
use std::collections::VecDeque;

/// A DFA with interned labels and a dense `states x symbols` transition
/// table. Missing entries are `None`; the table need not be total.
#[derive(Debug, Clone)]
pub struct Dfa {
    states: Labels,
    alphabet: Labels,
    start_state: StateId,
    final_states: StateSet,
    /// Row-major: `table[state * num_symbols + symbol]`
    table: Vec<Option<StateId>>,
}

impl Dfa {
    /// Compile a definition, checking every label it references.
    pub fn from_definition(definition: &DfaDefinition) -> EngineResult<Self> {
        let skeleton = definition.compile_skeleton()?;
        let num_symbols = skeleton.alphabet.len();
        let mut table = vec![None; skeleton.states.len() * num_symbols];

        for (source, row) in &definition.transitions {
            let source = resolve_state(&skeleton.states, source)?;
            for (symbol, target) in row {
                let symbol = skeleton
                    .alphabet
                    .get(symbol)
                    .ok_or_else(|| EngineError::UnknownSymbol(symbol.clone()))?;
                let target = resolve_state(&skeleton.states, target)?;
                table[source as usize * num_symbols + symbol as usize] = Some(target);
            }
        }

        Ok(Self {
            states: skeleton.states,
            alphabet: skeleton.alphabet,
            start_state: skeleton.start_state,
            final_states: skeleton.final_states,
            table,
        })
    }

    /// Convert back to the wire form. Transitions are emitted in state and
    /// alphabet order.
    pub fn to_definition(&self) -> DfaDefinition {
        let mut transitions: IndexMap<String, IndexMap<String, String>> = IndexMap::new();
        for (src, sym, dst) in self.transitions() {
            transitions
                .entry(self.state_label(src).to_string())
                .or_default()
                .insert(
                    self.symbol_label(sym).to_string(),
                    self.state_label(dst).to_string(),
                );
        }

        DfaDefinition {
            alphabet: self.alphabet.iter().map(str::to_string).collect(),
            states: self.states.iter().map(str::to_string).collect(),
            initial_state: self.state_label(self.start_state).to_string(),
            accept_states: self
                .final_states
                .iter()
                .map(|s| self.state_label(s).to_string())
                .collect(),
            transitions,
        }
    }

    /// Get the transition from a state on a symbol.
    #[inline]
    pub fn transition(&self, source: StateId, symbol: SymbolId) -> Option<StateId> {
        self.table[source as usize * self.alphabet.len() + symbol as usize]
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

    pub fn is_final(&self, state: StateId) -> bool {
        self.final_states.contains(state)
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

    /// Get all defined transitions as an iterator, in state and symbol order.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, SymbolId, StateId)> + '_ {
        let num_symbols = self.alphabet.len().max(1);
        self.table.iter().enumerate().filter_map(move |(idx, dst)| {
            dst.map(|dst| {
                (
                    (idx / num_symbols) as StateId,
                    (idx % num_symbols) as SymbolId,
                    dst,
                )
            })
        })
    }

    /// Find all states reachable from the start state, breadth-first over
    /// the alphabet in declaration order.
    pub fn find_reachable_states(&self) -> StateSet {
        let mut reachable = StateSet::with_capacity(self.num_states());
        let mut queue = VecDeque::new();
        queue.push_back(self.start_state);

        while let Some(state) = queue.pop_front() {
            if reachable.contains(state) {
                continue;
            }
            reachable.insert(state);

            for symbol in 0..self.num_symbols() as SymbolId {
                if let Some(next) = self.transition(state, symbol) {
                    if !reachable.contains(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        reachable
    }

    /// Check if the DFA is empty (accepts no strings).
    pub fn is_empty(&self) -> bool {
        !self.find_reachable_states().intersects(&self.final_states)
    }
}
