//! Symbol types for automata transitions.

/// Index of an alphabet symbol inside a compiled automaton.
pub type SymbolId = u32;

/// Label of the empty-string pseudo-symbol in NFA transition tables.
pub const EPSILON_LABEL: &str = "ε";

/// Check if a transition-table key denotes an ε-transition.
///
/// The empty string is accepted as an alias since it can never be a real
/// input symbol.
#[inline]
pub fn is_epsilon_label(label: &str) -> bool {
    label == EPSILON_LABEL || label.is_empty()
}
