//! Fixtures shared by the unit tests.

use crate::automaton::{DfaDefinition, NfaDefinition};

/// Every word over `alphabet` of length at most `max_len`, shortest first.
pub(crate) fn words(alphabet: &[&str], max_len: usize) -> Vec<String> {
    let mut all = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        frontier = frontier
            .iter()
            .flat_map(|prefix| alphabet.iter().map(move |s| format!("{prefix}{s}")))
            .collect();
        all.extend(frontier.iter().cloned());
    }
    all
}

/// Over `{a,b,c}`: accepts exactly the words whose only `c` is the last
/// symbol.
pub(crate) fn three_state_dfa() -> DfaDefinition {
    DfaDefinition::new(["a", "b", "c"], ["e1", "e2", "e3"], "e1", ["e2"])
        .with_transition("e1", "a", "e1")
        .with_transition("e1", "b", "e1")
        .with_transition("e1", "c", "e2")
        .with_transition("e2", "a", "e3")
        .with_transition("e2", "b", "e3")
        .with_transition("e2", "c", "e3")
        .with_transition("e3", "a", "e3")
        .with_transition("e3", "b", "e3")
        .with_transition("e3", "c", "e3")
}

/// `q0 -ε-> q1 -ε-> q2`, `q2 -a-> q2`, accepting `q2`.
pub(crate) fn epsilon_chain_nfa() -> NfaDefinition {
    NfaDefinition::new(["a"], ["q0", "q1", "q2"], "q0", ["q2"])
        .with_transition("q0", "ε", &["q1"])
        .with_transition("q1", "ε", &["q2"])
        .with_transition("q2", "a", &["q2"])
}

/// Words over `{a,b}` ending in `ab`.
pub(crate) fn ends_with_ab_nfa() -> NfaDefinition {
    NfaDefinition::new(["a", "b"], ["p", "q", "r"], "p", ["r"])
        .with_transition("p", "a", &["p", "q"])
        .with_transition("p", "b", &["p"])
        .with_transition("q", "b", &["r"])
}

/// Words over `{0,1}` whose third-to-last symbol is `1`, with ε-moves
/// sprinkled in.
pub(crate) fn third_from_last_nfa() -> NfaDefinition {
    NfaDefinition::new(["0", "1"], ["s", "t0", "t1", "t2", "t3"], "s", ["t3"])
        .with_transition("s", "ε", &["t0"])
        .with_transition("t0", "0", &["t0"])
        .with_transition("t0", "1", &["t0", "t1"])
        .with_transition("t1", "0", &["t2"])
        .with_transition("t1", "1", &["t2"])
        .with_transition("t2", "0", &["t3"])
        .with_transition("t2", "1", &["t3"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words() {
        let all = words(&["a", "b"], 2);
        assert_eq!(all, vec!["", "a", "b", "aa", "ab", "ba", "bb"]);
        assert_eq!(words(&["x"], 0), vec![""]);
    }
}
