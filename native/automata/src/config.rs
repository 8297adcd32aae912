//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Limits applied by the engine operations that can grow their output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Maximum DFA states produced by subset construction (0 = unlimited)
    pub max_dfa_states: usize,
}

impl EngineConfig {
    /// Configuration without any limit.
    pub fn unlimited() -> Self {
        Self { max_dfa_states: 0 }
    }

    /// Check whether `states` DFA states are still within the limit.
    pub fn allows_dfa_states(&self, states: usize) -> bool {
        self.max_dfa_states == 0 || states <= self.max_dfa_states
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_dfa_states: 10_000,
        }
    }
}
