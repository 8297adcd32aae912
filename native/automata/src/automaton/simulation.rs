//! Running input words against compiled automata.

use crate::automaton::definition::{DfaDefinition, NfaDefinition};
use crate::automaton::dfa::Dfa;
use crate::automaton::epsilon_nfa::EpsilonNfa;
use crate::error::{EngineError, EngineResult};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a simulation session. A synchronous run only ends in
/// `Completed` or `Failed`; the other variants belong to job layers that
/// queue or cancel runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Canceled,
}

/// Verdict of a run, serialized with the literals clients display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "ACEITA")]
    Accepted,
    #[serde(rename = "REJEITA")]
    Rejected,
    #[serde(rename = "PENDENTE")]
    Pending,
    #[serde(rename = "INVÁLIDA")]
    Invalid,
    #[serde(rename = "CANCELADA")]
    Canceled,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Accepted => "ACEITA",
            Verdict::Rejected => "REJEITA",
            Verdict::Pending => "PENDENTE",
            Verdict::Invalid => "INVÁLIDA",
            Verdict::Canceled => "CANCELADA",
        }
    }

    /// `ACEITA` and `REJEITA` are the only verdicts of a run that read the
    /// whole word.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Verdict::Accepted | Verdict::Rejected)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One consumed symbol of a DFA run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceStep {
    pub step_index: usize,
    pub from_state: String,
    pub symbol: String,
    pub to_state: String,
}

/// Result of running a word against a DFA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSession {
    pub input_word: String,
    pub current_state: String,
    /// Number of symbols consumed so far
    pub step_index: usize,
    pub status: SessionStatus,
    pub trace: Vec<TraceStep>,
    pub result: Verdict,
}

impl SimulationSession {
    fn running(input_word: &str, current_state: &str) -> Self {
        Self {
            input_word: input_word.to_string(),
            current_state: current_state.to_string(),
            step_index: 0,
            status: SessionStatus::Running,
            trace: Vec::new(),
            result: Verdict::Pending,
        }
    }

    fn finish(&mut self, status: SessionStatus, result: Verdict) {
        self.status = status;
        self.result = result;
    }

    pub fn is_accepted(&self) -> bool {
        self.result == Verdict::Accepted
    }
}

/// One consumed symbol of an NFA run, with the active sets around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfaTraceStep {
    pub step_index: usize,
    pub symbol: String,
    pub from_states: Vec<String>,
    pub to_states: Vec<String>,
}

/// Result of running a word against an NFA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfaRun {
    pub accepted: bool,
    pub trace: Vec<NfaTraceStep>,
}

impl Dfa {
    /// Run `word` one symbol at a time.
    ///
    /// An out-of-alphabet symbol or a missing transition ends the run as
    /// `failed`/`INVÁLIDA`; the trace holds only the steps taken.
    pub fn simulate(&self, word: &str) -> SimulationSession {
        let mut current = self.start_state();
        let mut session = SimulationSession::running(word, self.state_label(current));

        for (position, ch) in word.chars().enumerate() {
            let mut buf = [0u8; 4];
            let symbol_label: &str = ch.encode_utf8(&mut buf);

            let next = self
                .symbol_id(symbol_label)
                .and_then(|symbol| self.transition(current, symbol));
            let Some(next) = next else {
                debug!(
                    "DFA run of {word:?} stuck in {} at {position} on {symbol_label:?}",
                    self.state_label(current)
                );
                session.finish(SessionStatus::Failed, Verdict::Invalid);
                return session;
            };

            trace!(
                "step {position}: {} --{symbol_label}--> {}",
                self.state_label(current),
                self.state_label(next)
            );
            session.trace.push(TraceStep {
                step_index: position,
                from_state: self.state_label(current).to_string(),
                symbol: symbol_label.to_string(),
                to_state: self.state_label(next).to_string(),
            });
            current = next;
            session.current_state = self.state_label(current).to_string();
            session.step_index = position + 1;
        }

        let verdict = if self.is_final(current) {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        };
        session.finish(SessionStatus::Completed, verdict);
        session
    }
}

impl EpsilonNfa {
    /// Run `word` while tracking the set of active states.
    ///
    /// An empty active set rejects early. A symbol outside the alphabet is
    /// an input error rather than a rejection.
    pub fn simulate(&self, word: &str) -> EngineResult<NfaRun> {
        let mut active = self.initial_closure();
        let mut steps = Vec::new();

        for (position, ch) in word.chars().enumerate() {
            let mut buf = [0u8; 4];
            let symbol_label: &str = ch.encode_utf8(&mut buf);
            let symbol = self
                .symbol_id(symbol_label)
                .ok_or_else(|| EngineError::SymbolNotInAlphabet {
                    symbol: symbol_label.to_string(),
                    position,
                })?;

            let next = self.move_on_symbol(&active, symbol);
            steps.push(NfaTraceStep {
                step_index: position,
                symbol: symbol_label.to_string(),
                from_states: self.sorted_labels(&active),
                to_states: self.sorted_labels(&next),
            });

            if next.is_empty() {
                debug!("NFA run of {word:?} died at position {position}");
                return Ok(NfaRun {
                    accepted: false,
                    trace: steps,
                });
            }
            active = next;
        }

        Ok(NfaRun {
            accepted: active.intersects(self.final_states()),
            trace: steps,
        })
    }
}

/// Run `word` against the DFA described by `definition`.
///
/// Only structural defects of the definition are returned as errors.
pub fn simulate_dfa(definition: &DfaDefinition, word: &str) -> EngineResult<SimulationSession> {
    Ok(Dfa::from_definition(definition)?.simulate(word))
}

/// Run `word` against the NFA described by `definition`.
pub fn simulate_nfa(definition: &NfaDefinition, word: &str) -> EngineResult<NfaRun> {
    EpsilonNfa::from_definition(definition)?.simulate(word)
}
