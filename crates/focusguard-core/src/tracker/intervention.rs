//! Terminal intervention gate.
//!
//! Opened exactly once per session by the escalation policy, closed exactly
//! once by the UI collaborator with one of two choices. There is no
//! timeout: the session stays terminated until the external choice arrives,
//! and nothing resumes afterwards.

use serde::{Deserialize, Serialize};

use crate::error::InterventionError;

/// The two terminal options offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionChoice {
    TakeBreak,
    AcceptChallenge,
}

/// Handoff contract produced by resolving the gate.
///
/// The break collaborator runs the countdown itself; the challenge outcome
/// is selected by the wheel and is opaque to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterventionOutcome {
    Break { duration_ticks: u32 },
    Challenge,
}

/// Fixed break length: 300 ticks of one second.
pub const DEFAULT_BREAK_DURATION_TICKS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum GateState {
    Closed,
    Pending,
    Resolved(InterventionChoice),
}

/// One-shot, non-reentrant choice point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionGate {
    state: GateState,
    break_duration_ticks: u32,
}

impl Default for InterventionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl InterventionGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Closed,
            break_duration_ticks: DEFAULT_BREAK_DURATION_TICKS,
        }
    }

    pub fn with_break_duration(break_duration_ticks: u32) -> Self {
        Self {
            state: GateState::Closed,
            break_duration_ticks,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == GateState::Pending
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, GateState::Resolved(_))
    }

    /// Open the gate. The escalation policy's quota latch guarantees this
    /// happens at most once per session; a repeat open is a no-op.
    pub fn open(&mut self) {
        if self.state == GateState::Closed {
            self.state = GateState::Pending;
        }
    }

    /// Resolve the pending intervention.
    ///
    /// Resolving when nothing is pending, or a second time, is a
    /// collaborator bug and fails loudly.
    pub fn resolve(
        &mut self,
        choice: InterventionChoice,
    ) -> Result<InterventionOutcome, InterventionError> {
        match self.state {
            GateState::Closed => Err(InterventionError::NotPending),
            GateState::Resolved(previous) => Err(InterventionError::AlreadyResolved { previous }),
            GateState::Pending => {
                self.state = GateState::Resolved(choice);
                Ok(match choice {
                    InterventionChoice::TakeBreak => InterventionOutcome::Break {
                        duration_ticks: self.break_duration_ticks,
                    },
                    InterventionChoice::AcceptChallenge => InterventionOutcome::Challenge,
                })
            }
        }
    }
}
