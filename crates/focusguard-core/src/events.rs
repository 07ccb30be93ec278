use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tracker::{FocusState, InterventionChoice, InterventionOutcome};

/// Every state change in the session produces an Event.
/// Collaborators poll or subscribe for them; the CLI prints them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The focus level or the distraction count changed.
    StateChanged {
        state: FocusState,
        distraction_count: u32,
        at: DateTime<Utc>,
    },
    /// The one-shot warning cue fired for the current absence streak.
    WarningCue {
        no_face_streak: u32,
        at: DateTime<Utc>,
    },
    PunishmentStarted {
        distraction_count: u32,
        at: DateTime<Utc>,
    },
    PunishmentStopped {
        distraction_count: u32,
        at: DateTime<Utc>,
    },
    /// Fired exactly once per session; tracking input stops afterwards.
    QuotaExceeded {
        distraction_count: u32,
        session_quota: u32,
        at: DateTime<Utc>,
    },
    InterventionResolved {
        choice: InterventionChoice,
        outcome: InterventionOutcome,
        at: DateTime<Utc>,
    },
    /// Full read-only state published after a tick.
    SessionSnapshot {
        session_id: Uuid,
        state: FocusState,
        no_face_streak: u32,
        distraction_count: u32,
        punishment_active: bool,
        terminated: bool,
        missed_frames: u64,
        at: DateTime<Utc>,
    },
}
