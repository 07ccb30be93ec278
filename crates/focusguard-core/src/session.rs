//! Session orchestration.
//!
//! `FocusSession` owns the state machine, the escalation policy, and the
//! intervention gate, and fans tick results out to presentation
//! collaborators. Collaborators implement [`FocusObserver`] (the capability
//! interface) or poll the returned [`Event`]s; they only ever read
//! snapshots, never mutate session state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConfigError, InterventionError};
use crate::events::Event;
use crate::tracker::{
    EscalationPolicy, FocusConfig, FocusMachine, FocusState, InterventionChoice, InterventionGate,
    InterventionOutcome, DEFAULT_BREAK_DURATION_TICKS,
};

/// Capability interface for presentation collaborators.
///
/// Every method has an empty default body so a collaborator implements only
/// what it renders. All callbacks are edge-triggered; duplicate-safe
/// consumers are still recommended for the punishment pair.
pub trait FocusObserver: Send {
    fn on_state_changed(&mut self, _state: FocusState, _distraction_count: u32) {}
    fn on_warning_cue(&mut self) {}
    fn on_punishment_start(&mut self) {}
    fn on_punishment_stop(&mut self) {}
    fn on_quota_exceeded(&mut self) {}
}

/// Session-level configuration, assembled from the config file or defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionConfig {
    pub focus: FocusConfig,
    pub session_quota: u32,
    pub break_duration_ticks: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            focus: FocusConfig::default(),
            session_quota: EscalationPolicy::DEFAULT_SESSION_QUOTA,
            break_duration_ticks: DEFAULT_BREAK_DURATION_TICKS,
        }
    }
}

/// Read-only state published after each tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Snapshot {
    pub session_id: Uuid,
    pub state: FocusState,
    pub no_face_streak: u32,
    pub distraction_count: u32,
    pub punishment_active: bool,
    pub terminated: bool,
    pub missed_frames: u64,
}

/// One tracking session: created when the camera opens, frozen when the
/// quota is exceeded, torn down after the intervention resolves.
pub struct FocusSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    machine: FocusMachine,
    policy: EscalationPolicy,
    gate: InterventionGate,
    missed_frames: u64,
    last_published: (FocusState, u32),
    observers: Vec<Box<dyn FocusObserver>>,
}

impl FocusSession {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let machine = FocusMachine::new(config.focus)?;
        let policy = EscalationPolicy::new(config.session_quota)?;
        Ok(Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            machine,
            policy,
            gate: InterventionGate::with_break_duration(config.break_duration_ticks),
            missed_frames: 0,
            last_published: (FocusState::Focused, 0),
            observers: Vec::new(),
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn FocusObserver>) {
        self.observers.push(observer);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn state(&self) -> FocusState {
        self.machine.state()
    }

    pub fn distraction_count(&self) -> u32 {
        self.machine.distraction_count()
    }

    /// True once the quota latch is set; `presence_tick` is a frozen no-op
    /// from then on.
    pub fn terminated(&self) -> bool {
        self.policy.quota_exceeded()
    }

    pub fn intervention_pending(&self) -> bool {
        self.gate.is_pending()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session_id: self.id,
            state: self.machine.state(),
            no_face_streak: self.machine.no_face_streak(),
            distraction_count: self.machine.distraction_count(),
            punishment_active: self.policy.punishment_active(),
            terminated: self.terminated(),
            missed_frames: self.missed_frames,
        }
    }

    pub fn snapshot_event(&self) -> Event {
        let snap = self.snapshot();
        Event::SessionSnapshot {
            session_id: snap.session_id,
            state: snap.state,
            no_face_streak: snap.no_face_streak,
            distraction_count: snap.distraction_count,
            punishment_active: snap.punishment_active,
            terminated: snap.terminated,
            missed_frames: snap.missed_frames,
            at: Utc::now(),
        }
    }

    // ── Tick inputs ──────────────────────────────────────────────────

    /// Process one capture frame's presence signal. Returns the events that
    /// occurred this tick, already fanned out to the observers.
    pub fn presence_tick(&mut self, face_present: bool) -> Vec<Event> {
        if self.terminated() {
            return Vec::new();
        }

        let obs = self.machine.observe(face_present);
        let decision = self.policy.apply(&obs);
        let at = Utc::now();
        let mut events = Vec::new();

        if obs.cue_fired {
            for o in &mut self.observers {
                o.on_warning_cue();
            }
            events.push(Event::WarningCue {
                no_face_streak: obs.no_face_streak,
                at,
            });
        }

        if decision.start_punishment {
            for o in &mut self.observers {
                o.on_punishment_start();
            }
            events.push(Event::PunishmentStarted {
                distraction_count: obs.distraction_count,
                at,
            });
        }

        if decision.stop_punishment {
            for o in &mut self.observers {
                o.on_punishment_stop();
            }
            events.push(Event::PunishmentStopped {
                distraction_count: obs.distraction_count,
                at,
            });
        }

        if (obs.state, obs.distraction_count) != self.last_published {
            self.last_published = (obs.state, obs.distraction_count);
            for o in &mut self.observers {
                o.on_state_changed(obs.state, obs.distraction_count);
            }
            events.push(Event::StateChanged {
                state: obs.state,
                distraction_count: obs.distraction_count,
                at,
            });
        }

        if decision.quota_exceeded {
            self.gate.open();
            for o in &mut self.observers {
                o.on_quota_exceeded();
            }
            events.push(Event::QuotaExceeded {
                distraction_count: obs.distraction_count,
                session_quota: self.policy.session_quota(),
                at,
            });
        }

        events
    }

    /// A frame could not be obtained. A missing frame is "no signal", not
    /// "no face": nothing advances, nothing decays.
    pub fn capture_unavailable(&mut self) {
        self.missed_frames += 1;
        log::debug!(
            "capture unavailable (session {}, {} missed so far)",
            self.id,
            self.missed_frames
        );
    }

    /// Close out the pending intervention with the UI collaborator's
    /// choice.
    pub fn resolve_intervention(
        &mut self,
        choice: InterventionChoice,
    ) -> Result<(InterventionOutcome, Event), InterventionError> {
        let outcome = self.gate.resolve(choice)?;
        log::info!("intervention resolved: {choice:?} -> {outcome:?}");
        let event = Event::InterventionResolved {
            choice,
            outcome,
            at: Utc::now(),
        };
        Ok((outcome, event))
    }
}
