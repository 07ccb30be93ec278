//! Escalation policy.
//!
//! Watches the state machine's per-tick output and converts edges into
//! one-shot side-effect decisions: start/stop punishment, and - once the
//! session distraction quota is exceeded - a single terminal handoff to the
//! intervention gate.
//!
//! The policy reacts to edges, never to levels: a tick on which the state
//! merely remains `Distracted` produces no decision.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tracker::machine::Observation;

/// Side effects to fire for one tick. Every flag is edge-triggered and
/// already deduplicated by the policy's latches.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EscalationDecision {
    /// Begin punishment side effects.
    pub start_punishment: bool,
    /// Stop punishment side effects.
    pub stop_punishment: bool,
    /// The session quota was exceeded on this tick; open the intervention
    /// gate and stop all tracking input.
    pub quota_exceeded: bool,
}

/// Edge-driven escalation policy with idempotent latches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationPolicy {
    session_quota: u32,
    punishment_active: bool,
    quota_exceeded_handled: bool,
}

impl EscalationPolicy {
    pub const DEFAULT_SESSION_QUOTA: u32 = 5;

    pub fn new(session_quota: u32) -> Result<Self, ConfigError> {
        if session_quota == 0 {
            return Err(ConfigError::invalid(
                "session_quota",
                "must allow at least one distraction episode",
            ));
        }
        Ok(Self {
            session_quota,
            punishment_active: false,
            quota_exceeded_handled: false,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session_quota(&self) -> u32 {
        self.session_quota
    }

    pub fn punishment_active(&self) -> bool {
        self.punishment_active
    }

    /// The one-shot quota latch. Once set, the session is terminated and
    /// `apply` must not be called again.
    pub fn quota_exceeded(&self) -> bool {
        self.quota_exceeded_handled
    }

    // ── Tick processing ──────────────────────────────────────────────

    /// Convert one tick's observation into side-effect decisions.
    pub fn apply(&mut self, obs: &Observation) -> EscalationDecision {
        let mut decision = EscalationDecision::default();

        if obs.entered_distracted && !self.punishment_active {
            self.punishment_active = true;
            decision.start_punishment = true;
            log::info!("punishment started (episode {})", obs.distraction_count + 1);
        }

        if obs.exited_distracted {
            if self.punishment_active {
                self.punishment_active = false;
                decision.stop_punishment = true;
                log::info!("punishment stopped (episodes so far: {})", obs.distraction_count);
            }

            // The quota is checked only after an episode commits, so a
            // session always ends on a completed episode.
            if obs.distraction_count >= self.session_quota && !self.quota_exceeded_handled {
                self.quota_exceeded_handled = true;
                decision.quota_exceeded = true;
                log::warn!(
                    "session quota exceeded ({}/{}), handing off to intervention",
                    obs.distraction_count,
                    self.session_quota
                );
            }
        }

        decision
    }
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            session_quota: Self::DEFAULT_SESSION_QUOTA,
            punishment_active: false,
            quota_exceeded_handled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::machine::{FocusConfig, FocusMachine, FocusState};

    fn obs(entered: bool, exited: bool, count: u32) -> Observation {
        Observation {
            state: FocusState::Focused,
            no_face_streak: 0,
            distraction_count: count,
            entered_distracted: entered,
            exited_distracted: exited,
            cue_fired: false,
        }
    }

    #[test]
    fn rejects_zero_quota() {
        assert!(EscalationPolicy::new(0).is_err());
    }

    #[test]
    fn punishment_starts_once_per_episode() {
        let mut policy = EscalationPolicy::new(5).unwrap();
        let first = policy.apply(&obs(true, false, 0));
        assert!(first.start_punishment);
        assert!(policy.punishment_active());

        // A duplicate entered edge while active is not restarted.
        let dup = policy.apply(&obs(true, false, 0));
        assert!(!dup.start_punishment);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut policy = EscalationPolicy::new(5).unwrap();
        policy.apply(&obs(true, false, 0));
        let stop = policy.apply(&obs(false, true, 1));
        assert!(stop.stop_punishment);
        assert!(!policy.punishment_active());

        // A duplicate exited edge produces no second stop.
        let dup = policy.apply(&obs(false, true, 1));
        assert!(!dup.stop_punishment);
    }

    #[test]
    fn quota_fires_exactly_once() {
        let mut policy = EscalationPolicy::new(2).unwrap();
        assert!(!policy.apply(&obs(false, true, 1)).quota_exceeded);
        assert!(policy.apply(&obs(false, true, 2)).quota_exceeded);
        assert!(policy.quota_exceeded());
        // Latched: even a later episode does not re-fire.
        assert!(!policy.apply(&obs(false, true, 3)).quota_exceeded);
    }

    #[test]
    fn quota_waits_for_episode_commit() {
        let mut policy = EscalationPolicy::new(1).unwrap();
        // Entering distraction alone never trips the quota, even when the
        // count already satisfies it.
        assert!(!policy.apply(&obs(true, false, 1)).quota_exceeded);
        assert!(policy.apply(&obs(false, true, 1)).quota_exceeded);
    }

    #[test]
    fn drives_from_real_machine_output() {
        let mut machine = FocusMachine::new(FocusConfig::default()).unwrap();
        let mut policy = EscalationPolicy::new(2).unwrap();
        let mut starts = 0;
        let mut stops = 0;
        let mut quota = 0;

        for _ in 0..2 {
            for _ in 0..30 {
                let d = policy.apply(&machine.observe(false));
                starts += d.start_punishment as u32;
            }
            for _ in 0..20 {
                let d = policy.apply(&machine.observe(true));
                stops += d.stop_punishment as u32;
                quota += d.quota_exceeded as u32;
            }
        }

        assert_eq!(starts, 2);
        assert_eq!(stops, 2);
        assert_eq!(quota, 1);
    }
}
