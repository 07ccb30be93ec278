//! Focus state machine.
//!
//! Converts the noisy per-tick face-presence signal into a hysteretic
//! focus state. The machine is tick-driven - the caller invokes `observe()`
//! once per definite capture frame; a frame that could not be obtained
//! never reaches the machine.
//!
//! ## State Transitions
//!
//! ```text
//! Focused -> LookingAway -> Distracted -> LookingAway -> Focused
//! ```
//!
//! Absence grows the no-face streak by one per tick; presence shrinks it by
//! `fall_rate` per tick. The asymmetry is deliberate: a single good frame
//! must not instantly forgive a long absence, and a single bad frame must
//! not instantly flag a present user. A reset-to-zero policy would flicker
//! on detector noise; the decaying streak smooths both directions without a
//! second filter stage.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Focus level derived from the no-face streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusState {
    /// Face present, streak fully decayed.
    Focused,
    /// Streak above zero but below the distraction threshold,
    /// or recovering from a distraction episode.
    LookingAway,
    /// Streak reached the distraction threshold.
    Distracted,
}

/// Thresholds for the focus state machine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Ticks of continuous absence before the state becomes `Distracted`.
    #[serde(default = "default_rise_threshold")]
    pub rise_threshold: u32,
    /// Ticks subtracted from the streak per present tick while recovering.
    #[serde(default = "default_fall_rate")]
    pub fall_rate: u32,
    /// Streak value at which the one-shot warning cue fires.
    /// Must not exceed `rise_threshold`.
    #[serde(default = "default_warning_cue_tick")]
    pub warning_cue_tick: u32,
}

fn default_rise_threshold() -> u32 {
    30
}

fn default_fall_rate() -> u32 {
    2
}

fn default_warning_cue_tick() -> u32 {
    10
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            rise_threshold: default_rise_threshold(),
            fall_rate: default_fall_rate(),
            warning_cue_tick: default_warning_cue_tick(),
        }
    }
}

impl FocusConfig {
    /// Validate thresholds. Called at machine construction, before any
    /// ticks are processed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rise_threshold == 0 {
            return Err(ConfigError::invalid(
                "rise_threshold",
                "must be at least 1 tick (0 would fire every tick)",
            ));
        }
        if self.warning_cue_tick > self.rise_threshold {
            return Err(ConfigError::invalid(
                "warning_cue_tick",
                format!(
                    "must not exceed rise_threshold ({} > {})",
                    self.warning_cue_tick, self.rise_threshold
                ),
            ));
        }
        Ok(())
    }
}

/// Result of one `observe()` call: the level plus the edges that occurred
/// this tick.
///
/// Both are required - the escalation policy reacts to edges exactly once,
/// not every tick a level persists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Observation {
    pub state: FocusState,
    pub no_face_streak: u32,
    pub distraction_count: u32,
    /// The state just became `Distracted` on this tick.
    pub entered_distracted: bool,
    /// The state just left `Distracted` on this tick; `distraction_count`
    /// was incremented as part of committing this transition.
    pub exited_distracted: bool,
    /// The one-shot warning cue fired on this tick.
    pub cue_fired: bool,
}

/// Hysteretic focus state machine.
///
/// Owns the per-session streak, state, and distraction count. The caller is
/// responsible for calling `observe()` once per capture frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusMachine {
    config: FocusConfig,
    no_face_streak: u32,
    state: FocusState,
    distraction_count: u32,
    cue_fired: bool,
}

impl FocusMachine {
    /// Create a machine with validated configuration.
    pub fn new(config: FocusConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            no_face_streak: 0,
            state: FocusState::Focused,
            distraction_count: 0,
            cue_fired: false,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn no_face_streak(&self) -> u32 {
        self.no_face_streak
    }

    pub fn distraction_count(&self) -> u32 {
        self.distraction_count
    }

    pub fn config(&self) -> &FocusConfig {
        &self.config
    }

    // ── Tick processing ──────────────────────────────────────────────

    /// Process one tick of presence signal.
    ///
    /// Multiple detected faces count identically to one; the input is
    /// already "at least one face present this tick".
    pub fn observe(&mut self, face_present: bool) -> Observation {
        let mut entered_distracted = false;
        let mut exited_distracted = false;
        let mut cue_fired = false;

        if face_present {
            if self.state == FocusState::Distracted {
                // Edge out of distraction: the episode completes here and
                // the count commits with it.
                exited_distracted = true;
                self.distraction_count += 1;
            }
            self.cue_fired = false;
            self.no_face_streak = self.no_face_streak.saturating_sub(self.config.fall_rate);
            self.state = if self.no_face_streak > 0 {
                FocusState::LookingAway
            } else {
                FocusState::Focused
            };
        } else {
            self.no_face_streak += 1;
            if self.no_face_streak == self.config.warning_cue_tick && !self.cue_fired {
                self.cue_fired = true;
                cue_fired = true;
            }
            if self.no_face_streak >= self.config.rise_threshold {
                if self.state != FocusState::Distracted {
                    entered_distracted = true;
                }
                self.state = FocusState::Distracted;
            } else {
                self.state = FocusState::LookingAway;
            }
        }

        Observation {
            state: self.state,
            no_face_streak: self.no_face_streak,
            distraction_count: self.distraction_count,
            entered_distracted,
            exited_distracted,
            cue_fired,
        }
    }
}
