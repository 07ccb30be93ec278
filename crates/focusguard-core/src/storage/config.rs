//! TOML-based application configuration.
//!
//! Stores the tracker thresholds, punishment timing, break length, and
//! proximity cutoff. Configuration is stored at
//! `~/.config/focusguard/config.toml`; missing files and missing fields
//! fall back to defaults, so a partial file is always valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::punisher::PunisherConfig;
use crate::session::SessionConfig;
use crate::tracker::{
    EscalationPolicy, FocusConfig, ProximityClassifier, DEFAULT_CUTOFF_WIDTH,
    REFERENCE_FRAME_WIDTH,
};

const CONFIG_FILE: &str = "config.toml";

/// `[tracker]` section: focus machine thresholds and the session quota.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerSection {
    #[serde(default = "default_rise_threshold")]
    pub rise_threshold: u32,
    #[serde(default = "default_fall_rate")]
    pub fall_rate: u32,
    #[serde(default = "default_warning_cue_tick")]
    pub warning_cue_tick: u32,
    #[serde(default = "default_session_quota")]
    pub session_quota: u32,
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

fn default_session_quota() -> u32 {
    EscalationPolicy::DEFAULT_SESSION_QUOTA
}

impl Default for TrackerSection {
    fn default() -> Self {
        Self {
            rise_threshold: default_rise_threshold(),
            fall_rate: default_fall_rate(),
            warning_cue_tick: default_warning_cue_tick(),
            session_quota: default_session_quota(),
        }
    }
}

/// `[punishment]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunishmentSection {
    #[serde(default = "default_rotation_interval_ms")]
    pub rotation_interval_ms: u64,
    #[serde(default = "default_artifact_lifetime_ms")]
    pub artifact_lifetime_ms: u64,
    #[serde(default = "default_max_live_artifacts")]
    pub max_live_artifacts: usize,
    /// Folder with punishment media. None leaves the punisher inert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_dir: Option<PathBuf>,
}

fn default_rotation_interval_ms() -> u64 {
    PunisherConfig::default().rotation_interval_ms
}

fn default_artifact_lifetime_ms() -> u64 {
    PunisherConfig::default().artifact_lifetime_ms
}

fn default_max_live_artifacts() -> usize {
    PunisherConfig::default().max_live_artifacts
}

impl Default for PunishmentSection {
    fn default() -> Self {
        Self {
            rotation_interval_ms: default_rotation_interval_ms(),
            artifact_lifetime_ms: default_artifact_lifetime_ms(),
            max_live_artifacts: default_max_live_artifacts(),
            media_dir: None,
        }
    }
}

/// `[break]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakSection {
    #[serde(default = "default_break_duration_secs")]
    pub duration_secs: u32,
}

fn default_break_duration_secs() -> u32 {
    300
}

impl Default for BreakSection {
    fn default() -> Self {
        Self {
            duration_secs: default_break_duration_secs(),
        }
    }
}

/// `[proximity]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximitySection {
    #[serde(default = "default_frame_width")]
    pub frame_width: u32,
    #[serde(default = "default_cutoff_width")]
    pub cutoff_width: u32,
}

fn default_frame_width() -> u32 {
    REFERENCE_FRAME_WIDTH
}

fn default_cutoff_width() -> u32 {
    DEFAULT_CUTOFF_WIDTH
}

impl Default for ProximitySection {
    fn default() -> Self {
        Self {
            frame_width: default_frame_width(),
            cutoff_width: default_cutoff_width(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusguard/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerSection,
    #[serde(default)]
    pub punishment: PunishmentSection,
    #[serde(default, rename = "break")]
    pub break_timer: BreakSection,
    #[serde(default)]
    pub proximity: ProximitySection,
}

impl Config {
    /// Absolute path of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from(CONFIG_FILE),
            message: e.to_string(),
        })?;
        Ok(dir.join(CONFIG_FILE))
    }

    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Config =
            toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Validate the whole file with the same rules construction applies.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.focus_config().validate()?;
        if self.tracker.session_quota == 0 {
            return Err(ConfigError::invalid(
                "session_quota",
                "must allow at least one distraction episode",
            ));
        }
        Ok(())
    }

    // ── Conversions into runtime types ───────────────────────────────

    pub fn focus_config(&self) -> FocusConfig {
        FocusConfig {
            rise_threshold: self.tracker.rise_threshold,
            fall_rate: self.tracker.fall_rate,
            warning_cue_tick: self.tracker.warning_cue_tick,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            focus: self.focus_config(),
            session_quota: self.tracker.session_quota,
            break_duration_ticks: self.break_timer.duration_secs,
        }
    }

    pub fn punisher_config(&self) -> PunisherConfig {
        PunisherConfig {
            rotation_interval_ms: self.punishment.rotation_interval_ms,
            artifact_lifetime_ms: self.punishment.artifact_lifetime_ms,
            max_live_artifacts: self.punishment.max_live_artifacts,
        }
    }

    pub fn proximity_classifier(&self) -> ProximityClassifier {
        ProximityClassifier::new(self.proximity.frame_width, self.proximity.cutoff_width)
    }
}
