//! # Focusguard Core Library
//!
//! This library provides the core logic for Focusguard, a webcam-driven
//! focus-enforcement tool. The external vision pipeline reduces each camera
//! frame to a boolean "face present" signal; everything downstream of that
//! signal lives here.
//!
//! ## Architecture
//!
//! - **Focus Machine**: A tick-driven hysteretic state machine that turns
//!   the noisy per-frame presence signal into a focus state and a
//!   monotonically-accumulating distraction count
//! - **Escalation Policy**: Edge-triggered punishment start/stop plus the
//!   one-shot session quota that hands control to the intervention gate
//! - **Runtime**: A single tick loop that owns the session, samples the
//!   presence source, and publishes read-only snapshots
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`FocusMachine`]: Core hysteretic state machine
//! - [`FocusSession`]: Per-session orchestration and observer fan-out
//! - [`TrackerController`]: Owns the spawned tick loop
//! - [`Punisher`]: Background punishment side-effect runner
//! - [`Config`]: Application configuration management

pub mod challenge;
pub mod error;
pub mod events;
pub mod punisher;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod tracker;

pub use challenge::{ChallengeWheel, DEFAULT_CHALLENGES};
pub use error::{ConfigError, CoreError, InterventionError};
pub use events::Event;
pub use punisher::{MediaKind, Punisher, PunisherConfig, PunishmentDriver, PunishmentSink};
pub use runtime::{PresenceSample, PresenceSource, TrackerController};
pub use session::{FocusObserver, FocusSession, SessionConfig, Snapshot};
pub use storage::Config;
pub use tracker::{
    EscalationDecision, EscalationPolicy, FocusConfig, FocusMachine, FocusState,
    InterventionChoice, InterventionGate, InterventionOutcome, Observation, ProximityClassifier,
    ProximityLabel,
};
