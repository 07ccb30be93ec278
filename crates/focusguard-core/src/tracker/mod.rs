mod escalation;
mod intervention;
mod machine;
mod proximity;

pub use escalation::{EscalationDecision, EscalationPolicy};
pub use intervention::{
    InterventionChoice, InterventionGate, InterventionOutcome, DEFAULT_BREAK_DURATION_TICKS,
};
pub use machine::{FocusConfig, FocusMachine, FocusState, Observation};
pub use proximity::{
    ProximityClassifier, ProximityLabel, DEFAULT_CUTOFF_WIDTH, REFERENCE_FRAME_WIDTH,
};
