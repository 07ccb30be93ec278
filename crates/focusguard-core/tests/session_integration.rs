//! End-to-end session tests plus property checks over arbitrary presence
//! sequences.

use focusguard_core::{
    Event, FocusConfig, FocusMachine, FocusSession, FocusState, InterventionChoice,
    InterventionOutcome, SessionConfig,
};
use proptest::prelude::*;

fn count_event<F: Fn(&Event) -> bool>(events: &[Event], pred: F) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

#[test]
fn full_escalation_ladder() {
    let mut session = FocusSession::new(SessionConfig::default()).unwrap();
    let mut events = Vec::new();

    // Five full distraction episodes against the default quota of five.
    for _ in 0..5 {
        for _ in 0..30 {
            events.extend(session.presence_tick(false));
        }
        for _ in 0..15 {
            events.extend(session.presence_tick(true));
        }
    }

    assert_eq!(
        count_event(&events, |e| matches!(e, Event::WarningCue { .. })),
        5
    );
    assert_eq!(
        count_event(&events, |e| matches!(e, Event::PunishmentStarted { .. })),
        5
    );
    assert_eq!(
        count_event(&events, |e| matches!(e, Event::PunishmentStopped { .. })),
        5
    );
    assert_eq!(
        count_event(&events, |e| matches!(e, Event::QuotaExceeded { .. })),
        1
    );

    assert!(session.terminated());
    assert!(session.intervention_pending());
    assert_eq!(session.distraction_count(), 5);

    // Frozen until the intervention resolves; nothing resumes after.
    assert!(session.presence_tick(false).is_empty());
    let (outcome, event) = session
        .resolve_intervention(InterventionChoice::TakeBreak)
        .unwrap();
    assert_eq!(outcome, InterventionOutcome::Break { duration_ticks: 300 });
    assert!(matches!(event, Event::InterventionResolved { .. }));
    assert!(session.presence_tick(false).is_empty());
}

#[test]
fn events_serialize_with_type_tags() {
    let mut session = FocusSession::new(SessionConfig::default()).unwrap();
    let events = session.presence_tick(false);
    assert_eq!(events.len(), 1);

    let json = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(json["type"], "StateChanged");
    assert_eq!(json["state"], "looking_away");

    let snap = serde_json::to_value(session.snapshot_event()).unwrap();
    assert_eq!(snap["type"], "SessionSnapshot");
    assert_eq!(snap["no_face_streak"], 1);
}

proptest! {
    #[test]
    fn distraction_count_is_monotone(inputs in proptest::collection::vec(any::<bool>(), 0..500)) {
        let mut machine = FocusMachine::new(FocusConfig::default()).unwrap();
        let mut last = 0;
        for present in inputs {
            let obs = machine.observe(present);
            prop_assert!(obs.distraction_count >= last);
            last = obs.distraction_count;
        }
    }

    #[test]
    fn streak_moves_in_bounded_steps(inputs in proptest::collection::vec(any::<bool>(), 0..500)) {
        let config = FocusConfig::default();
        let mut machine = FocusMachine::new(config).unwrap();
        let mut prev = 0u32;
        for present in inputs {
            let obs = machine.observe(present);
            if present {
                prop_assert_eq!(obs.no_face_streak, prev.saturating_sub(config.fall_rate));
            } else {
                prop_assert_eq!(obs.no_face_streak, prev + 1);
            }
            prev = obs.no_face_streak;
        }
    }

    #[test]
    fn state_is_consistent_with_streak(inputs in proptest::collection::vec(any::<bool>(), 0..500)) {
        let mut machine = FocusMachine::new(FocusConfig::default()).unwrap();
        for present in inputs {
            let obs = machine.observe(present);
            match obs.state {
                FocusState::Focused => prop_assert_eq!(obs.no_face_streak, 0),
                FocusState::LookingAway => prop_assert!(obs.no_face_streak > 0),
                FocusState::Distracted => prop_assert!(!present),
            }
        }
    }

    #[test]
    fn capture_gaps_are_invisible(
        steps in proptest::collection::vec((any::<bool>(), 0u8..4), 0..200)
    ) {
        let mut session = FocusSession::new(SessionConfig::default()).unwrap();
        for (present, gaps) in steps {
            let before = session.snapshot();
            for _ in 0..gaps {
                session.capture_unavailable();
            }
            let after = session.snapshot();
            prop_assert_eq!(before.state, after.state);
            prop_assert_eq!(before.no_face_streak, after.no_face_streak);
            prop_assert_eq!(before.distraction_count, after.distraction_count);
            session.presence_tick(present);
        }
    }
}
