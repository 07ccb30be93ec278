//! Tick-loop runtime.
//!
//! A single driving loop owns the [`FocusSession`] and is the only path
//! that mutates it: one `sample()` from the presence source per tick, one
//! `presence_tick`/`capture_unavailable` call, one snapshot publication.
//! If capture is slower than the tick cadence the tick is skipped, never
//! queued - no backlog of stale frames is ever processed.
//!
//! The loop ends on its own once the session terminates (quota exceeded)
//! or when the controller cancels it.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::{CoreError, Result};
use crate::session::{FocusSession, Snapshot};

/// One tick's worth of signal from the vision collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceSample {
    /// At least one face detected this frame.
    Present,
    /// A frame was captured and contained no face.
    Absent,
    /// No frame could be obtained. "No signal", not "no face".
    Unavailable,
}

/// The external vision pipeline, reduced to the one question the core asks.
pub trait PresenceSource: Send + 'static {
    fn sample(&mut self) -> PresenceSample;
}

/// Owns the spawned tick loop. Start/stop mirror the session lifecycle:
/// the camera opens, the loop runs, the loop hands the (possibly
/// terminated) session back.
pub struct TrackerController {
    handle: Option<JoinHandle<FocusSession>>,
    cancel: Option<CancellationToken>,
    snapshot_rx: Option<watch::Receiver<Snapshot>>,
}

impl Default for TrackerController {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel: None,
            snapshot_rx: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Spawn the tick loop for `session`, sampling `source` every
    /// `tick_interval`.
    pub fn start(
        &mut self,
        session: FocusSession,
        source: impl PresenceSource,
        tick_interval: Duration,
    ) -> Result<()> {
        if self.handle.is_some() {
            return Err(CoreError::Custom("tracking already active".to_string()));
        }

        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(tick_loop(
            session,
            source,
            tick_interval,
            snapshot_tx,
            cancel.clone(),
        ));

        self.handle = Some(handle);
        self.cancel = Some(cancel);
        self.snapshot_rx = Some(snapshot_rx);
        Ok(())
    }

    /// Snapshot feed for presentation collaborators. Read-only by
    /// construction.
    pub fn subscribe(&self) -> Option<watch::Receiver<Snapshot>> {
        self.snapshot_rx.clone()
    }

    /// Cancel the loop and hand the session back. `Ok(None)` when nothing
    /// was running.
    pub async fn stop(&mut self) -> Result<Option<FocusSession>> {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.join().await
    }

    /// Await the loop's natural end (session terminated or cancelled) and
    /// hand the session back.
    pub async fn join(&mut self) -> Result<Option<FocusSession>> {
        self.snapshot_rx = None;
        match self.handle.take() {
            Some(handle) => {
                let session = handle
                    .await
                    .map_err(|e| CoreError::Custom(format!("tick loop task failed: {e}")))?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }
}

async fn tick_loop(
    mut session: FocusSession,
    mut source: impl PresenceSource,
    tick_interval: Duration,
    snapshot_tx: watch::Sender<Snapshot>,
    cancel: CancellationToken,
) -> FocusSession {
    let mut ticker = interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    log::info!("tick loop started for session {}", session.id());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match source.sample() {
                    PresenceSample::Present => {
                        session.presence_tick(true);
                    }
                    PresenceSample::Absent => {
                        session.presence_tick(false);
                    }
                    PresenceSample::Unavailable => {
                        session.capture_unavailable();
                    }
                }
                let _ = snapshot_tx.send(session.snapshot());
                if session.terminated() {
                    log::info!(
                        "session {} terminated, awaiting intervention",
                        session.id()
                    );
                    break;
                }
            }
            _ = cancel.cancelled() => {
                log::info!("tick loop for session {} cancelled", session.id());
                break;
            }
        }
    }

    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionConfig;
    use crate::tracker::{FocusConfig, InterventionChoice, InterventionOutcome};
    use std::collections::VecDeque;

    struct ScriptedSource(VecDeque<PresenceSample>);

    impl PresenceSource for ScriptedSource {
        fn sample(&mut self) -> PresenceSample {
            // Past the end of the script the camera is "unplugged".
            self.0.pop_front().unwrap_or(PresenceSample::Unavailable)
        }
    }

    fn quick_session(quota: u32) -> FocusSession {
        FocusSession::new(SessionConfig {
            focus: FocusConfig {
                rise_threshold: 3,
                fall_rate: 2,
                warning_cue_tick: 2,
            },
            session_quota: quota,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn loop_ends_on_its_own_at_quota() {
        let script: VecDeque<_> = [
            PresenceSample::Absent,
            PresenceSample::Absent,
            PresenceSample::Absent,
            PresenceSample::Present,
        ]
        .into_iter()
        .collect();

        let mut controller = TrackerController::new();
        controller
            .start(
                quick_session(1),
                ScriptedSource(script),
                Duration::from_millis(1),
            )
            .unwrap();

        let session = tokio::time::timeout(Duration::from_secs(5), controller.join())
            .await
            .expect("loop should terminate at quota")
            .unwrap()
            .expect("session should be handed back");

        assert!(session.terminated());
        assert_eq!(session.distraction_count(), 1);
        assert!(session.intervention_pending());
    }

    #[tokio::test]
    async fn stop_cancels_a_running_loop() {
        struct AlwaysPresent;
        impl PresenceSource for AlwaysPresent {
            fn sample(&mut self) -> PresenceSample {
                PresenceSample::Present
            }
        }

        let mut controller = TrackerController::new();
        controller
            .start(quick_session(5), AlwaysPresent, Duration::from_millis(1))
            .unwrap();
        assert!(controller.is_active());

        // Double start is rejected while active.
        assert!(controller
            .start(quick_session(5), AlwaysPresent, Duration::from_millis(1))
            .is_err());

        let session = controller.stop().await.unwrap().unwrap();
        assert!(!session.terminated());
        assert_eq!(session.distraction_count(), 0);

        // Stop when stopped is a no-op.
        assert!(controller.stop().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn capture_gaps_freeze_the_streak() {
        let script: VecDeque<_> = std::iter::repeat(PresenceSample::Absent)
            .take(2)
            .chain(std::iter::repeat(PresenceSample::Unavailable).take(20))
            .collect();

        let mut controller = TrackerController::new();
        controller
            .start(
                quick_session(5),
                ScriptedSource(script),
                Duration::from_millis(1),
            )
            .unwrap();
        let rx = controller.subscribe().unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        let session = controller.stop().await.unwrap().unwrap();

        // Two absent frames, then nothing but gaps: the streak froze at 2.
        let snap = rx.borrow();
        assert_eq!(snap.no_face_streak, 2);
        assert!(snap.missed_frames >= 1);
        assert!(!session.terminated());
    }

    #[tokio::test]
    async fn terminated_session_resolves_after_handback() {
        let script: VecDeque<_> = [
            PresenceSample::Absent,
            PresenceSample::Absent,
            PresenceSample::Absent,
            PresenceSample::Present,
        ]
        .into_iter()
        .collect();

        let mut controller = TrackerController::new();
        controller
            .start(
                quick_session(1),
                ScriptedSource(script),
                Duration::from_millis(1),
            )
            .unwrap();

        let mut session = tokio::time::timeout(Duration::from_secs(5), controller.join())
            .await
            .unwrap()
            .unwrap()
            .unwrap();

        let (outcome, _event) = session
            .resolve_intervention(InterventionChoice::AcceptChallenge)
            .unwrap();
        assert_eq!(outcome, InterventionOutcome::Challenge);
    }
}
