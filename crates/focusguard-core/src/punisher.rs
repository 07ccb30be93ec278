//! Punishment side-effect runner.
//!
//! A background spam loop started on the `entered_distracted` edge and
//! stopped on `exited_distracted`. The loop rotates through a shuffled
//! media folder and asks the [`PunishmentSink`] collaborator to display one
//! artifact per rotation interval, capped at a fixed number of live
//! artifacts; each artifact self-expires after a fixed lifetime. The loop
//! is fire-and-forget relative to the tick path: starting and stopping
//! never block tick processing, and both are idempotent.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Duration};
use tokio_util::sync::CancellationToken;

use crate::session::FocusObserver;

/// Artifact routing by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

/// Classify a media file by extension. Unknown extensions are skipped.
pub fn media_kind(path: &Path) -> Option<MediaKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" | "jpg" | "jpeg" | "gif" => Some(MediaKind::Image),
        "mp3" | "wav" | "ogg" => Some(MediaKind::Audio),
        "mp4" | "avi" | "mkv" => Some(MediaKind::Video),
        _ => None,
    }
}

/// Timing and capacity knobs for the spam loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PunisherConfig {
    /// Delay between artifacts.
    #[serde(default = "default_rotation_interval_ms")]
    pub rotation_interval_ms: u64,
    /// How long each artifact stays alive before it self-expires.
    #[serde(default = "default_artifact_lifetime_ms")]
    pub artifact_lifetime_ms: u64,
    /// Cap on simultaneously live artifacts.
    #[serde(default = "default_max_live_artifacts")]
    pub max_live_artifacts: usize,
}

fn default_rotation_interval_ms() -> u64 {
    1500
}

fn default_artifact_lifetime_ms() -> u64 {
    5000
}

fn default_max_live_artifacts() -> usize {
    10
}

impl Default for PunisherConfig {
    fn default() -> Self {
        Self {
            rotation_interval_ms: default_rotation_interval_ms(),
            artifact_lifetime_ms: default_artifact_lifetime_ms(),
            max_live_artifacts: default_max_live_artifacts(),
        }
    }
}

/// Display collaborator for punishment artifacts. The core only schedules;
/// rendering (popup windows, audio playback) happens here.
pub trait PunishmentSink: Send + Sync + 'static {
    /// Display one artifact. `id` identifies it for the later expiry call.
    fn show(&self, id: u64, path: &Path, kind: MediaKind);
    /// The artifact's lifetime elapsed; remove it.
    fn expire(&self, id: u64);
    /// Punishment stopped; remove everything immediately.
    fn clear(&self);
}

/// Idempotent controller for the background spam loop.
pub struct Punisher {
    config: PunisherConfig,
    rotation: Vec<PathBuf>,
    handle: Option<JoinHandle<()>>,
    cancel: Option<CancellationToken>,
    sink: Option<Arc<dyn PunishmentSink>>,
}

impl Punisher {
    /// Scan `media_dir` for usable artifacts and shuffle the rotation.
    /// A missing or empty folder leaves the punisher inert (logged, not an
    /// error - the original behaves the same way).
    pub fn new(config: PunisherConfig, media_dir: impl AsRef<Path>) -> Self {
        let mut rotation: Vec<PathBuf> = match std::fs::read_dir(media_dir.as_ref()) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| media_kind(p).is_some())
                .collect(),
            Err(err) => {
                log::warn!(
                    "punishment media folder {} unreadable: {err}",
                    media_dir.as_ref().display()
                );
                Vec::new()
            }
        };
        rotation.shuffle(&mut rand::thread_rng());
        Self {
            config,
            rotation,
            handle: None,
            cancel: None,
            sink: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Start the spam loop. A no-op when already active.
    pub fn start(&mut self, sink: Arc<dyn PunishmentSink>) {
        if self.handle.is_some() {
            return;
        }
        if self.rotation.is_empty() {
            log::warn!("no punishment media available, punishment is a no-op");
            return;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(spam_loop(
            self.config,
            self.rotation.clone(),
            sink.clone(),
            cancel.clone(),
        ));
        self.handle = Some(handle);
        self.cancel = Some(cancel);
        self.sink = Some(sink);
    }

    /// Stop immediately. A no-op when already stopped.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        // The worker observes the token on its next branch; the artifacts
        // disappear right now.
        if let Some(sink) = self.sink.take() {
            sink.clear();
        }
        self.handle = None;
    }
}

impl Drop for Punisher {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
    }
}

async fn spam_loop(
    config: PunisherConfig,
    rotation: Vec<PathBuf>,
    sink: Arc<dyn PunishmentSink>,
    cancel: CancellationToken,
) {
    let mut ticker = interval(Duration::from_millis(config.rotation_interval_ms));
    let live = Arc::new(AtomicUsize::new(0));
    let next_id = AtomicU64::new(0);
    let mut index = 0usize;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if live.load(Ordering::Acquire) >= config.max_live_artifacts {
                    continue;
                }
                let path = &rotation[index];
                index = (index + 1) % rotation.len();
                let kind = match media_kind(path) {
                    Some(kind) => kind,
                    None => continue,
                };
                let id = next_id.fetch_add(1, Ordering::Relaxed);
                live.fetch_add(1, Ordering::AcqRel);
                sink.show(id, path, kind);

                let live = live.clone();
                let sink = sink.clone();
                let cancel = cancel.clone();
                let lifetime = Duration::from_millis(config.artifact_lifetime_ms);
                tokio::spawn(async move {
                    tokio::select! {
                        _ = sleep(lifetime) => sink.expire(id),
                        _ = cancel.cancelled() => {}
                    }
                    live.fetch_sub(1, Ordering::AcqRel);
                });
            }
            _ = cancel.cancelled() => {
                log::info!("punishment loop shutting down");
                break;
            }
        }
    }
}

/// Observer adapter: wires the session's punishment edges to a [`Punisher`]
/// and its sink.
pub struct PunishmentDriver {
    punisher: Punisher,
    sink: Arc<dyn PunishmentSink>,
}

impl PunishmentDriver {
    pub fn new(punisher: Punisher, sink: Arc<dyn PunishmentSink>) -> Self {
        Self { punisher, sink }
    }
}

impl FocusObserver for PunishmentDriver {
    fn on_punishment_start(&mut self) {
        self.punisher.start(self.sink.clone());
    }

    fn on_punishment_stop(&mut self) {
        self.punisher.stop();
    }

    fn on_quota_exceeded(&mut self) {
        // The session is over; whatever is on screen goes away.
        self.punisher.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingSink {
        shown: AtomicUsize,
        expired: AtomicUsize,
        cleared: AtomicUsize,
    }

    impl PunishmentSink for CountingSink {
        fn show(&self, _id: u64, _path: &Path, _kind: MediaKind) {
            self.shown.fetch_add(1, Ordering::SeqCst);
        }
        fn expire(&self, _id: u64) {
            self.expired.fetch_add(1, Ordering::SeqCst);
        }
        fn clear(&self) {
            self.cleared.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn media_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.mp3", "c.gif", "ignored.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        dir
    }

    #[test]
    fn media_kind_routes_by_extension() {
        assert_eq!(media_kind(Path::new("x.PNG")), Some(MediaKind::Image));
        assert_eq!(media_kind(Path::new("x.ogg")), Some(MediaKind::Audio));
        assert_eq!(media_kind(Path::new("x.mkv")), Some(MediaKind::Video));
        assert_eq!(media_kind(Path::new("x.txt")), None);
        assert_eq!(media_kind(Path::new("noext")), None);
    }

    #[test]
    fn scan_skips_unknown_extensions() {
        let dir = media_dir();
        let punisher = Punisher::new(PunisherConfig::default(), dir.path());
        assert_eq!(punisher.rotation.len(), 3);
    }

    #[tokio::test]
    async fn start_and_stop_are_idempotent() {
        let dir = media_dir();
        let config = PunisherConfig {
            rotation_interval_ms: 5,
            artifact_lifetime_ms: 10,
            max_live_artifacts: 2,
        };
        let mut punisher = Punisher::new(config, dir.path());
        let sink = Arc::new(CountingSink::default());

        punisher.start(sink.clone());
        assert!(punisher.is_active());
        punisher.start(sink.clone());
        assert!(punisher.is_active());

        sleep(Duration::from_millis(100)).await;
        assert!(sink.shown.load(Ordering::SeqCst) >= 1);

        punisher.stop();
        assert!(!punisher.is_active());
        punisher.stop();
        assert_eq!(sink.cleared.load(Ordering::SeqCst), 1);

        // Nothing new shows after stop.
        let shown = sink.shown.load(Ordering::SeqCst);
        sleep(Duration::from_millis(50)).await;
        assert_eq!(sink.shown.load(Ordering::SeqCst), shown);
    }

    #[tokio::test]
    async fn live_cap_limits_concurrent_artifacts() {
        let dir = media_dir();
        let config = PunisherConfig {
            rotation_interval_ms: 5,
            // Lifetime far past the test window: nothing expires.
            artifact_lifetime_ms: 60_000,
            max_live_artifacts: 2,
        };
        let mut punisher = Punisher::new(config, dir.path());
        let sink = Arc::new(CountingSink::default());

        punisher.start(sink.clone());
        sleep(Duration::from_millis(100)).await;
        punisher.stop();

        assert!(sink.shown.load(Ordering::SeqCst) <= 2);
        assert_eq!(sink.expired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_media_folder_is_inert() {
        let mut punisher = Punisher::new(PunisherConfig::default(), "/nonexistent/media");
        let sink = Arc::new(CountingSink::default());
        punisher.start(sink.clone());
        assert!(!punisher.is_active());
        punisher.stop();
        assert_eq!(sink.shown.load(Ordering::SeqCst), 0);
    }
}
