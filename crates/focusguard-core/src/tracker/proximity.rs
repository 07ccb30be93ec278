//! Camera-distance heuristic for the break timer.
//!
//! Unlike the focus machine this is a stateless per-frame classifier: a
//! face bounding box wider than the cutoff means the user is sitting too
//! close to the screen. It never feeds the distraction count.

use serde::{Deserialize, Serialize};

/// Immediate per-frame label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityLabel {
    NoFace,
    TooClose,
    Ok,
}

/// Reference frame width the default cutoff was tuned against.
pub const REFERENCE_FRAME_WIDTH: u32 = 300;

/// Default face-width cutoff in a 300 px wide frame.
pub const DEFAULT_CUTOFF_WIDTH: u32 = 120;

/// Stateless proximity classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProximityClassifier {
    /// Width of the frames being classified, in pixels.
    #[serde(default = "default_frame_width")]
    pub frame_width: u32,
    /// Face-width cutoff at the reference frame width.
    #[serde(default = "default_cutoff_width")]
    pub cutoff_width: u32,
}

fn default_frame_width() -> u32 {
    REFERENCE_FRAME_WIDTH
}

fn default_cutoff_width() -> u32 {
    DEFAULT_CUTOFF_WIDTH
}

impl Default for ProximityClassifier {
    fn default() -> Self {
        Self {
            frame_width: REFERENCE_FRAME_WIDTH,
            cutoff_width: DEFAULT_CUTOFF_WIDTH,
        }
    }
}

impl ProximityClassifier {
    pub fn new(frame_width: u32, cutoff_width: u32) -> Self {
        Self {
            frame_width,
            cutoff_width,
        }
    }

    /// Cutoff scaled to the configured frame width.
    pub fn effective_cutoff(&self) -> u32 {
        (self.cutoff_width as u64 * self.frame_width as u64 / REFERENCE_FRAME_WIDTH as u64) as u32
    }

    /// Classify one frame's widest face box, if any.
    pub fn classify(&self, face_width: Option<u32>) -> ProximityLabel {
        match face_width {
            None => ProximityLabel::NoFace,
            Some(w) if w > self.effective_cutoff() => ProximityLabel::TooClose,
            Some(_) => ProximityLabel::Ok,
        }
    }
}
