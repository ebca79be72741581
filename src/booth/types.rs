/**
 * ============================================================================
 * BOOTH TYPES MODULE
 * ============================================================================
 *
 * PURPOSE: Data structures for the capture-sequence state machine
 *
 * TYPES:
 * - CaptureSession: ordered shots for one strip (fixed capacity)
 * - CapturedImage: immutable frame grabbed from the live camera
 * - SequencerState: state machine position
 * - BoothEvent: user-visible feedback emitted at each transition
 * - BoothStatus: serializable snapshot for host UIs
 * - BoothError / ExportError: error taxonomy
 *
 * Strip layout and compositing types are in strip/.
 *
 * ============================================================================
 */

use chrono::{DateTime, Utc};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::booth::camera::CameraError;
use crate::strip::compositor::CompositeError;

// Number of shots in one strip
pub const SHOT_COUNT: usize = 3;

// Countdown ticks before each shot (seconds, fixed 1s cadence)
pub const DEFAULT_COUNTDOWN_TICKS: u32 = 3;

// Pause between a capture and the next countdown (milliseconds)
pub const DEFAULT_SHOT_PAUSE_MS: u64 = 1000;

// One frame grabbed from the live camera at a single instant.
// Immutable once captured; the pixel buffer is never exposed mutably.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    // 1-based position within the strip
    index: u32,
    taken_at: DateTime<Utc>,
    pixels: RgbaImage,
}

impl CapturedImage {
    pub fn new(index: u32, taken_at: DateTime<Utc>, pixels: RgbaImage) -> Self {
        Self {
            index,
            taken_at,
            pixels,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

// The ordered shots for one strip. Owned exclusively by the Sequencer:
// created when a sequence starts, cleared on reset.
#[derive(Debug, Default)]
pub struct CaptureSession {
    shots: Vec<CapturedImage>,
    completed: bool,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self {
            shots: Vec::with_capacity(SHOT_COUNT),
            completed: false,
        }
    }

    // Append a shot in capture order. The session never holds more than
    // SHOT_COUNT images.
    pub fn push_shot(&mut self, shot: CapturedImage) -> Result<(), BoothError> {
        if self.shots.len() >= SHOT_COUNT {
            return Err(BoothError::SessionFull);
        }
        self.shots.push(shot);
        if self.shots.len() == SHOT_COUNT {
            self.completed = true;
        }
        Ok(())
    }

    pub fn shots(&self) -> &[CapturedImage] {
        &self.shots
    }

    pub fn count(&self) -> usize {
        self.shots.len()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn clear(&mut self) {
        self.shots.clear();
        self.completed = false;
    }
}

// State machine position of the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencerState {
    // No camera
    Idle,
    // Camera live, no capture in progress
    Ready,
    // Countdown active
    Counting,
    // Frame grab + flash + shutter feedback
    Capturing,
    // All shots taken, strip composed
    Complete,
}

// How a capture sequence ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOutcome {
    // All shots taken and the strip composed
    Completed,
    // User stopped the camera mid-sequence
    Cancelled,
    // The camera stream ended externally mid-sequence
    CameraLost,
}

// User-visible feedback, emitted on the event channel at the same points
// the original sequence updated its indicators. Hosts map these to their
// own countdown text, progress display and button enablement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoothEvent {
    // Camera acquired at the given resolution; capture actions enabled
    CameraStarted { width: u32, height: u32 },
    // Camera released by the user; capture actions disabled
    CameraStopped,
    // Camera stream ended externally; capture actions disabled
    CameraLost,
    // Countdown display: remaining whole seconds before the next shot
    CountdownTick { remaining: u32 },
    // Visual flash at the instant of frame grab
    Flash,
    // Progress display: shot `index` of `total` captured
    ShotCaptured { index: u32, total: u32 },
    // All shots taken; strip composed and export enabled
    StripReady,
    // Session cleared; export disabled
    SessionReset,
}

// Serializable status snapshot for host UIs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoothStatus {
    pub state: SequencerState,
    pub camera_live: bool,
    pub shots_taken: u32,
    pub shots_total: u32,
    pub strip_ready: bool,
}

// Errors surfaced by sequencer operations
#[derive(Debug, Error)]
pub enum BoothError {
    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error("no live camera; start the camera first")]
    NoCamera,

    #[error("capture session already holds {SHOT_COUNT} shots")]
    SessionFull,

    #[error(transparent)]
    Composite(#[from] CompositeError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

// Errors while writing a strip to disk
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write strip: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode strip: {0}")]
    Encode(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn shot(index: u32) -> CapturedImage {
        CapturedImage::new(index, Utc::now(), RgbaImage::new(4, 4))
    }

    #[test]
    fn test_session_starts_empty() {
        let session = CaptureSession::new();
        assert_eq!(session.count(), 0);
        assert!(!session.is_completed());
    }

    #[test]
    fn test_session_completes_at_shot_count() {
        let mut session = CaptureSession::new();
        for i in 1..=SHOT_COUNT as u32 {
            session.push_shot(shot(i)).unwrap();
            assert_eq!(session.count(), i as usize);
        }
        assert!(session.is_completed());
    }

    #[test]
    fn test_session_rejects_overflow() {
        let mut session = CaptureSession::new();
        for i in 1..=SHOT_COUNT as u32 {
            session.push_shot(shot(i)).unwrap();
        }
        assert!(matches!(
            session.push_shot(shot(99)),
            Err(BoothError::SessionFull)
        ));
        assert_eq!(session.count(), SHOT_COUNT);
    }

    #[test]
    fn test_session_preserves_capture_order() {
        let mut session = CaptureSession::new();
        for i in 1..=SHOT_COUNT as u32 {
            session.push_shot(shot(i)).unwrap();
        }
        let indices: Vec<u32> = session.shots().iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_session_clear_resets_completion() {
        let mut session = CaptureSession::new();
        for i in 1..=SHOT_COUNT as u32 {
            session.push_shot(shot(i)).unwrap();
        }
        session.clear();
        assert_eq!(session.count(), 0);
        assert!(!session.is_completed());
    }
}
