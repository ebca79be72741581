/**
 * ============================================================================
 * BOOTH SEQUENCER MODULE
 * ============================================================================
 *
 * PURPOSE: The capture-sequence state machine
 *
 * STATES: Idle -> Ready -> Counting -> Capturing -> (Ready loop | Complete)
 *
 * SEQUENCE FLOW:
 * 1. start_camera -> Ready (stays Idle and surfaces the error on failure)
 * 2. run_sequence -> three cycles of countdown + frame grab, with flash
 *    and best-effort shutter cue per shot and a fixed pause between shots
 * 3. On the third shot -> Complete: the strip is composed and stored,
 *    enabling export
 *
 * One logical thread of control: the cycles are strictly sequential and
 * the camera handle is exclusively owned. Countdown ticks race a
 * cancellation token so stopping the camera never leaks a pending timer.
 * All user-visible feedback goes out as BoothEvents on the channel handed
 * to the caller at construction.
 *
 * ============================================================================
 */

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::booth::audio::ShutterCue;
use crate::booth::camera::{CameraError, CameraSource};
use crate::booth::config::BoothConfig;
use crate::booth::storage;
use crate::booth::types::{
    BoothError, BoothEvent, BoothStatus, CaptureSession, CapturedImage, SequenceOutcome,
    SequencerState, SHOT_COUNT,
};
use crate::strip::compositor::{self, CompositedStrip};
use crate::strip::layout::StripLayout;

// How one countdown or pause phase ended
enum CyclePhase {
    Proceed,
    Cancelled,
    CameraLost,
}

// The capture sequencer. Owns the camera handle, the capture session and
// the composited strip; explicit lifecycle via new() and dispose().
pub struct Sequencer {
    config: BoothConfig,
    camera: Option<Box<dyn CameraSource>>,
    session: CaptureSession,
    strip: Option<CompositedStrip>,
    state: SequencerState,
    events: mpsc::UnboundedSender<BoothEvent>,
    shutter: ShutterCue,
    cancel: CancellationToken,
}

impl Sequencer {
    // Create a sequencer and the event channel hosts render feedback from
    pub fn new(config: BoothConfig) -> (Self, mpsc::UnboundedReceiver<BoothEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shutter = ShutterCue::new(config.shutter_sound.clone());
        (
            Self {
                config,
                camera: None,
                session: CaptureSession::new(),
                strip: None,
                state: SequencerState::Idle,
                events: tx,
                shutter,
                cancel: CancellationToken::new(),
            },
            rx,
        )
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    pub fn strip(&self) -> Option<&CompositedStrip> {
        self.strip.as_ref()
    }

    // Handle for requesting a stop from outside a running sequence; the
    // sequence observes it at its next suspension point, stops the camera
    // and falls back to Idle. A fired handle is spent: re-acquire after
    // every stop.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    // Acquire the default webcam at the configured resolution
    #[cfg(feature = "webcam")]
    pub fn start_camera(&mut self) -> Result<(), BoothError> {
        match crate::booth::camera::WebcamCamera::open(
            0,
            self.config.preferred_width,
            self.config.preferred_height,
        ) {
            Ok(camera) => {
                self.start_camera_with(Box::new(camera));
                Ok(())
            }
            Err(e) => {
                // Acquisition failed: surface the error, remain Idle
                log::error!("Camera acquisition failed: {}", e);
                Err(e.into())
            }
        }
    }

    // Attach an already-open camera source: Idle -> Ready
    pub fn start_camera_with(&mut self, camera: Box<dyn CameraSource>) {
        if self.camera.is_some() {
            self.stop_camera();
        }
        let (width, height) = camera.resolution();
        self.camera = Some(camera);
        self.state = SequencerState::Ready;
        let _ = self.events.send(BoothEvent::CameraStarted { width, height });
        log::info!("Camera live at {}x{}", width, height);
    }

    // Release the camera: halts any pending countdown tick and returns to
    // Idle, disabling capture actions
    pub fn stop_camera(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        if self.release_camera() {
            let _ = self.events.send(BoothEvent::CameraStopped);
            log::info!("Camera stopped");
        }
        self.state = SequencerState::Idle;
    }

    // Detect a stream that ended externally (device revoked). Returns
    // whether a live camera remains; on loss falls back to Idle without
    // clearing captured data.
    pub fn check_camera(&mut self) -> bool {
        match &self.camera {
            None => false,
            Some(camera) if camera.is_connected() => true,
            Some(_) => {
                log::warn!("Camera stream ended externally");
                self.release_camera();
                self.state = SequencerState::Idle;
                let _ = self.events.send(BoothEvent::CameraLost);
                false
            }
        }
    }

    // Run the full capture sequence: three countdown + capture cycles,
    // then compose the strip. Any prior session is implicitly reset.
    pub async fn run_sequence(&mut self) -> Result<SequenceOutcome, BoothError> {
        if !self.check_camera() {
            return Err(BoothError::NoCamera);
        }
        if self.session.count() > 0 || self.strip.is_some() {
            self.reset();
        }

        let cancel = self.cancel.clone();
        log::info!("Starting capture sequence ({} shots)", SHOT_COUNT);

        for shot_index in 1..=SHOT_COUNT as u32 {
            self.state = SequencerState::Counting;
            match self.run_countdown(&cancel).await {
                CyclePhase::Proceed => {}
                CyclePhase::Cancelled => return Ok(self.finish_cancelled()),
                CyclePhase::CameraLost => return Ok(self.finish_camera_lost()),
            }

            self.state = SequencerState::Capturing;
            let camera = self.camera.as_mut().ok_or(BoothError::NoCamera)?;
            let frame = match camera.grab_frame() {
                Ok(frame) => frame,
                Err(CameraError::Disconnected) => return Ok(self.finish_camera_lost()),
                Err(e) => {
                    // Grab faulted but the stream may still be live; give
                    // the user back control instead of tearing down
                    log::error!("Frame grab failed: {}", e);
                    self.state = SequencerState::Ready;
                    return Err(e.into());
                }
            };

            let _ = self.events.send(BoothEvent::Flash);
            self.session
                .push_shot(CapturedImage::new(shot_index, Utc::now(), frame))?;
            let _ = self.events.send(BoothEvent::ShotCaptured {
                index: shot_index,
                total: SHOT_COUNT as u32,
            });
            log::info!("Captured shot {}/{}", shot_index, SHOT_COUNT);
            self.shutter.play_best_effort();

            if (shot_index as usize) < SHOT_COUNT {
                self.state = SequencerState::Ready;
                match self
                    .run_pause(&cancel, Duration::from_millis(self.config.shot_pause_ms))
                    .await
                {
                    CyclePhase::Proceed => {}
                    CyclePhase::Cancelled => return Ok(self.finish_cancelled()),
                    CyclePhase::CameraLost => return Ok(self.finish_camera_lost()),
                }
            }
        }

        self.state = SequencerState::Complete;
        let layout = StripLayout::for_style(self.config.style);
        let strip = compositor::compose(self.session.shots(), &layout)?;
        self.strip = Some(strip);
        let _ = self.events.send(BoothEvent::StripReady);
        log::info!("Capture sequence complete; strip ready for export");
        Ok(SequenceOutcome::Completed)
    }

    // Clear session and strip. Lands in Ready when the camera is still
    // live, Idle otherwise; export is disabled either way.
    pub fn reset(&mut self) {
        self.session.clear();
        self.strip = None;
        self.state = if self.check_camera() {
            SequencerState::Ready
        } else {
            SequencerState::Idle
        };
        let _ = self.events.send(BoothEvent::SessionReset);
        log::info!("Session reset");
    }

    // Export the composited strip to the configured directory. Guarded
    // no-op (Ok(None)) while no completed strip exists.
    pub fn export_strip(&self) -> Result<Option<PathBuf>, BoothError> {
        let dir = self
            .config
            .export_dir
            .clone()
            .unwrap_or_else(storage::default_export_dir);
        self.export_strip_to(&dir)
    }

    pub fn export_strip_to(&self, dir: &Path) -> Result<Option<PathBuf>, BoothError> {
        let Some(strip) = &self.strip else {
            log::info!("No completed strip to export; ignoring");
            return Ok(None);
        };
        let path = storage::write_strip(strip, dir)?;
        Ok(Some(path))
    }

    // Status snapshot for host UIs
    pub fn status(&self) -> BoothStatus {
        BoothStatus {
            state: self.state,
            camera_live: self
                .camera
                .as_ref()
                .is_some_and(|c| c.is_connected()),
            shots_taken: self.session.count() as u32,
            shots_total: SHOT_COUNT as u32,
            strip_ready: self.strip.is_some(),
        }
    }

    // Explicit teardown: release the camera and cancel pending timers
    pub fn dispose(&mut self) {
        self.cancel.cancel();
        self.release_camera();
        self.state = SequencerState::Idle;
    }

    // 3-tick countdown at a fixed 1s cadence, emitting each tick. Watches
    // camera liveness per tick and races the cancellation token so no
    // timer outlives a stop request.
    async fn run_countdown(&mut self, cancel: &CancellationToken) -> CyclePhase {
        for remaining in (1..=self.config.countdown_ticks).rev() {
            if !self.camera_connected() {
                return CyclePhase::CameraLost;
            }
            let _ = self.events.send(BoothEvent::CountdownTick { remaining });
            tokio::select! {
                _ = cancel.cancelled() => return CyclePhase::Cancelled,
                _ = sleep(Duration::from_secs(1)) => {}
            }
        }
        if !self.camera_connected() {
            return CyclePhase::CameraLost;
        }
        CyclePhase::Proceed
    }

    // Fixed pause between a capture and the next countdown
    async fn run_pause(&mut self, cancel: &CancellationToken, duration: Duration) -> CyclePhase {
        tokio::select! {
            _ = cancel.cancelled() => return CyclePhase::Cancelled,
            _ = sleep(duration) => {}
        }
        if self.camera_connected() {
            CyclePhase::Proceed
        } else {
            CyclePhase::CameraLost
        }
    }

    fn camera_connected(&self) -> bool {
        self.camera.as_ref().is_some_and(|c| c.is_connected())
    }

    // User-requested stop observed mid-sequence
    fn finish_cancelled(&mut self) -> SequenceOutcome {
        log::info!("Capture sequence cancelled; stopping camera");
        self.cancel = CancellationToken::new();
        self.release_camera();
        self.state = SequencerState::Idle;
        let _ = self.events.send(BoothEvent::CameraStopped);
        SequenceOutcome::Cancelled
    }

    // Stream ended externally mid-sequence; captured data is kept
    fn finish_camera_lost(&mut self) -> SequenceOutcome {
        log::warn!("Camera stream ended during capture sequence");
        self.release_camera();
        self.state = SequencerState::Idle;
        let _ = self.events.send(BoothEvent::CameraLost);
        SequenceOutcome::CameraLost
    }

    fn release_camera(&mut self) -> bool {
        match self.camera.take() {
            Some(mut camera) => {
                camera.stop();
                true
            }
            None => false,
        }
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.release_camera();
    }
}
