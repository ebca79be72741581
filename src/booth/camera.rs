/**
 * ============================================================================
 * BOOTH CAMERA MODULE
 * ============================================================================
 *
 * PURPOSE: Live camera acquisition and single-frame grabs
 *
 * The sequencer talks to a CameraSource trait object so hosts can plug in
 * any capture backend; the built-in backend is a nokhwa webcam behind the
 * `webcam` feature. A source is an exclusively-owned handle: only the
 * sequencer starts and stops it, and stop() must release all device
 * tracks.
 *
 * ============================================================================
 */

use image::RgbaImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CameraError {
    // Permission denied or no device present; acquisition never started
    #[error("camera access failed: {0}")]
    Access(String),

    // The stream ended externally (device revoked or unplugged)
    #[error("camera stream ended")]
    Disconnected,

    #[error("frame decode failed: {0}")]
    Decode(String),
}

// A live video source the sequencer can grab frames from
pub trait CameraSource: Send {
    // Grab exactly one frame at the full current resolution
    fn grab_frame(&mut self) -> Result<RgbaImage, CameraError>;

    // Current stream resolution
    fn resolution(&self) -> (u32, u32);

    // Whether the stream is still live; false once revoked externally
    fn is_connected(&self) -> bool;

    // Stop the stream and release all device tracks
    fn stop(&mut self);
}

#[cfg(feature = "webcam")]
pub use webcam::WebcamCamera;

#[cfg(feature = "webcam")]
mod webcam {
    use super::{CameraError, CameraSource};
    use image::{DynamicImage, RgbaImage};
    use nokhwa::pixel_format::RgbFormat;
    use nokhwa::utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    };
    use nokhwa::Camera;

    // Front-facing webcam via nokhwa, requesting the preferred resolution
    // (the driver may negotiate the closest supported mode)
    pub struct WebcamCamera {
        camera: Camera,
        resolution: (u32, u32),
    }

    impl WebcamCamera {
        pub fn open(index: u32, width: u32, height: u32) -> Result<Self, CameraError> {
            let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
                CameraFormat::new_from(Resolution::new(width, height), FrameFormat::MJPEG, 30),
            ));

            let mut camera = Camera::new(CameraIndex::Index(index), requested)
                .map_err(|e| CameraError::Access(e.to_string()))?;
            camera
                .open_stream()
                .map_err(|e| CameraError::Access(e.to_string()))?;

            let negotiated = camera.resolution();
            let resolution = (negotiated.width(), negotiated.height());
            log::info!(
                "Webcam {} open at {}x{} (requested {}x{})",
                index,
                resolution.0,
                resolution.1,
                width,
                height
            );

            Ok(Self { camera, resolution })
        }
    }

    impl CameraSource for WebcamCamera {
        fn grab_frame(&mut self) -> Result<RgbaImage, CameraError> {
            if !self.camera.is_stream_open() {
                return Err(CameraError::Disconnected);
            }
            let buffer = self.camera.frame().map_err(|_| CameraError::Disconnected)?;
            let rgb = buffer
                .decode_image::<RgbFormat>()
                .map_err(|e| CameraError::Decode(e.to_string()))?;
            Ok(DynamicImage::ImageRgb8(rgb).to_rgba8())
        }

        fn resolution(&self) -> (u32, u32) {
            self.resolution
        }

        fn is_connected(&self) -> bool {
            self.camera.is_stream_open()
        }

        fn stop(&mut self) {
            if let Err(e) = self.camera.stop_stream() {
                log::warn!("Failed to stop webcam stream: {}", e);
            }
        }
    }

    impl Drop for WebcamCamera {
        fn drop(&mut self) {
            self.stop();
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{CameraError, CameraSource};
    use image::{Rgba, RgbaImage};
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Arc;

    // Deterministic camera for sequencer tests: each grab returns a solid
    // frame whose red channel is the grab number, so capture order is
    // visible in the session. Liveness can be pulled externally to model
    // a revoked device.
    pub struct TestCamera {
        width: u32,
        height: u32,
        grabs: Arc<AtomicU32>,
        connected: Arc<AtomicBool>,
        stopped: Arc<AtomicBool>,
        // Disconnect just before this grab number, if set
        fail_at_grab: Option<u32>,
    }

    impl TestCamera {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                grabs: Arc::new(AtomicU32::new(0)),
                connected: Arc::new(AtomicBool::new(true)),
                stopped: Arc::new(AtomicBool::new(false)),
                fail_at_grab: None,
            }
        }

        pub fn failing_at_grab(mut self, grab: u32) -> Self {
            self.fail_at_grab = Some(grab);
            self
        }

        // Handle that reports and controls liveness from outside
        pub fn connected_handle(&self) -> Arc<AtomicBool> {
            self.connected.clone()
        }

        pub fn stopped_handle(&self) -> Arc<AtomicBool> {
            self.stopped.clone()
        }
    }

    impl CameraSource for TestCamera {
        fn grab_frame(&mut self) -> Result<RgbaImage, CameraError> {
            let n = self.grabs.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(fail_at) = self.fail_at_grab {
                if n >= fail_at {
                    self.connected.store(false, Ordering::SeqCst);
                }
            }
            if !self.connected.load(Ordering::SeqCst) {
                return Err(CameraError::Disconnected);
            }
            Ok(RgbaImage::from_pixel(
                self.width,
                self.height,
                Rgba([n as u8, 0, 0, 255]),
            ))
        }

        fn resolution(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn is_connected(&self) -> bool {
            self.connected.load(Ordering::SeqCst)
        }

        fn stop(&mut self) {
            self.stopped.store(true, Ordering::SeqCst);
            self.connected.store(false, Ordering::SeqCst);
        }
    }
}
