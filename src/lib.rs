//! Photo-booth core: a timed 3-shot capture sequencer and a strip
//! compositor.
//!
//! The [`Sequencer`] drives camera acquisition and the countdown/capture
//! loop, emitting [`BoothEvent`]s for host UIs; once a session completes
//! it hands the shots to [`strip::compositor::compose`], which lays them
//! out on a decorated strip ready for PNG export.
//!
//! ```no_run
//! use photobooth::{BoothConfig, Sequencer};
//!
//! # async fn run() -> Result<(), photobooth::BoothError> {
//! let (mut booth, _events) = Sequencer::new(BoothConfig::default());
//! # #[cfg(feature = "webcam")]
//! booth.start_camera()?;
//! booth.run_sequence().await?;
//! let _exported = booth.export_strip()?;
//! # Ok(())
//! # }
//! ```

pub mod booth;
pub mod strip;

pub use booth::config::BoothConfig;
pub use booth::sequencer::Sequencer;
pub use booth::types::{
    BoothError, BoothEvent, BoothStatus, CaptureSession, CapturedImage, ExportError,
    SequenceOutcome, SequencerState, SHOT_COUNT,
};
pub use strip::compositor::{compose, CompositeError, CompositedStrip};
pub use strip::layout::{StripLayout, StripStyle};
