// Capture-sequence subsystem: camera acquisition, the timed shot loop,
// configuration, shutter feedback and strip export.

pub mod audio;
pub mod camera;
pub mod config;
pub mod sequencer;
pub mod storage;
pub mod types;
