/**
 * ============================================================================
 * BOOTH AUDIO MODULE
 * ============================================================================
 *
 * PURPOSE: Best-effort shutter sound on each capture
 *
 * Playback failures are logged and swallowed; the capture sequence never
 * waits on or fails because of audio. Without the `audio` feature the cue
 * is a no-op.
 *
 * ============================================================================
 */

use std::path::PathBuf;

// Shutter cue configured with an optional sound file. No file, no sound.
#[derive(Debug, Clone, Default)]
pub struct ShutterCue {
    sound: Option<PathBuf>,
}

impl ShutterCue {
    pub fn new(sound: Option<PathBuf>) -> Self {
        Self { sound }
    }

    // Fire the cue. Returns immediately; playback runs out-of-band and
    // any failure is non-fatal.
    pub fn play_best_effort(&self) {
        let Some(path) = self.sound.clone() else {
            return;
        };

        #[cfg(feature = "audio")]
        {
            // Audio device handles are not Send, so playback gets its own
            // short-lived thread that owns them end to end.
            std::thread::spawn(move || {
                if let Err(e) = playback::play_file(&path) {
                    log::warn!("Shutter sound failed (ignored): {}", e);
                }
            });
        }

        #[cfg(not(feature = "audio"))]
        {
            log::debug!(
                "Shutter sound {} skipped: crate built without the audio feature",
                path.display()
            );
        }
    }
}

#[cfg(feature = "audio")]
mod playback {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;

    pub fn play_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let (_stream, handle) = rodio::OutputStream::try_default()?;
        let sink = rodio::Sink::try_new(&handle)?;
        let source = rodio::Decoder::new(BufReader::new(File::open(path)?))?;
        sink.append(source);
        // Keep the output stream alive until the cue finishes
        sink.sleep_until_end();
        Ok(())
    }
}
