//! Audio cue played when a stage runs out

use std::{
    io::Write,
    sync::atomic::{AtomicUsize, Ordering},
};
use tracing::debug;

/// Fire-and-forget expiry sound.
///
/// Implementations must return promptly and swallow every failure.
pub trait AudioCue: Send + Sync + std::fmt::Debug {
    fn play(&self);
}

/// Rings the terminal bell on stderr
#[derive(Debug, Default)]
pub struct BellCue;

impl AudioCue for BellCue {
    fn play(&self) {
        let mut stderr = std::io::stderr();
        if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
            debug!("Terminal bell unavailable: {}", e);
        }
    }
}

/// Plays nothing
#[derive(Debug, Default)]
pub struct SilentCue;

impl AudioCue for SilentCue {
    fn play(&self) {
        debug!("Audio cue muted");
    }
}

/// Counts plays instead of making a sound
#[derive(Debug, Default)]
pub struct RecordingCue {
    plays: AtomicUsize,
}

impl RecordingCue {
    pub fn count(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl AudioCue for RecordingCue {
    fn play(&self) {
        self.plays.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(feature = "tone")]
pub use tone::ToneCue;

#[cfg(feature = "tone")]
mod tone {
    use std::time::Duration;
    use rodio::{source::SineWave, OutputStream, Sink, Source};
    use tracing::{debug, warn};

    use super::{AudioCue, BellCue};

    pub const TONE_HZ: f32 = 440.0;
    pub const TONE_LENGTH: Duration = Duration::from_millis(200);

    /// Synthesized 440 Hz sine tone, falling back to the terminal bell when
    /// no audio output can be opened
    #[derive(Debug, Default)]
    pub struct ToneCue;

    impl AudioCue for ToneCue {
        fn play(&self) {
            // The output stream must outlive playback, so it lives on its own thread
            let spawned = std::thread::Builder::new()
                .name("tone".to_string())
                .spawn(|| {
                    let (_stream, handle) = match OutputStream::try_default() {
                        Ok(output) => output,
                        Err(e) => {
                            debug!("No audio output, ringing the bell: {}", e);
                            BellCue.play();
                            return;
                        }
                    };
                    match Sink::try_new(&handle) {
                        Ok(sink) => {
                            sink.append(
                                SineWave::new(TONE_HZ)
                                    .take_duration(TONE_LENGTH)
                                    .amplify(0.20),
                            );
                            sink.sleep_until_end();
                        }
                        Err(e) => {
                            debug!("Failed to open audio sink, ringing the bell: {}", e);
                            BellCue.play();
                        }
                    }
                });
            if let Err(e) = spawned {
                warn!("Failed to spawn tone thread: {}", e);
            }
        }
    }
}

/// Pick the cue for the current build and settings
pub fn default_cue(muted: bool) -> std::sync::Arc<dyn AudioCue> {
    if muted {
        return std::sync::Arc::new(SilentCue);
    }
    #[cfg(feature = "tone")]
    {
        std::sync::Arc::new(ToneCue)
    }
    #[cfg(not(feature = "tone"))]
    {
        std::sync::Arc::new(BellCue)
    }
}
