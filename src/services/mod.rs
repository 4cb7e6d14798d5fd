//! Services module
//!
//! Audio output, key-value storage, persistence of the timer sequence and
//! parsing of user-entered durations.

pub mod audio;
pub mod duration;
pub mod persistence;
pub mod storage;

// Re-export main types and functions
pub use audio::{default_cue, AudioCue, BellCue, RecordingCue, SilentCue};
#[cfg(feature = "tone")]
pub use audio::ToneCue;
pub use duration::{format_clock, parse_duration_input};
pub use persistence::{load_chain, load_timers, save_timers, STORAGE_KEY};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
