//! Timer record: one stage of the chain

use serde::{Deserialize, Serialize};

/// Default length of a newly added stage, in seconds
pub const DEFAULT_DURATION_SECS: u32 = 60;

/// One named countdown stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerRecord {
    pub title: String,
    /// Configured length in whole seconds
    pub duration: u32,
    /// Seconds left, always within `0..=duration`
    pub remaining: u32,
}

impl TimerRecord {
    /// Create a stage with its full duration remaining
    pub fn new(title: impl Into<String>, duration: u32) -> Self {
        Self {
            title: title.into(),
            duration,
            remaining: duration,
        }
    }

    /// Default stage for position `number` (1-based), e.g. "Timer 3"
    pub fn numbered(number: usize) -> Self {
        Self::new(format!("Timer {}", number), DEFAULT_DURATION_SECS)
    }

    /// Set a new duration and re-synchronize `remaining` with it
    pub fn set_duration(&mut self, duration: u32) {
        self.duration = duration;
        self.remaining = duration;
    }

    /// Restore the full duration
    pub fn rewind(&mut self) {
        self.remaining = self.duration;
    }

    /// Whether the stage has nothing left to count down
    pub fn is_spent(&self) -> bool {
        self.remaining == 0
    }

    /// Clamp `remaining` back into `0..=duration`
    pub fn normalize(mut self) -> Self {
        self.remaining = self.remaining.min(self.duration);
        self
    }

    /// Remaining time as a percentage of the duration.
    ///
    /// A zero-length stage reports 0%.
    pub fn progress_percent(&self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        100.0 * self.remaining as f64 / self.duration as f64
    }
}

impl Default for TimerRecord {
    fn default() -> Self {
        Self::numbered(1)
    }
}
