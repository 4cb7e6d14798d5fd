//! Chain state structure and management
//!
//! `ChainState` is the whole model of the chain timer: the ordered stages,
//! the pointer to the stage counting down and the running flag. Every
//! mutation here is a plain function of the current state and its
//! arguments; the one-second gate and observer notification live in
//! [`super::ChainController`].

use super::TimerRecord;
use crate::error::{ChainError, Result};

/// Chain state structure - holds every stage plus the countdown pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainState {
    pub timers: Vec<TimerRecord>,
    /// Stage currently counting down. Clamped to 0 on an empty chain.
    pub active_index: usize,
    pub is_running: bool,
}

/// Position of a stage relative to the active pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Done,
    Active,
    Pending,
}

/// What a single applied tick did to the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or no stage under the pointer
    Idle,
    /// The active stage lost one second and is still counting
    Decremented { index: usize, remaining: u32 },
    /// The active stage reached zero; `next` is the new active stage, or
    /// `None` when the chain finished
    Expired { index: usize, next: Option<usize> },
    /// Spent stages were passed over without counting
    Skipped { from: usize, to: Option<usize> },
}

impl TickOutcome {
    /// Whether the outcome should sound the audio cue
    pub fn is_expiry(&self) -> bool {
        matches!(self, TickOutcome::Expired { .. })
    }

    /// Whether the outcome changed the state
    pub fn changed(&self) -> bool {
        !matches!(self, TickOutcome::Idle)
    }
}

impl ChainState {
    /// Create a stopped chain positioned at the first stage
    pub fn new(timers: Vec<TimerRecord>) -> Self {
        Self {
            timers,
            active_index: 0,
            is_running: false,
        }
    }

    /// The single-stage chain used when nothing was persisted
    pub fn with_default_timer() -> Self {
        Self::new(vec![TimerRecord::default()])
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// The stage under the pointer, if the pointer is valid
    pub fn active_timer(&self) -> Option<&TimerRecord> {
        self.timers.get(self.active_index)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.timers.len() {
            Ok(())
        } else {
            Err(ChainError::IndexOutOfRange {
                index,
                len: self.timers.len(),
            })
        }
    }

    // Mutations

    /// Append "Timer N" with the default duration; returns its index
    pub fn add_timer(&mut self) -> usize {
        self.timers.push(TimerRecord::numbered(self.timers.len() + 1));
        self.timers.len() - 1
    }

    /// Remove the stage at `index`, pulling the pointer back when the
    /// removal happens at or before it
    pub fn remove_timer(&mut self, index: usize) -> Result<TimerRecord> {
        self.check_index(index)?;
        let removed = self.timers.remove(index);
        if index <= self.active_index {
            self.active_index = self.active_index.saturating_sub(1);
        }
        Ok(removed)
    }

    pub fn update_duration(&mut self, index: usize, duration: u32) -> Result<()> {
        self.check_index(index)?;
        self.timers[index].set_duration(duration);
        Ok(())
    }

    pub fn update_title(&mut self, index: usize, title: &str) -> Result<()> {
        self.check_index(index)?;
        self.timers[index].title = title.to_string();
        Ok(())
    }

    /// Rewind every stage and stop at the first one
    pub fn reset(&mut self) {
        for timer in &mut self.timers {
            timer.rewind();
        }
        self.active_index = 0;
        self.is_running = false;
    }

    pub fn start_from(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.active_index = index;
        self.is_running = true;
        Ok(())
    }

    /// Flip the running flag; returns the new value
    pub fn toggle_running(&mut self) -> bool {
        self.is_running = !self.is_running;
        self.is_running
    }

    /// Move the pointer to the next stage, or stop when there is none
    fn advance(&mut self) -> Option<usize> {
        if self.active_index + 1 < self.timers.len() {
            self.active_index += 1;
            Some(self.active_index)
        } else {
            self.is_running = false;
            None
        }
    }

    /// Apply one whole second to the active stage
    pub fn apply_tick(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Idle;
        }
        let index = self.active_index;
        let remaining = match self.timers.get_mut(index) {
            Some(timer) if timer.remaining > 0 => {
                timer.remaining -= 1;
                timer.remaining
            }
            _ => return TickOutcome::Idle,
        };

        if remaining > 0 {
            return TickOutcome::Decremented { index, remaining };
        }
        let next = self.advance();
        TickOutcome::Expired { index, next }
    }

    /// Pass over spent stages under the pointer while running.
    ///
    /// Covers zero-length stages and `start_from` on a stage that already
    /// ran out; neither counts as an expiry.
    pub fn skip_spent(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Idle;
        }
        let from = self.active_index;
        let mut skipped = false;
        while self.active_timer().is_some_and(TimerRecord::is_spent) {
            skipped = true;
            if self.advance().is_none() {
                break;
            }
        }
        if !skipped {
            return TickOutcome::Idle;
        }
        TickOutcome::Skipped {
            from,
            to: self.is_running.then_some(self.active_index),
        }
    }

    // Derived metrics

    pub fn current_remaining_seconds(&self) -> u32 {
        self.active_timer().map(|t| t.remaining).unwrap_or(0)
    }

    pub fn current_progress_percent(&self) -> f64 {
        self.active_timer()
            .map(TimerRecord::progress_percent)
            .unwrap_or(100.0)
    }

    pub fn total_remaining_seconds(&self) -> u64 {
        self.timers.iter().map(|t| u64::from(t.remaining)).sum()
    }

    pub fn total_duration_seconds(&self) -> u64 {
        self.timers.iter().map(|t| u64::from(t.duration)).sum()
    }

    pub fn total_progress_percent(&self) -> f64 {
        if self.active_timer().is_none() {
            return 100.0;
        }
        let total = self.total_duration_seconds();
        if total == 0 {
            return 0.0;
        }
        100.0 * self.total_remaining_seconds() as f64 / total as f64
    }

    pub fn stage_status(&self, index: usize) -> StageStatus {
        use std::cmp::Ordering;
        match index.cmp(&self.active_index) {
            Ordering::Less => StageStatus::Done,
            Ordering::Equal => StageStatus::Active,
            Ordering::Greater => StageStatus::Pending,
        }
    }
}

impl Default for ChainState {
    fn default() -> Self {
        Self::with_default_timer()
    }
}
