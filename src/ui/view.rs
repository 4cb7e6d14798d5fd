//! View model derived from the chain state

use crate::{
    services::format_clock,
    state::{ChainState, StageStatus},
};

/// One row of the stage list
#[derive(Debug, Clone, PartialEq)]
pub struct StageRow {
    pub index: usize,
    pub title: String,
    pub duration: u32,
    pub remaining: u32,
    /// Remaining time as `MM:SS`
    pub clock: String,
    pub status: StageStatus,
}

/// Everything the screen shows, recomputed from scratch on every change
#[derive(Debug, Clone, PartialEq)]
pub struct ChainView {
    pub rows: Vec<StageRow>,
    pub active_index: usize,
    pub is_running: bool,
    pub current_remaining_seconds: u32,
    pub current_progress_percent: f64,
    pub total_remaining_seconds: u64,
    pub total_progress_percent: f64,
}

impl ChainView {
    /// Ratio in `0.0..=1.0` for a gauge
    pub fn current_ratio(&self) -> f64 {
        (self.current_progress_percent / 100.0).clamp(0.0, 1.0)
    }

    pub fn total_ratio(&self) -> f64 {
        (self.total_progress_percent / 100.0).clamp(0.0, 1.0)
    }

    /// Whether every stage has run out
    pub fn is_complete(&self) -> bool {
        !self.is_running && !self.rows.is_empty() && self.rows.iter().all(|r| r.remaining == 0)
    }
}

impl From<&ChainState> for ChainView {
    fn from(state: &ChainState) -> Self {
        let rows = state
            .timers
            .iter()
            .enumerate()
            .map(|(index, timer)| StageRow {
                index,
                title: timer.title.clone(),
                duration: timer.duration,
                remaining: timer.remaining,
                clock: format_clock(u64::from(timer.remaining)),
                status: state.stage_status(index),
            })
            .collect();

        Self {
            rows,
            active_index: state.active_index,
            is_running: state.is_running,
            current_remaining_seconds: state.current_remaining_seconds(),
            current_progress_percent: state.current_progress_percent(),
            total_remaining_seconds: state.total_remaining_seconds(),
            total_progress_percent: state.total_progress_percent(),
        }
    }
}
