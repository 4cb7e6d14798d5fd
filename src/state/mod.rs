//! State management module
//!
//! This module contains the chain model and the controller that owns it.

pub mod chain_controller;
pub mod chain_state;
pub mod timer_record;

// Re-export main types
pub use chain_controller::{ChainController, TICK_PERIOD};
pub use chain_state::{ChainState, StageStatus, TickOutcome};
pub use timer_record::{TimerRecord, DEFAULT_DURATION_SECS};
