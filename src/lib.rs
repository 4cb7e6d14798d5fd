//! Chain Timer - named countdown timers run back to back
//!
//! This library provides the chain state model and its controller, the
//! one-second tick driver, persistence of the timer sequence, the expiry
//! audio cue and a terminal front end.

pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{ChainError, Result};
pub use state::{ChainController, ChainState, TimerRecord};
pub use ui::run_ui;
pub use utils::signals::shutdown_signal;
