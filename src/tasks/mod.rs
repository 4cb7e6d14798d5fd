//! Background tasks module
//!
//! This module contains background tasks that run alongside the terminal UI.

pub mod autosave;
pub mod tick_driver;

// Re-export main functions
pub use autosave::autosave_task;
pub use tick_driver::tick_driver_task;
