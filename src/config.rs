//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

const APP_DIR: &str = "chain-timer";
const LOG_FILE: &str = "chain-timer.log";

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "chain-timer")]
#[command(about = "Run named countdown timers back to back")]
#[command(version)]
pub struct Config {
    /// Directory holding the saved chain
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Keep the chain in memory only
    #[arg(long)]
    pub no_persist: bool,

    /// Disable the expiry sound
    #[arg(long)]
    pub no_sound: bool,

    /// Clock sampling interval of the tick driver, in milliseconds
    #[arg(long, default_value = "100")]
    pub sample_ms: u64,

    /// Log file (defaults to chain-timer.log in the state directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Sampling interval, kept between 10 ms and one second
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_ms.clamp(10, 1000))
    }

    pub fn resolve_state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR)))
        })
    }

    pub fn resolve_log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.resolve_state_dir().join(LOG_FILE))
    }
}
