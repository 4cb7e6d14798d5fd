//! Chain Timer - named countdown timers run back to back
//!
//! This is the main entry point for the chain-timer application.

use std::{fs, sync::{Arc, Mutex}};
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use chain_timer::{
    config::Config,
    services::{default_cue, load_chain, save_timers, FileStore, KeyValueStore},
    state::{ChainController, ChainState},
    tasks::{autosave_task, tick_driver_task},
    ui::run_ui,
    utils::shutdown_signal,
};

/// Log to a file; the terminal belongs to the UI
fn init_tracing(config: &Config) {
    let log_path = config.resolve_log_file();
    let opened = log_path
        .parent()
        .map(fs::create_dir_all)
        .transpose()
        .and_then(|_| fs::OpenOptions::new().create(true).append(true).open(&log_path));

    let writer = match opened {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(_) => BoxMakeWriter::new(std::io::sink),
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("chain_timer={}", config.log_level()))
        .with_writer(writer)
        .with_ansi(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(&config);

    info!("Starting chain-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: persist={}, sound={}, sample={:?}",
        !config.no_persist,
        !config.no_sound,
        config.sample_interval()
    );

    let store: Option<Arc<dyn KeyValueStore>> = if config.no_persist {
        None
    } else {
        let dir = config.resolve_state_dir();
        info!("State directory: {}", dir.display());
        Some(Arc::new(FileStore::new(dir)))
    };

    let initial = match &store {
        Some(store) => load_chain(store.as_ref()),
        None => ChainState::with_default_timer(),
    };

    let controller = Arc::new(ChainController::new(
        initial,
        default_cue(config.no_sound),
        config.sample_interval(),
    ));

    // Start the background tasks
    let driver = tokio::spawn(tick_driver_task(Arc::clone(&controller)));
    let autosave = store
        .clone()
        .map(|store| tokio::spawn(autosave_task(Arc::clone(&controller), store)));

    let result = tokio::select! {
        result = run_ui(Arc::clone(&controller)) => result,
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
            Ok(())
        }
    };

    // Tear down the periodic trigger before the final save
    driver.abort();
    if let Some(autosave) = autosave {
        autosave.abort();
    }

    if let Some(store) = &store {
        match controller.snapshot() {
            Ok(state) => {
                if let Err(e) = save_timers(store.as_ref(), &state.timers) {
                    warn!("Final save failed: {}", e);
                }
            }
            Err(e) => warn!("Failed to read state for final save: {}", e),
        }
    }

    info!("Shutdown complete after {}", controller.get_uptime());
    result.map_err(Into::into)
}
