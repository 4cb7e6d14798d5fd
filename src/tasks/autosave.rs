//! Autosave background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::{
    services::{save_timers, KeyValueStore},
    state::{ChainController, TimerRecord},
};

/// Writes the timer sequence back to the store after every change.
///
/// Write failures are logged and skipped; the in-memory chain stays
/// authoritative and the next change retries.
pub async fn autosave_task(controller: Arc<ChainController>, store: Arc<dyn KeyValueStore>) {
    info!("Starting autosave task");

    let mut state_rx = controller.subscribe();
    let mut last_saved: Option<Vec<TimerRecord>> = controller
        .snapshot()
        .ok()
        .map(|state| state.timers);

    loop {
        let timers = match state_rx.recv().await {
            Ok(state) => state.timers,
            Err(RecvError::Lagged(skipped)) => {
                debug!("Autosave lagged by {} updates, saving current state", skipped);
                match controller.snapshot() {
                    Ok(state) => state.timers,
                    Err(e) => {
                        warn!("Failed to read state for autosave: {}", e);
                        continue;
                    }
                }
            }
            Err(RecvError::Closed) => {
                info!("State channel closed, autosave exiting");
                return;
            }
        };

        if last_saved.as_ref() == Some(&timers) {
            continue;
        }
        save_now(store.as_ref(), &timers, &mut last_saved);
    }
}

/// Save `timers`, remembering them on success
fn save_now(
    store: &dyn KeyValueStore,
    timers: &[TimerRecord],
    last_saved: &mut Option<Vec<TimerRecord>>,
) {
    match save_timers(store, timers) {
        Ok(()) => {
            debug!("Saved {} timers", timers.len());
            *last_saved = Some(timers.to_vec());
        }
        Err(e) => warn!("Failed to save timers: {}", e),
    }
}
