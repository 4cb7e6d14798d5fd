//! Loading and saving the timer sequence

use tracing::{info, warn};

use super::KeyValueStore;
use crate::{
    error::Result,
    state::{ChainState, TimerRecord},
};

/// Key the serialized timer sequence lives under
pub const STORAGE_KEY: &str = "chainTimersState";

/// Load the persisted chain, falling back to the single default timer
/// when nothing usable is stored
pub fn load_chain(store: &dyn KeyValueStore) -> ChainState {
    match load_timers(store) {
        Ok(Some(timers)) => {
            info!("Loaded {} timers from storage", timers.len());
            ChainState::new(timers)
        }
        Ok(None) => {
            info!("No stored timers, starting with default chain");
            ChainState::with_default_timer()
        }
        Err(e) => {
            warn!("Ignoring unreadable stored timers: {}", e);
            ChainState::with_default_timer()
        }
    }
}

/// Read the stored sequence; `Ok(None)` when the key is absent
pub fn load_timers(store: &dyn KeyValueStore) -> Result<Option<Vec<TimerRecord>>> {
    let Some(raw) = store.get(STORAGE_KEY)? else {
        return Ok(None);
    };
    let timers: Vec<TimerRecord> = serde_json::from_str(&raw)?;
    Ok(Some(timers.into_iter().map(TimerRecord::normalize).collect()))
}

pub fn save_timers(store: &dyn KeyValueStore, timers: &[TimerRecord]) -> Result<()> {
    let json = serde_json::to_string(timers)?;
    store.set(STORAGE_KEY, &json)
}
