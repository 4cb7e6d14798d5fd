//! Timer chain controller: the single owner of the chain state

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use chrono::{DateTime, Utc};
use tokio::{
    sync::{broadcast, watch},
    time::Instant,
};
use tracing::{debug, info};

use super::{ChainState, TickOutcome};
use crate::{
    error::{ChainError, Result},
    services::{parse_duration_input, AudioCue},
};

/// Minimum wall-clock gap between two applied ticks
pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

/// Controller that owns the chain state, applies the one-second gate and
/// notifies observers after every completed mutation
#[derive(Debug)]
pub struct ChainController {
    chain_state: Arc<Mutex<ChainState>>,
    /// Instant of the last applied tick; `None` while stopped
    last_tick: Arc<Mutex<Option<Instant>>>,
    audio: Arc<dyn AudioCue>,
    /// How often the tick driver samples the clock
    pub sample_interval: Duration,
    pub start_time: std::time::Instant,
    last_action: Arc<Mutex<Option<String>>>,
    last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for state change notifications
    pub state_change_tx: broadcast::Sender<ChainState>,
    /// Running flag, watched by the tick driver
    running_tx: watch::Sender<bool>,
    /// Keep the receiver alive to prevent channel closure
    _running_rx: watch::Receiver<bool>,
}

impl ChainController {
    pub fn new(initial: ChainState, audio: Arc<dyn AudioCue>, sample_interval: Duration) -> Self {
        let (state_change_tx, _) = broadcast::channel(100);
        let (running_tx, running_rx) = watch::channel(initial.is_running);

        Self {
            chain_state: Arc::new(Mutex::new(initial)),
            last_tick: Arc::new(Mutex::new(None)),
            audio,
            sample_interval,
            start_time: std::time::Instant::now(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            state_change_tx,
            running_tx,
            _running_rx: running_rx,
        }
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, ChainState>> {
        self.chain_state
            .lock()
            .map_err(|e| ChainError::LockPoisoned(e.to_string()))
    }

    fn lock_last_tick(&self) -> Result<MutexGuard<'_, Option<Instant>>> {
        self.last_tick
            .lock()
            .map_err(|e| ChainError::LockPoisoned(e.to_string()))
    }

    /// Apply a mutation and notify observers once it has completed.
    ///
    /// A failed updater leaves the state as it was and notifies nobody.
    pub fn update_state<F, T>(&self, action: &str, updater: F) -> Result<T>
    where
        F: FnOnce(&mut ChainState) -> Result<T>,
    {
        let mut state = self.lock_state()?;
        let was_counting = state.is_running && state.active_timer().is_some();
        let value = updater(&mut *state)?;
        let new_state = state.clone();

        // Starting, or gaining a stage while running, times the first
        // decrement from now; stopping forgets the previous run
        {
            let mut last_tick = self.lock_last_tick()?;
            if !new_state.is_running {
                *last_tick = None;
            } else if !was_counting {
                *last_tick = Some(Instant::now());
            }
        }
        drop(state);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        debug!("Applied '{}'", action);
        self.publish(new_state);
        Ok(value)
    }

    fn publish(&self, new_state: ChainState) {
        self.running_tx.send_if_modified(|running| {
            let modified = *running != new_state.is_running;
            *running = new_state.is_running;
            modified
        });

        // No subscribers is normal before the UI attaches
        if let Err(e) = self.state_change_tx.send(new_state) {
            debug!("No state change listeners: {}", e);
        }
    }

    /// Append a default stage; returns its index
    pub fn add_timer(&self) -> Result<usize> {
        let index = self.update_state("add", |state| Ok(state.add_timer()))?;
        info!("Added timer at position {}", index);
        Ok(index)
    }

    pub fn remove_timer(&self, index: usize) -> Result<()> {
        let removed = self.update_state("remove", |state| state.remove_timer(index))?;
        info!("Removed timer '{}' at position {}", removed.title, index);
        Ok(())
    }

    pub fn update_duration(&self, index: usize, duration: u32) -> Result<()> {
        self.update_state("edit-duration", |state| state.update_duration(index, duration))?;
        info!("Timer {} duration set to {}s", index, duration);
        Ok(())
    }

    /// Validate raw user text and apply it as a duration.
    ///
    /// Rejected text leaves the stage untouched.
    pub fn set_duration_input(&self, index: usize, input: &str) -> Result<u32> {
        let duration = parse_duration_input(input)?;
        self.update_duration(index, duration)?;
        Ok(duration)
    }

    pub fn update_title(&self, index: usize, title: &str) -> Result<()> {
        self.update_state("edit-title", |state| state.update_title(index, title))?;
        debug!("Timer {} renamed to '{}'", index, title);
        Ok(())
    }

    pub fn reset(&self) -> Result<()> {
        self.update_state("reset", |state| {
            state.reset();
            Ok(())
        })?;
        info!("Chain reset");
        Ok(())
    }

    pub fn start_from(&self, index: usize) -> Result<()> {
        self.update_state("start-from", |state| state.start_from(index))?;
        info!("Starting chain from timer {}", index);
        Ok(())
    }

    /// Flip between running and paused; returns the new running flag
    pub fn toggle_running(&self) -> Result<bool> {
        let running = self.update_state(
            "toggle",
            |state| Ok(state.toggle_running()),
        )?;
        info!("Chain {}", if running { "started" } else { "paused" });
        Ok(running)
    }

    /// One sample of the tick driver.
    ///
    /// Spent stages under the pointer are skipped at once; otherwise a
    /// second is taken off the active stage only when a full
    /// [`TICK_PERIOD`] has passed since the last applied tick.
    pub fn sample(&self, now: Instant) -> Result<TickOutcome> {
        let mut state = self.lock_state()?;
        if !state.is_running {
            return Ok(TickOutcome::Idle);
        }

        let mut last_tick = self.lock_last_tick()?;
        if state.active_timer().is_none() {
            // Nothing to count yet; a stage added later gets a full first second
            *last_tick = None;
            return Ok(TickOutcome::Idle);
        }
        let skipped = state.skip_spent();
        let outcome = if skipped.changed() {
            skipped
        } else {
            let origin = *last_tick.get_or_insert(now);
            if now.saturating_duration_since(origin) < TICK_PERIOD {
                return Ok(TickOutcome::Idle);
            }
            *last_tick = Some(now);
            state.apply_tick()
        };

        if !outcome.changed() {
            return Ok(outcome);
        }
        *last_tick = if state.is_running { Some(now) } else { None };
        let new_state = state.clone();
        drop(last_tick);
        drop(state);

        match outcome {
            TickOutcome::Expired { index, next } => {
                info!("Timer {} expired, next: {:?}", index, next);
                self.audio.play();
                if next.is_none() {
                    info!("Chain complete");
                }
            }
            TickOutcome::Skipped { from, to } => {
                info!("Skipped spent timers from {} to {:?}", from, to);
            }
            _ => {}
        }

        self.publish(new_state);
        Ok(outcome)
    }

    /// Current chain state
    pub fn snapshot(&self) -> Result<ChainState> {
        self.lock_state().map(|state| state.clone())
    }

    /// Register an observer of completed mutations
    pub fn subscribe(&self) -> broadcast::Receiver<ChainState> {
        self.state_change_tx.subscribe()
    }

    /// Receiver of the running flag
    pub fn running_rx(&self) -> watch::Receiver<bool> {
        self.running_tx.subscribe()
    }

    /// Calculate uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last user action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
