//! Tick driver background task

use std::sync::Arc;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::ChainController;

/// Background task that samples the clock while the chain runs.
///
/// The sampling interval only exists while running; when the chain stops
/// the interval is dropped and the task parks on the running flag.
pub async fn tick_driver_task(controller: Arc<ChainController>) {
    info!("Starting tick driver task");

    let mut running_rx = controller.running_rx();

    loop {
        // Wait until the chain is started
        while !*running_rx.borrow_and_update() {
            if running_rx.changed().await.is_err() {
                info!("Running flag closed, tick driver exiting");
                return;
            }
        }

        debug!("Chain running, sampling every {:?}", controller.sample_interval);
        let mut sampler = interval(controller.sample_interval);
        sampler.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = sampler.tick() => {
                    if let Err(e) = controller.sample(Instant::now()) {
                        error!("Failed to apply tick: {}", e);
                    }
                }

                changed = running_rx.changed() => {
                    if changed.is_err() {
                        info!("Running flag closed, tick driver exiting");
                        return;
                    }
                    if !*running_rx.borrow_and_update() {
                        debug!("Chain stopped, releasing sampler");
                        break;
                    }
                }
            }
        }
    }
}
