//! End-to-end behavior of the controller, tick driver and autosave.

use std::{sync::Arc, time::Duration};

use chain_timer::{
    services::{load_chain, KeyValueStore, MemoryStore, RecordingCue, SilentCue, STORAGE_KEY},
    state::{ChainController, ChainState, TimerRecord, TICK_PERIOD},
    tasks::{autosave_task, tick_driver_task},
};
use tokio::time::Instant;

fn chain(stages: &[(&str, u32)]) -> ChainState {
    ChainState::new(
        stages
            .iter()
            .map(|&(title, duration)| TimerRecord::new(title, duration))
            .collect(),
    )
}

fn stages(state: &ChainState) -> Vec<(String, u32, u32)> {
    state
        .timers
        .iter()
        .map(|t| (t.title.clone(), t.duration, t.remaining))
        .collect()
}

fn expect(stages: &[(&str, u32, u32)]) -> Vec<(String, u32, u32)> {
    stages
        .iter()
        .map(|&(title, duration, remaining)| (title.to_string(), duration, remaining))
        .collect()
}

#[test]
fn two_stage_chain_runs_to_completion() {
    let cue = Arc::new(RecordingCue::default());
    let controller = ChainController::new(
        chain(&[("A", 5), ("B", 3)]),
        cue.clone(),
        Duration::from_millis(100),
    );

    controller.start_from(0).unwrap();
    let t0 = Instant::now();

    for k in 1..=5 {
        controller.sample(t0 + TICK_PERIOD * k).unwrap();
    }
    let state = controller.snapshot().unwrap();
    assert_eq!(stages(&state), expect(&[("A", 5, 0), ("B", 3, 3)]));
    assert_eq!(state.active_index, 1);
    assert!(state.is_running);
    assert_eq!(cue.count(), 1);

    for k in 6..=8 {
        controller.sample(t0 + TICK_PERIOD * k).unwrap();
    }
    let state = controller.snapshot().unwrap();
    assert_eq!(stages(&state), expect(&[("A", 5, 0), ("B", 3, 0)]));
    assert!(!state.is_running);
    assert_eq!(cue.count(), 2);

    // Nothing further happens once the chain is done
    controller.sample(t0 + TICK_PERIOD * 20).unwrap();
    assert_eq!(cue.count(), 2);
}

#[test]
fn removing_only_stage_keeps_running_flag() {
    let controller = ChainController::new(
        chain(&[("A", 5)]),
        Arc::new(SilentCue),
        Duration::from_millis(100),
    );
    controller.toggle_running().unwrap();
    controller.remove_timer(0).unwrap();

    let state = controller.snapshot().unwrap();
    assert!(state.is_empty());
    assert_eq!(state.active_index, 0);
    assert!(state.is_running);
    assert_eq!(state.total_progress_percent(), 100.0);

    // Inert with no stage to count down
    assert!(!controller.sample(Instant::now() + TICK_PERIOD * 3).unwrap().changed());
}

#[test]
fn stage_added_while_running_is_reached() {
    let cue = Arc::new(RecordingCue::default());
    let controller = ChainController::new(
        chain(&[("A", 1)]),
        cue.clone(),
        Duration::from_millis(100),
    );
    controller.toggle_running().unwrap();
    controller.add_timer().unwrap();
    let t0 = Instant::now();

    controller.sample(t0 + TICK_PERIOD).unwrap();
    let state = controller.snapshot().unwrap();
    assert_eq!(state.active_index, 1);
    assert!(state.is_running);
    assert_eq!(state.timers[1].remaining, 60);
}

#[tokio::test(start_paused = true)]
async fn driver_counts_down_and_parks() {
    let cue = Arc::new(RecordingCue::default());
    let controller = Arc::new(ChainController::new(
        chain(&[("A", 5), ("B", 3)]),
        cue.clone(),
        Duration::from_millis(100),
    ));
    let driver = tokio::spawn(tick_driver_task(Arc::clone(&controller)));

    controller.start_from(0).unwrap();
    tokio::time::sleep(Duration::from_millis(5050)).await;
    let state = controller.snapshot().unwrap();
    assert_eq!(stages(&state), expect(&[("A", 5, 0), ("B", 3, 3)]));
    assert_eq!(state.active_index, 1);
    assert_eq!(cue.count(), 1);

    tokio::time::sleep(Duration::from_millis(3000)).await;
    let state = controller.snapshot().unwrap();
    assert_eq!(stages(&state), expect(&[("A", 5, 0), ("B", 3, 0)]));
    assert!(!state.is_running);
    assert_eq!(cue.count(), 2);
    assert!(!driver.is_finished());

    driver.abort();
}

#[tokio::test(start_paused = true)]
async fn pause_halts_and_resume_restarts_the_gate() {
    let controller = Arc::new(ChainController::new(
        chain(&[("A", 10)]),
        Arc::new(SilentCue),
        Duration::from_millis(100),
    ));
    let driver = tokio::spawn(tick_driver_task(Arc::clone(&controller)));

    controller.toggle_running().unwrap();
    tokio::time::sleep(Duration::from_millis(2050)).await;
    assert_eq!(controller.snapshot().unwrap().timers[0].remaining, 8);

    controller.toggle_running().unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(controller.snapshot().unwrap().timers[0].remaining, 8);

    controller.toggle_running().unwrap();
    tokio::time::sleep(Duration::from_millis(900)).await;
    assert_eq!(controller.snapshot().unwrap().timers[0].remaining, 8);
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(controller.snapshot().unwrap().timers[0].remaining, 7);

    driver.abort();
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn autosave_writes_every_change() {
    let store = Arc::new(MemoryStore::new());
    let controller = Arc::new(ChainController::new(
        chain(&[("A", 5)]),
        Arc::new(SilentCue),
        Duration::from_millis(100),
    ));
    let autosave = tokio::spawn(autosave_task(Arc::clone(&controller), store.clone()));
    settle().await;

    controller.add_timer().unwrap();
    controller.update_title(1, "Stretch").unwrap();
    settle().await;

    let reloaded = load_chain(&*store);
    assert_eq!(reloaded.timers, controller.snapshot().unwrap().timers);
    assert_eq!(reloaded.timers[1].title, "Stretch");

    autosave.abort();
}

#[tokio::test]
async fn autosave_failure_keeps_memory_state() {
    let store = Arc::new(MemoryStore::new());
    let controller = Arc::new(ChainController::new(
        chain(&[("A", 5)]),
        Arc::new(SilentCue),
        Duration::from_millis(100),
    ));
    let autosave = tokio::spawn(autosave_task(Arc::clone(&controller), store.clone()));
    settle().await;

    store.set_fail_writes(true);
    controller.add_timer().unwrap();
    settle().await;
    assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
    assert_eq!(controller.snapshot().unwrap().len(), 2);

    store.set_fail_writes(false);
    controller.update_duration(0, 30).unwrap();
    settle().await;
    let reloaded = load_chain(&*store);
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.timers[0].duration, 30);

    autosave.abort();
}
