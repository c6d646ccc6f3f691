// Unit tests for the execution pool, driven through a gated fake runner

use super::support::{GatedRunner, config_with, link_menu, wait_until};
use crate::DEFAULT_EXECUTORS;
use crate::compiler::{CommandTable, action_id, compile_with_runner};
use crate::error::admission::AdmissionError;
use crate::pool::ExecutionPool;

use std::sync::Arc;
use std::time::Duration;

fn table(scripts: &[&str]) -> CommandTable {
    let mut commands = CommandTable::default();
    for script in scripts {
        commands.insert(action_id(script), script.to_string());
    }
    commands
}

/// **VALUE**: Verifies no more than `capacity` scripts run at once.
///
/// **WHY THIS MATTERS**: `executors` is the only guard against a client flooding the host
/// with processes.
///
/// **BUG THIS CATCHES**: Would catch the slot being released before the script finishes, or
/// admission waiting for a slot instead of returning.
#[tokio::test]
async fn given_capacity_two_when_three_submitted_then_third_waits() {
    // GIVEN: A pool of two slots and a runner that blocks until released
    let runner = Arc::new(GatedRunner::new());
    let pool = ExecutionPool::new(2, runner.clone());
    let commands = table(&["sleep 1"]);
    let id = action_id("sleep 1");

    // WHEN: Submitting three invocations
    for _ in 0..3 {
        pool.submit(&commands, &id, "x").unwrap();
    }

    // THEN: Exactly two start, the third stays queued
    wait_until(|| runner.started() == 2).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(runner.started(), 2);
    assert_eq!(pool.running(), 2);
    assert_eq!(pool.in_flight(), 3);

    // WHEN: Releasing the running scripts
    runner.release(3);

    // THEN: The third runs and everything drains
    wait_until(|| pool.in_flight() == 0).await;
    assert_eq!(runner.started(), 3);
    assert_eq!(runner.peak(), 2);
    assert_eq!(pool.running(), 0);
}

/// **VALUE**: Verifies the default pool runs 100 scripts at once and queues the rest.
///
/// **WHY THIS MATTERS**: With `executors` unset, the bound is 100, and waiting tasks are
/// unbounded rather than rejected.
///
/// **BUG THIS CATCHES**: Would catch a default of zero or one, or admission failing once
/// all slots are taken.
#[tokio::test]
async fn given_default_capacity_when_flooded_then_hundred_run_and_rest_wait() {
    // GIVEN: A snapshot compiled with executors unset
    let runner = Arc::new(GatedRunner::new());
    let config = config_with(vec![link_menu(&[("slow", "sleep 10")])], 0);
    let snapshot = compile_with_runner(&config, runner.clone()).unwrap();
    let id = action_id("sleep 10");

    // WHEN: Submitting more invocations than slots
    let total = DEFAULT_EXECUTORS + 20;
    for _ in 0..total {
        snapshot.submit(&id, "").unwrap();
    }

    // THEN: Exactly the default number run
    wait_until(|| runner.started() == DEFAULT_EXECUTORS).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(runner.started(), DEFAULT_EXECUTORS);
    assert_eq!(snapshot.pool().in_flight(), total);

    runner.release(total);
    wait_until(|| snapshot.pool().in_flight() == 0).await;
    assert_eq!(runner.peak(), DEFAULT_EXECUTORS);
}

/// **VALUE**: Verifies admission failures never reach the runner.
///
/// **WHY THIS MATTERS**: Unknown identifiers and undecodable data are request errors; no
/// process may be started for them.
///
/// **BUG THIS CATCHES**: Would catch the lookup happening inside the spawned task, where the
/// caller could no longer be told.
#[tokio::test]
async fn given_unknown_action_or_bad_data_when_submitted_then_rejected_without_running() {
    let runner = Arc::new(GatedRunner::new());
    let pool = ExecutionPool::new(4, runner.clone());
    let commands = table(&["true"]);

    let unknown = pool.submit(&commands, &action_id("rm -rf /"), "x");
    assert!(matches!(unknown, Err(AdmissionError::UnknownAction { .. })));

    let bad = pool.submit(&commands, &action_id("true"), "%zz");
    assert!(matches!(bad, Err(AdmissionError::BadInput { .. })));

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(runner.started(), 0);
    assert_eq!(pool.in_flight(), 0);
}

/// **VALUE**: Verifies the runner receives the unescaped data value.
///
/// **WHY THIS MATTERS**: Scripts read `LINK` and expect the original text.
///
/// **BUG THIS CATCHES**: Would catch the raw, still-escaped value being passed through.
#[tokio::test]
async fn given_escaped_data_when_submitted_then_runner_sees_unescaped_value() {
    let runner = Arc::new(GatedRunner::new());
    let pool = ExecutionPool::new(1, runner.clone());
    let commands = table(&["echo"]);

    runner.release(1);
    pool.submit(&commands, &action_id("echo"), "hello+big%20world").unwrap();

    wait_until(|| pool.in_flight() == 0).await;
    assert_eq!(runner.links(), vec!["hello big world".to_string()]);
}

/// **VALUE**: Verifies a zero capacity is clamped to one slot.
///
/// **WHY THIS MATTERS**: A zero-permit semaphore would admit work that never runs.
///
/// **BUG THIS CATCHES**: Would catch the clamp being removed from `ExecutionPool::new`.
#[test]
fn given_zero_capacity_when_pool_created_then_one_slot() {
    let pool = ExecutionPool::new(0, Arc::new(GatedRunner::new()));
    assert_eq!(pool.capacity(), 1);
}
