//! Execution pool.
//!
//! Admission is synchronous: the action must exist and the data must
//! unescape. Everything after that runs in a detached task that waits for one
//! of `capacity` slots, runs the script and releases the slot when the process
//! exits. Nothing about the outcome travels back to the caller.
//!
//! The number of tasks waiting for a slot is not bounded. A burst of admitted
//! invocations larger than `capacity` queues up in memory until slots free up.

mod runner;
mod unescape;

pub use runner::{ScriptExit, ScriptRunner, ShellRunner};
pub use unescape::query_unescape;

#[cfg(test)]
pub(crate) use runner::build_script_command;

use crate::compiler::{CommandTable, short_id};
use crate::error::admission::AdmissionError;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, error, info, warn};
use tokio::spawn as TokioSpawn;
use tokio::sync::Semaphore;

/// Live counters; only read for logging and diagnostics.
#[derive(Debug, Default)]
struct PoolCounters {
    in_flight: AtomicUsize,
    running: AtomicUsize,
}

/// Decrements a counter when the owning task ends, however it ends.
struct CounterGuard {
    counters: Arc<PoolCounters>,
    running: bool,
}

impl CounterGuard {
    fn admitted(counters: &Arc<PoolCounters>) -> Self {
        counters.in_flight.fetch_add(1, Ordering::SeqCst);
        Self {
            counters: Arc::clone(counters),
            running: false,
        }
    }

    fn start_running(&mut self) {
        self.counters.running.fetch_add(1, Ordering::SeqCst);
        self.running = true;
    }
}

impl Drop for CounterGuard {
    fn drop(&mut self) {
        if self.running {
            self.counters.running.fetch_sub(1, Ordering::SeqCst);
        }
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Bounded-concurrency, fire-and-forget script executor.
///
/// Cloning shares the same slots and counters.
#[derive(Clone)]
pub struct ExecutionPool {
    capacity: usize,
    slots: Arc<Semaphore>,
    runner: Arc<dyn ScriptRunner>,
    counters: Arc<PoolCounters>,
}

impl ExecutionPool {
    pub fn new(capacity: usize, runner: Arc<dyn ScriptRunner>) -> Self {
        let capacity = capacity.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            capacity,
            slots: Arc::new(Semaphore::new(capacity)),
            runner,
            counters: Arc::new(PoolCounters::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Admitted invocations that have not finished yet (waiting or running).
    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::SeqCst)
    }

    /// Invocations currently holding a slot.
    pub fn running(&self) -> usize {
        self.counters.running.load(Ordering::SeqCst)
    }

    /// Admit an invocation and hand it to a background task.
    ///
    /// Never waits for a slot. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`AdmissionError::UnknownAction`] if `action` is not in `commands`
    /// - [`AdmissionError::BadInput`] if `data` does not unescape
    pub fn submit(
        &self,
        commands: &CommandTable,
        action: &str,
        data: &str,
    ) -> Result<(), AdmissionError> {
        let script = commands
            .get(action)
            .ok_or_else(|| AdmissionError::unknown_action(action))?;
        let link = query_unescape(data)?;

        let guard = CounterGuard::admitted(&self.counters);
        debug!(
            "Admitted action {} ({} in flight, {} running, capacity {})",
            short_id(action),
            self.in_flight(),
            self.running(),
            self.capacity
        );

        TokioSpawn(run_admitted(
            Arc::clone(&self.slots),
            Arc::clone(&self.runner),
            guard,
            action.to_string(),
            script.to_string(),
            link,
        ));

        Ok(())
    }
}

/// Body of the detached per-invocation task.
async fn run_admitted(
    slots: Arc<Semaphore>,
    runner: Arc<dyn ScriptRunner>,
    mut guard: CounterGuard,
    action: String,
    script: String,
    link: String,
) {
    let id = short_id(&action);

    let _permit = match slots.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            error!("Execution pool closed, dropping action {id}: {e}");
            return;
        }
    };
    guard.start_running();

    match runner.run(&script, &link).await {
        Ok(exit) if exit.success() => info!("Action {id} finished"),
        Ok(exit) => warn!("Action {id} finished with {exit}"),
        Err(e) => error!("Action {id} failed to run: {e}"),
    }
}
