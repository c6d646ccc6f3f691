//! Server facade and HTTP surface.
//!
//! [`ActionServer`] owns the current [`Snapshot`] behind a lock that is held
//! only long enough to clone or replace an `Arc`. Compilation for a reload
//! happens before the lock is taken.
//!
//! # Routes
//!
//! - `GET /menus` - compiled menu payload, verbatim
//! - `POST /action?action=<id>&data=<value>` - admit a script invocation

mod handle;
mod router;

pub use handle::{ActionServerHandle, start_action_server};
pub use router::{ACTION_PATH, MENUS_PATH, build_router};

pub(crate) use router::status_text_response;

#[cfg(test)]
pub(crate) use router::{enforce_timeout, parse_action_query};

use crate::compiler::{Snapshot, compile_with_runner};
use crate::config::Config;
use crate::error::admission::AdmissionError;
use crate::error::compile::CompileError;
use crate::pool::{ScriptRunner, ShellRunner};

use std::sync::{Arc, PoisonError, RwLock};

use bytes::Bytes;
use log::info;

/// Shared handle to the running snapshot.
///
/// This type is `Clone`; all clones see the same snapshot.
#[derive(Clone)]
pub struct ActionServer {
    snapshot: Arc<RwLock<Arc<Snapshot>>>,
    runner: Arc<dyn ScriptRunner>,
}

impl ActionServer {
    /// Compile `config` and serve it with the shell runner.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if the config does not compile.
    pub fn new(config: &Config) -> Result<Self, CompileError> {
        Self::with_runner(config, Arc::new(ShellRunner))
    }

    pub fn with_runner(config: &Config, runner: Arc<dyn ScriptRunner>) -> Result<Self, CompileError> {
        let snapshot = compile_with_runner(config, Arc::clone(&runner))?;
        Ok(Self {
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            runner,
        })
    }

    /// The current snapshot. Stays valid even if a reload swaps it out.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn menus(&self) -> Bytes {
        self.snapshot().menu_payload()
    }

    /// Admit an invocation; returns as soon as the task is spawned.
    pub fn invoke(&self, action: &str, data: &str) -> Result<(), AdmissionError> {
        self.snapshot().submit(action, data)
    }

    /// Recompile and replace the snapshot.
    ///
    /// On error the current snapshot stays in place. Scripts already admitted
    /// keep running against the pool they were admitted to.
    pub fn reload(&self, config: &Config) -> Result<(), CompileError> {
        let next = Arc::new(compile_with_runner(config, Arc::clone(&self.runner))?);

        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = next;
        info!("Snapshot replaced");
        Ok(())
    }
}
