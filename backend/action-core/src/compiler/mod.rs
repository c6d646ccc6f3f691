//! Action compiler.
//!
//! Turns a [`Config`] into a [`Snapshot`]: the serialized menu payload, the
//! content-addressed command table and an execution pool sized from
//! `executors`. Pure in-memory work; no I/O.

mod command_table;
mod snapshot;

pub use command_table::{CommandTable, action_id};
pub use snapshot::Snapshot;

use crate::DEFAULT_EXECUTORS;
use crate::config::{Config, Menu};
use crate::error::compile::CompileError;
use crate::pool::{ExecutionPool, ScriptRunner, ShellRunner};

use common::ErrorLocation;
use models::{RemoteMenu, RemoteMenuBuilder};

use std::panic::Location;
use std::sync::Arc;

use bytes::Bytes;
use log::{debug, info};

/// Compile with the default shell runner.
pub fn compile(config: &Config) -> Result<Snapshot, CompileError> {
    compile_with_runner(config, Arc::new(ShellRunner))
}

/// Compile a config into a snapshot whose pool executes through `runner`.
///
/// # Errors
///
/// Returns [`CompileError::InvalidMenu`] if any menu sets both or neither of
/// `link` / `selection`, and [`CompileError::Payload`] if the menu payload
/// cannot be built.
pub fn compile_with_runner(
    config: &Config,
    runner: Arc<dyn ScriptRunner>,
) -> Result<Snapshot, CompileError> {
    let mut commands = CommandTable::default();
    let mut remote_menus: Vec<RemoteMenu> = Vec::with_capacity(config.menus.len());

    for (index, spec) in config.menus.iter().enumerate() {
        let menu = spec.resolve().map_err(|e| CompileError::InvalidMenu {
            index,
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mut builder = RemoteMenuBuilder::default().with_context(menu.context());
        builder = match menu {
            Menu::Link(link) => link
                .patterns
                .iter()
                .cloned()
                .fold(builder, RemoteMenuBuilder::with_pattern),
            Menu::Selection(selection) => selection
                .regexes
                .iter()
                .fold(builder, |b, regex| b.with_regex(regex.as_str())),
        };

        for action in menu.actions() {
            let id = action_id(&action.script);
            if commands.insert(id.clone(), action.script.clone()).is_some() {
                debug!(
                    "Action '{}' shares its script with an earlier action ({})",
                    action.name,
                    short_id(&id)
                );
            }
            builder = builder.with_action(action.name.as_str(), id);
        }

        remote_menus.push(builder.build()?);
    }

    let menu_payload = Bytes::from(serde_json::to_vec(&remote_menus)?);
    let capacity = pool_capacity(config.executors);

    info!(
        "Compiled {} menus, {} distinct scripts, pool capacity {}",
        remote_menus.len(),
        commands.len(),
        capacity
    );

    Ok(Snapshot::new(
        menu_payload,
        commands,
        ExecutionPool::new(capacity, runner),
    ))
}

/// Configured executor count, or the default when unset or not positive.
pub fn pool_capacity(executors: i64) -> usize {
    if executors > 0 {
        usize::try_from(executors).unwrap_or(usize::MAX)
    } else {
        DEFAULT_EXECUTORS
    }
}

/// Leading characters of an identifier, for log lines.
pub(crate) fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}
