use crate::compiler::CommandTable;
use crate::error::admission::AdmissionError;
use crate::pool::ExecutionPool;

use bytes::Bytes;

/// One compilation pass worth of runtime state.
///
/// Never mutated after construction; a reload builds a new one and swaps it in.
pub struct Snapshot {
    menu_payload: Bytes,
    commands: CommandTable,
    pool: ExecutionPool,
}

impl Snapshot {
    pub(crate) fn new(menu_payload: Bytes, commands: CommandTable, pool: ExecutionPool) -> Self {
        Self {
            menu_payload,
            commands,
            pool,
        }
    }

    /// Serialized `Vec<RemoteMenu>`; cloning is a refcount bump.
    pub fn menu_payload(&self) -> Bytes {
        self.menu_payload.clone()
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn pool(&self) -> &ExecutionPool {
        &self.pool
    }

    /// Admit an invocation against this snapshot's command table.
    pub fn submit(&self, action: &str, data: &str) -> Result<(), AdmissionError> {
        self.pool.submit(&self.commands, action, data)
    }
}
