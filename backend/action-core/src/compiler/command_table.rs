use std::collections::HashMap;

use sha2::{Digest, Sha256};

/// Identifier of a script: lowercase hex SHA-256 of its exact bytes.
pub fn action_id(script: &str) -> String {
    hex::encode(Sha256::digest(script.as_bytes()))
}

/// Action identifier → script body.
///
/// Keyed by content, so two actions with byte-identical scripts share one
/// entry regardless of their names.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: HashMap<String, String>,
}

impl CommandTable {
    /// Insert a script; returns the previous body on identifier collision.
    pub fn insert(&mut self, id: String, script: String) -> Option<String> {
        self.commands.insert(id, script)
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.commands.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.commands.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
