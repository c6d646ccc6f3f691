pub mod auth;
pub mod compiler;
pub mod config;
pub mod error;
pub mod pool;
pub mod server;

#[cfg(test)]
mod tests;

pub use compiler::{Snapshot, action_id, compile};
pub use config::Config;
pub use server::{ActionServer, ActionServerHandle, start_action_server};

pub const DEFAULT_EXECUTORS: usize = 100;
pub const DEFAULT_PORT: u16 = 6969;
pub const DEFAULT_LISTEN: &str = const_format::concatcp!(":", DEFAULT_PORT);
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 2000;

/// Environment variable carrying the unescaped data value into a script.
pub const LINK_ENV: &str = "LINK";
pub const SHELL: &str = "sh";
pub const SHELL_COMMAND_FLAG: &str = "-c";
