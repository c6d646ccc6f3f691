pub mod admission;
pub mod compile;
pub mod config;
pub mod exec;
pub mod server;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Compile(#[from] compile::CompileError),

    #[error(transparent)]
    Server(#[from] server::ServerError),
}
