use crate::logger::DEFAULT_LOG_LEVEL;

use action_core::config::Config;
use action_core::error::config::ConfigError;

use common::RedactedSecret;

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use log::{LevelFilter, info};

pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

/// Serve configured shell actions to remote clients over HTTP.
#[derive(Debug, Clone, Parser)]
#[command(name = "remote-action", version, about)]
pub struct Args {
    /// Config file (.json or .toml)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Listen address, overriding the config (e.g. `:6969` or `127.0.0.1:8080`)
    #[arg(long)]
    pub listen: Option<String>,

    /// Basic-auth username, overriding the config
    #[arg(long)]
    pub username: Option<String>,

    /// Basic-auth password, overriding the config
    #[arg(long, value_parser = parse_secret)]
    pub password: Option<RedactedSecret>,

    /// Also write logs to `remote-action.log` in this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value_t = DEFAULT_LOG_LEVEL, value_parser = parse_log_level)]
    pub log_level: LevelFilter,
}

impl Args {
    /// Apply command-line overrides to a loaded config and re-validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the overridden listen
    /// address is malformed.
    pub fn apply_overrides(&self, config: &mut Config) -> Result<(), ConfigError> {
        if let Some(listen) = &self.listen {
            info!("Listen address overridden on the command line: {listen}");
            config.listen = listen.clone();
        }

        if let Some(username) = &self.username {
            info!("Auth username overridden on the command line");
            config.auth.username = username.clone();
        }

        if let Some(password) = &self.password {
            info!("Auth password overridden on the command line");
            config.auth.password = password.clone();
        }

        config.validate()
    }
}

fn parse_log_level(value: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(value).map_err(|_| format!("unknown log level '{value}'"))
}

fn parse_secret(value: &str) -> Result<RedactedSecret, String> {
    Ok(RedactedSecret::new(value))
}
