//! Configuration model and loader.
//!
//! The file is either JSON or TOML, picked by extension. Parsing produces the
//! raw tree ([`Config`] with [`MenuSpec`] entries); turning a `MenuSpec` into a
//! validated [`Menu`] happens when the compiler walks the tree.

pub mod menu;

pub use menu::{ActionSpec, LinkMenu, Menu, MenuSpec, MenuVariantError, SelectionMenu};

use crate::error::config::ConfigError;
use crate::{DEFAULT_LISTEN, DEFAULT_REQUEST_TIMEOUT_MS};

use common::{ErrorLocation, RedactedSecret};

use std::net::SocketAddr;
use std::panic::Location;
use std::path::Path;
use std::time::Duration;

use log::{debug, info};
use serde::Deserialize;
use tokio::net::lookup_host;

/// Host used when `listen` is given as a bare `:port`.
const ANY_HOST: &str = "0.0.0.0";

// ============================================
// FORMAT DETECTION
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the parser from the file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFormat`] for anything but `.json` / `.toml`.
    #[track_caller]
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(ConfigFormat::Json),
            "toml" => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat {
                location: ErrorLocation::from(Location::caller()),
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

// ============================================
// CONFIG STRUCTS
// ============================================

/// Basic-auth credentials. Both empty means the gate is off.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: RedactedSecret,
}

impl AuthConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: RedactedSecret::new(password),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.username.is_empty() || !self.password.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default)]
    pub auth: AuthConfig,

    /// Concurrent script limit; zero or negative selects the default.
    #[serde(default)]
    pub executors: i64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default)]
    pub menus: Vec<MenuSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            auth: AuthConfig::default(),
            executors: 0,
            request_timeout_ms: default_request_timeout_ms(),
            menus: Vec::new(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}
fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

// ============================================
// IMPLEMENTATION
// ============================================

impl Config {
    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the extension is not recognised, the file
    /// cannot be read, the contents do not parse, or validation fails. All of
    /// these are fatal at startup.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)?;

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = Self::parse(&contents, format, path)?;

        info!(
            "Config loaded from {} ({} menus)",
            path.display(),
            config.menus.len()
        );
        Ok(config)
    }

    /// Parse config text in the given format and validate it.
    ///
    /// `origin` only labels errors.
    pub fn parse(contents: &str, format: ConfigFormat, origin: &Path) -> Result<Self, ConfigError> {
        let parsed: Result<Config, String> = match format {
            ConfigFormat::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
        };

        let config = parsed.map_err(|reason| ConfigError::ParseError {
            location: ErrorLocation::from(Location::caller()),
            path: origin.to_path_buf(),
            reason,
        })?;

        config.validate()?;
        debug!("Parsed {format:?} config from {}", origin.display());
        Ok(config)
    }

    /// Validate values the type system cannot.
    ///
    /// Menu variants are checked by the compiler, not here.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listen_target()?;

        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "request_timeout_ms must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// `listen` as `host:port`, with a bare `:port` meaning all interfaces.
    ///
    /// Checks the shape only; no name resolution happens here.
    #[track_caller]
    pub fn listen_target(&self) -> Result<String, ConfigError> {
        let listen = if self.listen.starts_with(':') {
            format!("{ANY_HOST}{}", self.listen)
        } else {
            self.listen.clone()
        };

        let well_formed = listen
            .rsplit_once(':')
            .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());

        if well_formed {
            Ok(listen)
        } else {
            Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Invalid listen address: '{}'", self.listen),
            })
        }
    }

    /// Resolve `listen` to a socket address on the runtime's resolver.
    pub async fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let target = self.listen_target()?;

        let resolved = lookup_host(target.as_str()).await;
        resolved
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Listen address does not resolve: '{}'", self.listen),
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
