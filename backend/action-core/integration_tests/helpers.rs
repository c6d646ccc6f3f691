//! Test helpers for HTTP integration tests.
//!
//! - Building configs in memory or on disk
//! - Starting a server on an ephemeral port
//! - Waiting for files written by scripts

use action_core::config::{ActionSpec, AuthConfig, Config, MenuSpec};
use action_core::{ActionServer, ActionServerHandle, start_action_server};

use models::Pattern;

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tempfile::NamedTempFile;

pub const TEST_USERNAME: &str = "alice";
pub const TEST_PASSWORD: &str = "secret";

/// Config with one link menu matching everything and the given actions.
pub fn link_config(actions: &[(&str, &str)]) -> Config {
    let menu = MenuSpec::link(
        vec![Pattern::new("*", ".*")],
        actions
            .iter()
            .map(|(name, script)| ActionSpec::new(*name, *script))
            .collect(),
    );

    Config {
        listen: "127.0.0.1:0".to_string(),
        menus: vec![menu],
        ..Config::default()
    }
}

pub fn with_auth(mut config: Config) -> Config {
    config.auth = AuthConfig::new(TEST_USERNAME, TEST_PASSWORD);
    config
}

/// Compile `config` and serve it until the handle is shut down.
pub async fn start_server(config: &Config) -> ActionServerHandle {
    let server = ActionServer::new(config).expect("Config should compile");
    start_action_server(server, config, std::future::pending())
        .await
        .expect("Server should bind")
}

pub fn base_url(handle: &ActionServerHandle) -> String {
    format!("http://{}", handle.local_addr())
}

/// Write `contents` to a temp file with the given extension.
pub fn write_config_file(contents: &str, extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{extension}"))
        .tempfile()
        .expect("Failed to create temp config");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp config");
    file
}

/// Poll until a script has written a complete line to `path`.
pub async fn wait_for_line(path: &Path) -> String {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Ok(contents) = std::fs::read_to_string(path)
                && contents.ends_with('\n')
            {
                return contents.trim_end().to_string();
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("Script did not write its output within 5 seconds")
}

/// Number of entries in `dir`; scripts mark their start by creating a file.
pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.count())
        .unwrap_or(0)
}

/// Poll until `dir` holds at least `expected` entries.
pub async fn wait_for_files(dir: &Path, expected: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while count_files(dir) < expected {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("Scripts did not start within 5 seconds");
}
