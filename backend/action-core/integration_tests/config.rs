use crate::helpers::{base_url, write_config_file};

use action_core::config::Config;
use action_core::error::config::ConfigError;
use action_core::server::MENUS_PATH;
use action_core::{ActionServer, action_id, start_action_server};

use reqwest::StatusCode;

const TOML_CONFIG: &str = r#"
listen = "127.0.0.1:0"
executors = 2

[[menus]]
[menus.selection]
regexes = ["^[a-z]+$"]
actions = [{ name = "shout", script = "echo \"$LINK\" | tr a-z A-Z" }]

[[menus]]
[menus.link]
patterns = [{ url = "https://*", regex = "" }]
actions = [{ name = "open", script = "xdg-open \"$LINK\"" }]
"#;

/// **VALUE**: Verifies a TOML file on disk drives the served menus.
///
/// **WHY THIS MATTERS**: This is the startup path of the binary: load, compile, serve.
///
/// **BUG THIS CATCHES**: Would catch menus being served in a different order than the file.
#[tokio::test]
async fn given_toml_file_when_loaded_and_served_then_menus_follow_file() {
    // GIVEN: A config file on disk
    let file = write_config_file(TOML_CONFIG, "toml");

    // WHEN: Loading, compiling and serving it
    let config = Config::load(file.path()).unwrap();
    let server = ActionServer::new(&config).unwrap();
    let handle = start_action_server(server, &config, std::future::pending())
        .await
        .unwrap();

    let response = reqwest::get(format!("{}{MENUS_PATH}", base_url(&handle)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let menus: serde_json::Value = response.json().await.unwrap();

    // THEN: Contexts and identifiers follow the file
    assert_eq!(menus[0]["context"], "selection");
    assert_eq!(menus[0]["patterns"][0]["regex"], "^[a-z]+$");
    assert_eq!(
        menus[0]["actions"][0]["action"],
        action_id("echo \"$LINK\" | tr a-z A-Z").as_str()
    );
    assert_eq!(menus[1]["context"], "link");
    assert_eq!(menus[1]["patterns"][0]["url"], "https://*");

    handle.shutdown().await.unwrap();
}

/// **VALUE**: Verifies unsupported config formats are rejected before reading.
///
/// **WHY THIS MATTERS**: The binary exits on this error; it must be specific.
///
/// **BUG THIS CATCHES**: Would catch a `.yaml` file being parsed as JSON.
#[test]
fn given_unsupported_extension_when_loaded_then_format_error() {
    let file = write_config_file("menus: []", "yaml");

    let result = Config::load(file.path());

    assert!(matches!(
        result,
        Err(ConfigError::UnsupportedFormat { ref extension, .. }) if extension == "yaml"
    ));
}

/// **VALUE**: Verifies a config with an invalid menu loads but fails to compile.
///
/// **WHY THIS MATTERS**: Startup must stop before binding when any menu is invalid.
///
/// **BUG THIS CATCHES**: Would catch invalid menus being dropped silently.
#[test]
fn given_menu_without_variant_when_compiled_then_startup_fails() {
    let file = write_config_file(r#"{"menus":[{}]}"#, "json");

    let config = Config::load(file.path()).unwrap();

    assert!(ActionServer::new(&config).is_err());
}
