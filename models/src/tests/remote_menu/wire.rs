use crate::{Context, RemoteMenuBuilder};

use serde_json::{Value, json};

const ID: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

/// **VALUE**: Pins the JSON shape clients consume from `/menus`.
///
/// **WHY THIS MATTERS**: The browser extension is deployed separately; renaming a field
/// (`action` → `id`, `context` casing) silently breaks every installed client.
///
/// **BUG THIS CATCHES**: Would catch a dropped `rename_all`, or new fields leaking into
/// the payload.
#[test]
fn given_remote_menu_when_serialized_then_matches_client_shape() {
    // GIVEN: A selection menu
    let menu = RemoteMenuBuilder::default()
        .with_context(Context::Selection)
        .with_regex("\\d+")
        .with_action("lookup", ID)
        .build()
        .unwrap();

    // WHEN: Serializing
    let value: Value = serde_json::to_value(&menu).unwrap();

    // THEN: Exactly the documented fields
    assert_eq!(
        value,
        json!({
            "context": "selection",
            "patterns": [{"url": "", "regex": "\\d+"}],
            "actions": [{"name": "lookup", "action": ID}]
        })
    );
}

#[test]
fn given_context_when_displayed_then_lowercase() {
    assert_eq!(Context::Link.to_string(), "link");
    assert_eq!(Context::Selection.as_str(), "selection");
}
