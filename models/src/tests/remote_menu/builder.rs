use crate::{Context, ModelError, Pattern, RemoteMenuBuilder};

const ID_A: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
const ID_B: &str = "fedcba9876543210fedcba9876543210fedcba9876543210fedcba9876543210";

/// **VALUE**: Verifies that a fully specified link menu builds with source order preserved.
///
/// **WHY THIS MATTERS**: Clients render actions in the order they arrive. The compiler relies
/// on the builder not to reorder patterns or actions.
///
/// **BUG THIS CATCHES**: Would catch the builder collecting into a set or sorting entries.
#[test]
fn given_link_menu_parts_when_built_then_keeps_order() {
    // GIVEN: A link context with two patterns and two actions
    let builder = RemoteMenuBuilder::default()
        .with_context(Context::Link)
        .with_pattern(Pattern::new("*://*.example.com/*", ".*"))
        .with_pattern(Pattern::new("*", "^https://"))
        .with_action("open", ID_A)
        .with_action("archive", ID_B);

    // WHEN: Building
    let menu = builder.build().expect("valid menu");

    // THEN: Everything is there, in order
    assert_eq!(menu.context, Context::Link);
    assert_eq!(menu.patterns[0].url, "*://*.example.com/*");
    assert_eq!(menu.patterns[1].regex, "^https://");
    assert_eq!(menu.actions[0].name, "open");
    assert_eq!(menu.actions[1].action, ID_B);
}

/// **VALUE**: Verifies that selection regexes become patterns with an empty url.
///
/// **WHY THIS MATTERS**: The client treats an empty `url` as "match on text only". A
/// non-empty placeholder would make selection menus never match.
///
/// **BUG THIS CATCHES**: Would catch `with_regex` filling `url` with the regex or a wildcard.
#[test]
fn given_selection_regex_when_built_then_pattern_has_empty_url() {
    // GIVEN/WHEN: A selection menu with one regex
    let menu = RemoteMenuBuilder::default()
        .with_context(Context::Selection)
        .with_regex("^[0-9]+$")
        .build()
        .expect("valid menu");

    // THEN: The pattern is regex-only
    assert_eq!(menu.patterns, vec![Pattern::regex_only("^[0-9]+$")]);
    assert!(menu.patterns[0].url.is_empty());
}

/// **VALUE**: Verifies that a menu without context is rejected.
///
/// **BUG THIS CATCHES**: Would catch the builder silently defaulting to `Link`.
#[test]
fn given_no_context_when_built_then_validation_error() {
    let result = RemoteMenuBuilder::default().with_action("open", ID_A).build();

    match result {
        Err(ModelError::Validation { message, .. }) => {
            assert!(message.contains("context"), "Unexpected message: {message}")
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

/// **VALUE**: Verifies that action identifiers must look like SHA-256 hex digests.
///
/// **WHY THIS MATTERS**: The identifier is what the client posts back. Anything else
/// (a script body, an uppercase digest) means the compiler wired the wrong value in.
///
/// **BUG THIS CATCHES**: Would catch the compiler putting the script text into `action`.
#[test]
fn given_malformed_identifiers_when_built_then_rejected() {
    let uppercase = ID_A.to_uppercase();
    let bad_ids = ["echo $LINK", "deadbeef", uppercase.as_str(), ""];

    for bad in bad_ids {
        let result = RemoteMenuBuilder::default()
            .with_context(Context::Link)
            .with_action("open", bad)
            .build();

        assert!(result.is_err(), "Should reject identifier {bad:?}");
    }
}
