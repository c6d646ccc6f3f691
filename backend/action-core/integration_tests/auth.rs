use crate::helpers::{
    TEST_PASSWORD, TEST_USERNAME, base_url, link_config, start_server, with_auth,
};

use action_core::action_id;
use action_core::server::{ACTION_PATH, MENUS_PATH};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;

/// **VALUE**: Verifies every route is gated when credentials are configured.
///
/// **WHY THIS MATTERS**: The action route runs shell scripts; it must never be reachable
/// without credentials once they are configured.
///
/// **BUG THIS CATCHES**: Would catch the auth layer being applied to only one route.
#[tokio::test]
async fn given_auth_configured_when_no_credentials_then_forbidden() {
    let handle = start_server(&with_auth(link_config(&[("noop", "true")]))).await;
    let client = reqwest::Client::new();
    let base = base_url(&handle);

    let menus = client.get(format!("{base}{MENUS_PATH}")).send().await.unwrap();
    assert_eq!(menus.status(), StatusCode::FORBIDDEN);
    assert_eq!(menus.text().await.unwrap(), "Forbidden");

    let action = client
        .post(format!("{base}{ACTION_PATH}?action={}", action_id("true")))
        .send()
        .await
        .unwrap();
    assert_eq!(action.status(), StatusCode::FORBIDDEN);

    handle.shutdown().await.unwrap();
}

/// **VALUE**: Verifies the auth matrix over real HTTP.
///
/// **WHY THIS MATTERS**: Both `user:pass` and bare-password clients are deployed.
///
/// **BUG THIS CATCHES**: Would catch the header being read from the wrong place or the
/// password-only fallback being dropped.
#[tokio::test]
async fn given_auth_configured_when_credentials_vary_then_matrix_holds() {
    let handle = start_server(&with_auth(link_config(&[("noop", "true")]))).await;
    let client = reqwest::Client::new();
    let url = format!("{}{MENUS_PATH}", base_url(&handle));

    let cases = [
        (format!("{TEST_USERNAME}:{TEST_PASSWORD}"), StatusCode::OK),
        (TEST_PASSWORD.to_string(), StatusCode::OK),
        (format!("{TEST_USERNAME}:wrong"), StatusCode::FORBIDDEN),
        (format!("mallory:{TEST_PASSWORD}"), StatusCode::FORBIDDEN),
        (format!("{TEST_USERNAME}:{TEST_PASSWORD}:x"), StatusCode::FORBIDDEN),
    ];

    for (credentials, expected) in cases {
        let response = client
            .get(&url)
            .header(AUTHORIZATION, format!("Basic {}", BASE64.encode(&credentials)))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), expected, "Credentials {credentials:?}");
    }

    let bearer = client
        .get(&url)
        .header(AUTHORIZATION, "Bearer token")
        .send()
        .await
        .unwrap();
    assert_eq!(bearer.status(), StatusCode::FORBIDDEN);

    handle.shutdown().await.unwrap();
}

/// **VALUE**: Verifies requests pass through untouched when auth is off.
///
/// **WHY THIS MATTERS**: Empty credentials are the documented way to disable auth.
///
/// **BUG THIS CATCHES**: Would catch a gate built with empty credentials that rejects
/// everything.
#[tokio::test]
async fn given_no_auth_configured_when_requested_then_allowed() {
    let handle = start_server(&link_config(&[("noop", "true")])).await;

    let response = reqwest::get(format!("{}{MENUS_PATH}", base_url(&handle)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    handle.shutdown().await.unwrap();
}
