// Unit tests for the server facade and request helpers

use super::support::{GatedRunner, config_with, link_menu, wait_until};
use crate::compiler::action_id;
use crate::config::MenuSpec;
use crate::error::admission::AdmissionError;
use crate::server::{ActionServer, enforce_timeout, parse_action_query, status_text_response};

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tokio::net::TcpListener;

/// **VALUE**: Verifies reload swaps menus and commands together.
///
/// **WHY THIS MATTERS**: After a reload, old identifiers must stop working and new ones must
/// start working; a half-swapped state would run scripts missing from the menus.
///
/// **BUG THIS CATCHES**: Would catch reload mutating only the payload, or readers holding
/// the lock across a submit.
#[tokio::test]
async fn given_running_server_when_reloaded_then_new_snapshot_serves_requests() {
    // GIVEN: A server compiled from one script
    let runner = Arc::new(GatedRunner::new());
    runner.release(10);
    let before = config_with(vec![link_menu(&[("old", "echo old")])], 0);
    let server = ActionServer::with_runner(&before, runner.clone()).unwrap();
    let old_snapshot = server.snapshot();

    // WHEN: Reloading with a different script
    let after = config_with(vec![link_menu(&[("new", "echo new")])], 0);
    server.reload(&after).unwrap();

    // THEN: Menus reflect the new config
    let menus = String::from_utf8(server.menus().to_vec()).unwrap();
    assert!(menus.contains("\"new\""));
    assert!(!menus.contains("\"old\""));

    // AND: Only the new identifier is admitted
    assert!(matches!(
        server.invoke(&action_id("echo old"), ""),
        Err(AdmissionError::UnknownAction { .. })
    ));
    server.invoke(&action_id("echo new"), "").unwrap();
    wait_until(|| runner.started() == 1).await;

    // AND: A snapshot taken before the reload is unchanged
    assert!(old_snapshot.commands().contains(&action_id("echo old")));
}

/// **VALUE**: Verifies a failed reload keeps the current snapshot.
///
/// **WHY THIS MATTERS**: A broken config must not take a running server down.
///
/// **BUG THIS CATCHES**: Would catch the swap happening before compilation succeeds.
#[test]
fn given_invalid_config_when_reloaded_then_current_snapshot_kept() {
    let config = config_with(vec![link_menu(&[("keep", "echo keep")])], 0);
    let server = ActionServer::with_runner(&config, Arc::new(GatedRunner::new())).unwrap();
    let payload = server.menus();

    let broken = config_with(vec![MenuSpec::default()], 0);
    assert!(server.reload(&broken).is_err());

    assert_eq!(server.menus(), payload);
    assert!(server.snapshot().commands().contains(&action_id("echo keep")));
}

/// **VALUE**: Verifies query parsing takes the first value of each key and decodes it once.
///
/// **WHY THIS MATTERS**: The pool decodes `data` a second time; decoding twice here would
/// corrupt values containing `%25`.
///
/// **BUG THIS CATCHES**: Would catch the last value winning or missing keys panicking.
#[test]
fn given_query_strings_when_parsed_then_first_values_form_decoded() {
    let (action, data) = parse_action_query("action=abc&data=a%2520b&data=ignored");
    assert_eq!(action, "abc");
    assert_eq!(data, "a%20b");

    let (action, data) = parse_action_query("data=x+y");
    assert_eq!(action, "");
    assert_eq!(data, "x y");

    assert_eq!(parse_action_query(""), (String::new(), String::new()));
}

/// **VALUE**: Verifies error responses carry only the status text.
///
/// **WHY THIS MATTERS**: Admission and auth failures must not leak detail to the client.
///
/// **BUG THIS CATCHES**: Would catch an error message being written into the body.
#[tokio::test]
async fn given_status_when_rendered_then_body_is_reason_phrase() {
    let response = status_text_response(StatusCode::FORBIDDEN);
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(body.as_ref(), b"Forbidden");
}

/// **VALUE**: Verifies the timeout middleware answers 504 when the request path is too slow.
///
/// **WHY THIS MATTERS**: `request_timeout_ms` is the only bound on how long a client waits;
/// a slow handler must not hold the connection indefinitely.
///
/// **BUG THIS CATCHES**: Would catch the middleware awaiting the inner handler without a
/// deadline, or answering with a status other than 504.
#[tokio::test]
async fn given_slow_route_when_timeout_exceeded_then_gateway_timeout() {
    // GIVEN: A slow and a fast route behind a 50ms timeout
    let router = Router::new()
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "done"
            }),
        )
        .route("/fast", get(|| async { "done" }))
        .layer(from_fn_with_state(Duration::from_millis(50), enforce_timeout));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await });

    // WHEN: Requesting the slow route
    let slow = reqwest::get(format!("http://{addr}/slow")).await.unwrap();

    // THEN: 504 with the status text only
    assert_eq!(slow.status(), reqwest::StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(slow.text().await.unwrap(), "Gateway Timeout");

    // AND: Fast requests are untouched
    let fast = reqwest::get(format!("http://{addr}/fast")).await.unwrap();
    assert_eq!(fast.status(), reqwest::StatusCode::OK);
    assert_eq!(fast.text().await.unwrap(), "done");
}
