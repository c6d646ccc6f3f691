use crate::helpers::{
    base_url, count_files, link_config, start_server, wait_for_files, wait_for_line,
};

use action_core::action_id;
use action_core::config::Config;
use action_core::error::server::ServerError;
use action_core::server::{ACTION_PATH, MENUS_PATH};
use action_core::{ActionServer, start_action_server};

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;

/// **VALUE**: Verifies the full flow: fetch menus, post the identifier, script sees `LINK`.
///
/// **WHY THIS MATTERS**: This is the only thing a client ever does.
///
/// **BUG THIS CATCHES**: Would catch identifiers in `/menus` that the action route does not
/// recognise, or the data value not reaching the script environment.
#[tokio::test]
async fn given_link_menu_when_action_posted_then_script_receives_link() {
    // GIVEN: A server whose only script writes LINK to a file
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.txt");
    let script = format!("echo \"$LINK\" > '{}'", out.display());
    let config = link_config(&[("open", script.as_str())]);
    let handle = start_server(&config).await;
    let client = reqwest::Client::new();

    // WHEN: Fetching the menus
    let menus: serde_json::Value = client
        .get(format!("{}{MENUS_PATH}", base_url(&handle)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // THEN: The advertised identifier is the script hash
    let id = menus[0]["actions"][0]["action"].as_str().unwrap().to_string();
    assert_eq!(menus[0]["actions"][0]["name"], "open");
    assert_eq!(id, action_id(&script));

    // WHEN: Posting the action
    let response = client
        .post(format!(
            "{}{ACTION_PATH}?action={id}&data=hello",
            base_url(&handle)
        ))
        .send()
        .await
        .unwrap();

    // THEN: Admitted with an empty body, and the script ran with LINK=hello
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.bytes().await.unwrap().is_empty());
    assert_eq!(wait_for_line(&out).await, "hello");

    handle.shutdown().await.unwrap();
}

/// **VALUE**: Verifies the data value is decoded twice: once as a form value, once more by
/// the pool.
///
/// **WHY THIS MATTERS**: Deployed clients percent-encode the value before putting it into
/// the query string.
///
/// **BUG THIS CATCHES**: Would catch either decoding step being dropped.
#[tokio::test]
async fn given_double_encoded_data_when_action_posted_then_script_sees_plain_text() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.txt");
    let script = format!("echo \"$LINK\" > '{}'", out.display());
    let handle = start_server(&link_config(&[("open", script.as_str())])).await;

    let response = reqwest::Client::new()
        .post(format!(
            "{}{ACTION_PATH}?action={}&data=https%253A%252F%252Fexample.com%252Fa%2520b",
            base_url(&handle),
            action_id(&script)
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(wait_for_line(&out).await, "https://example.com/a b");

    handle.shutdown().await.unwrap();
}

/// **VALUE**: Verifies admission failures answer 500 with only the status text.
///
/// **WHY THIS MATTERS**: Clients only learn that the request failed, never why.
///
/// **BUG THIS CATCHES**: Would catch unknown identifiers being answered 200 or 404, or
/// internal error text leaking into the body.
#[tokio::test]
async fn given_unknown_or_bad_request_when_action_posted_then_internal_server_error() {
    let handle = start_server(&link_config(&[("noop", "true")])).await;
    let client = reqwest::Client::new();
    let base = base_url(&handle);

    let cases = [
        format!("{base}{ACTION_PATH}?action={}&data=x", action_id("not configured")),
        format!("{base}{ACTION_PATH}?action={}&data=%25zz", action_id("true")),
        format!("{base}{ACTION_PATH}"),
    ];

    for url in cases {
        let response = client.post(&url).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{url}");
        assert_eq!(response.text().await.unwrap(), "Internal Server Error");
    }

    handle.shutdown().await.unwrap();
}

/// **VALUE**: Verifies `/menus` is served as JSON, byte for byte the compiled payload.
///
/// **WHY THIS MATTERS**: The payload is computed once; handlers must not re-serialize it.
///
/// **BUG THIS CATCHES**: Would catch a missing content type, which some clients reject.
#[tokio::test]
async fn given_running_server_when_menus_requested_then_json_payload_returned() {
    let config = link_config(&[("noop", "true")]);
    let expected = ActionServer::new(&config).unwrap().menus();
    let handle = start_server(&config).await;

    let response = reqwest::get(format!("{}{MENUS_PATH}", base_url(&handle)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    assert_eq!(response.bytes().await.unwrap(), expected);

    handle.shutdown().await.unwrap();
}

/// **VALUE**: Verifies binding an address already in use fails with a bind error.
///
/// **WHY THIS MATTERS**: Startup must stop with a clear message, not hang.
///
/// **BUG THIS CATCHES**: Would catch bind errors being swallowed inside the server task.
#[tokio::test]
async fn given_port_in_use_when_server_started_then_bind_error() {
    let first = start_server(&link_config(&[])).await;

    let config = Config {
        listen: first.local_addr().to_string(),
        ..link_config(&[])
    };
    let server = ActionServer::new(&config).unwrap();
    let result = start_action_server(server, &config, std::future::pending()).await;

    assert!(matches!(result, Err(ServerError::Bind { .. })));

    first.shutdown().await.unwrap();
}

/// **VALUE**: Verifies shutdown stops the listener.
///
/// **WHY THIS MATTERS**: Ctrl-C in the binary goes through the same path.
///
/// **BUG THIS CATCHES**: Would catch `shutdown` returning while the server keeps accepting.
#[tokio::test]
async fn given_running_server_when_shut_down_then_connections_refused() {
    let handle = start_server(&link_config(&[])).await;
    let url = format!("{}{MENUS_PATH}", base_url(&handle));

    handle.shutdown().await.unwrap();

    assert!(reqwest::get(&url).await.is_err());
}

/// **VALUE**: Verifies a burst larger than `executors` is admitted at once and run two at a
/// time.
///
/// **WHY THIS MATTERS**: Clients never wait for scripts; the slot limit only delays the
/// extra scripts, it never delays or rejects the HTTP responses.
///
/// **BUG THIS CATCHES**: Would catch the handler awaiting a slot (third response delayed by
/// a whole script run) or the limit not being applied to HTTP-admitted work.
#[tokio::test]
async fn given_two_executors_when_three_actions_posted_at_once_then_all_admitted_and_two_run() {
    // GIVEN: Two slots and a script that marks its start and then sleeps
    let dir = tempfile::tempdir().unwrap();
    let script = format!("touch '{}'/\"$LINK\"; sleep 1", dir.path().display());
    let config = Config {
        executors: 2,
        ..link_config(&[("slow", script.as_str())])
    };
    let handle = start_server(&config).await;
    let client = reqwest::Client::new();
    let base = base_url(&handle);
    let id = action_id(&script);
    let post = |data: &str| {
        client
            .post(format!("{base}{ACTION_PATH}?action={id}&data={data}"))
            .send()
    };

    // WHEN: Posting three invocations concurrently
    let started = Instant::now();
    let (a, b, c) = tokio::join!(post("a"), post("b"), post("c"));
    let elapsed = started.elapsed();

    // THEN: All three are admitted before any script could have finished
    for response in [a, b, c] {
        assert_eq!(response.unwrap().status(), StatusCode::OK);
    }
    assert!(
        elapsed < Duration::from_millis(900),
        "Responses took {elapsed:?}; admission must not wait for a slot"
    );

    // AND: Exactly two scripts start while the first ones sleep
    wait_for_files(dir.path(), 2).await;
    assert_eq!(count_files(dir.path()), 2, "Third script must wait for a slot");

    // AND: The third runs once a slot frees up
    wait_for_files(dir.path(), 3).await;

    handle.shutdown().await.unwrap();
}

/// **VALUE**: Verifies dropping the handle does not stop the server.
///
/// **WHY THIS MATTERS**: Embedders may start the server and keep only the shutdown future;
/// losing the handle must not take the listener down with it.
///
/// **BUG THIS CATCHES**: Would catch a closed stop channel being treated as a shutdown
/// request.
#[tokio::test]
async fn given_running_server_when_handle_dropped_then_keeps_serving() {
    // GIVEN: A running server that answers
    let handle = start_server(&link_config(&[])).await;
    let url = format!("{}{MENUS_PATH}", base_url(&handle));
    assert_eq!(reqwest::get(&url).await.unwrap().status(), StatusCode::OK);

    // WHEN: Dropping the handle
    drop(handle);
    tokio::time::sleep(Duration::from_millis(200)).await;

    // THEN: The server still answers
    let response = reqwest::get(&url).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
