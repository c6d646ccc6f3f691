use crate::auth::{AuthGate, require_basic_auth};
use crate::compiler::short_id;
use crate::server::ActionServer;

use std::time::Duration;

use axum::Router;
use axum::extract::{RawQuery, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use log::{debug, warn};
use url::form_urlencoded;

pub const MENUS_PATH: &str = "/menus";
pub const ACTION_PATH: &str = "/action";

const ACTION_PARAM: &str = "action";
const DATA_PARAM: &str = "data";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Build the router: both routes, the optional auth gate, and the request
/// timeout around everything.
pub fn build_router(server: ActionServer, auth: Option<AuthGate>, timeout: Duration) -> Router {
    let mut router = Router::new()
        .route(MENUS_PATH, get(list_menus))
        .route(ACTION_PATH, post(invoke_action))
        .with_state(server);

    if let Some(gate) = auth {
        router = router.layer(from_fn_with_state(gate, require_basic_auth));
    }

    router.layer(from_fn_with_state(timeout, enforce_timeout))
}

/// Status code with its reason phrase as the body, and nothing else.
pub(crate) fn status_text_response(status: StatusCode) -> Response {
    (status, status.canonical_reason().unwrap_or_default()).into_response()
}

async fn list_menus(State(server): State<ActionServer>) -> Response {
    ([(CONTENT_TYPE, JSON_CONTENT_TYPE)], server.menus()).into_response()
}

async fn invoke_action(
    State(server): State<ActionServer>,
    RawQuery(query): RawQuery,
) -> Response {
    let (action, data) = parse_action_query(query.as_deref().unwrap_or_default());

    match server.invoke(&action, &data) {
        Ok(()) => {
            debug!("Action {} admitted", short_id(&action));
            StatusCode::OK.into_response()
        }
        Err(e) => {
            warn!("Action request rejected ({}): {e}", e.category());
            status_text_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// First `action` and `data` values, form-decoded; missing ones are empty.
pub(crate) fn parse_action_query(query: &str) -> (String, String) {
    let mut action = None;
    let mut data = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            ACTION_PARAM if action.is_none() => action = Some(value.into_owned()),
            DATA_PARAM if data.is_none() => data = Some(value.into_owned()),
            _ => {}
        }
    }

    (action.unwrap_or_default(), data.unwrap_or_default())
}

/// Bound the request path. Spawned scripts are not affected.
pub(crate) async fn enforce_timeout(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!("Request to {path} timed out after {limit:?}");
            status_text_response(StatusCode::GATEWAY_TIMEOUT)
        }
    }
}
