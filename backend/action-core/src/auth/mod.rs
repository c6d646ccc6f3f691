//! Basic-auth gate.
//!
//! Active only when a username or password is configured. A credential token
//! without a colon is treated as the password alone ("password-only" mode),
//! in which case the username is not checked.

use crate::config::AuthConfig;
use crate::server::status_text_response;

use common::RedactedSecret;

use std::fmt::{Display, Formatter, Result as FormatResult};

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::warn;

const BASIC_SCHEME: &str = "Basic";

/// Why a request was turned away. Logged, never sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    MissingHeader,
    WrongScheme,
    EmptyToken,
    MalformedToken,
    TooManyParts,
    BadCredentials,
}

impl Display for AuthFailure {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        let reason = match self {
            AuthFailure::MissingHeader => "missing Authorization header",
            AuthFailure::WrongScheme => "authorization scheme is not Basic",
            AuthFailure::EmptyToken => "empty Basic credentials",
            AuthFailure::MalformedToken => "credentials are not valid base64 text",
            AuthFailure::TooManyParts => "credentials contain more than one ':'",
            AuthFailure::BadCredentials => "wrong username or password",
        };
        formatter.write_str(reason)
    }
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    username: String,
    password: RedactedSecret,
}

impl AuthGate {
    pub fn new(username: impl Into<String>, password: RedactedSecret) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Gate for the configured credentials, or `None` when auth is off.
    pub fn from_config(auth: &AuthConfig) -> Option<Self> {
        auth.is_enabled()
            .then(|| Self::new(auth.username.clone(), auth.password.clone()))
    }

    /// Check an `Authorization` header value.
    pub fn verify(&self, header: Option<&str>) -> Result<(), AuthFailure> {
        let header = header.ok_or(AuthFailure::MissingHeader)?.trim();

        let (scheme, token) = header
            .split_once(|c: char| c.is_ascii_whitespace())
            .unwrap_or((header, ""));
        if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
            return Err(AuthFailure::WrongScheme);
        }

        let token = token.trim();
        if token.is_empty() {
            return Err(AuthFailure::EmptyToken);
        }

        let decoded = BASE64
            .decode(token)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or(AuthFailure::MalformedToken)?;

        let parts: Vec<&str> = decoded.split(':').collect();
        let authenticated = match parts.as_slice() {
            [password] => self.password.matches(password),
            [username, password] => *username == self.username && self.password.matches(password),
            _ => return Err(AuthFailure::TooManyParts),
        };

        if authenticated {
            Ok(())
        } else {
            Err(AuthFailure::BadCredentials)
        }
    }
}

/// Middleware: 403 unless the request carries acceptable Basic credentials.
pub async fn require_basic_auth(
    State(gate): State<AuthGate>,
    request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    match gate.verify(header) {
        Ok(()) => next.run(request).await,
        Err(failure) => {
            warn!(
                "Rejected {} {}: {failure}",
                request.method(),
                request.uri().path()
            );
            status_text_response(StatusCode::FORBIDDEN)
        }
    }
}
