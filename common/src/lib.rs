//! Shared building blocks for remote-action.
//!
//! This crate holds the small pieces every other crate leans on: error
//! location tracking and secret handling. It has no knowledge of menus,
//! scripts or HTTP.
//!
//! ## Architecture
//!
//! - **common** (this crate): Error plumbing and secrets
//! - **models**: Wire models sent to clients
//! - **action-core**: Compiler, auth gate, execution pool, server
//! - **remote-action**: Binary wiring everything together

pub mod error;
pub mod redacted_secret;


pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use redacted_secret::RedactedSecret;
