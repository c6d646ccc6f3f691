//! Wire models for remote-action.
//!
//! These are the shapes a client sees when it asks for `/menus`. They are
//! pure data; compiling them from configuration lives in `action-core`.

pub mod error;
pub mod remote_menu;

#[cfg(test)]
mod tests;

pub use common::ErrorLocation;
pub use error::model_error::ModelError;
pub use remote_menu::builder::RemoteMenuBuilder;
pub use remote_menu::{ACTION_ID_HEX_LEN, Context, Pattern, RemoteAction, RemoteMenu};
