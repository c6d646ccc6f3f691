use crate::error::model_error::ModelError;
use crate::remote_menu::{ACTION_ID_HEX_LEN, Context, Pattern, RemoteAction, RemoteMenu};
use crate::ErrorLocation;

use std::panic::Location;

/// Builder for creating validated RemoteMenu instances.
///
/// Selection regexes are folded into regex-only patterns so both menu
/// kinds share one wire shape.
#[derive(Debug, Default)]
pub struct RemoteMenuBuilder {
    context: Option<Context>,
    patterns: Vec<Pattern>,
    actions: Vec<RemoteAction>,
}

impl RemoteMenuBuilder {
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn with_regex(mut self, regex: impl Into<String>) -> Self {
        self.patterns.push(Pattern::regex_only(regex));
        self
    }

    pub fn with_action(mut self, name: impl Into<String>, action_id: impl Into<String>) -> Self {
        self.actions.push(RemoteAction {
            name: name.into(),
            action: action_id.into(),
        });
        self
    }

    /// Build the RemoteMenu with validation.
    #[track_caller]
    pub fn build(self) -> Result<RemoteMenu, ModelError> {
        let context = self.context.ok_or_else(|| ModelError::Validation {
            message: String::from("Menu context is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        for action in &self.actions {
            if !is_action_id(&action.action) {
                return Err(ModelError::Validation {
                    message: format!(
                        "Action '{}' has malformed identifier '{}' (expected {ACTION_ID_HEX_LEN} lowercase hex chars)",
                        action.name, action.action
                    ),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        Ok(RemoteMenu {
            context,
            patterns: self.patterns,
            actions: self.actions,
        })
    }
}

fn is_action_id(candidate: &str) -> bool {
    candidate.len() == ACTION_ID_HEX_LEN
        && candidate
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
