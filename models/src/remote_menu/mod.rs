pub mod builder;

use std::fmt::{Display, Formatter, Result as FormatResult};

use serde::{Deserialize, Serialize};

/// Length of a hex-encoded SHA-256 action identifier.
pub const ACTION_ID_HEX_LEN: usize = 64;

/// Where in the browser a menu applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    Link,
    Selection,
}

impl Context {
    pub fn as_str(&self) -> &'static str {
        match self {
            Context::Link => "link",
            Context::Selection => "selection",
        }
    }
}

impl Display for Context {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

/// Matching rule evaluated by the client, never by the server.
///
/// Selection menus only carry a regex; their `url` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub regex: String,
}

impl Pattern {
    pub fn new(url: impl Into<String>, regex: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            regex: regex.into(),
        }
    }

    /// A regex-only pattern, as produced for selection menus.
    pub fn regex_only(regex: impl Into<String>) -> Self {
        Self {
            url: String::new(),
            regex: regex.into(),
        }
    }
}

/// A menu entry as the client sees it: a label and the identifier to post back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAction {
    pub name: String,
    pub action: String,
}

/// One compiled menu. Carries identifiers only, never script bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMenu {
    pub context: Context,
    pub patterns: Vec<Pattern>,
    pub actions: Vec<RemoteAction>,
}
