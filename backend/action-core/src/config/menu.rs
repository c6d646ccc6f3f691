use models::{Context, Pattern};

use std::fmt::{Display, Formatter, Result as FormatResult};

use serde::Deserialize;

/// A named script. Identity on the wire is the script hash, not the name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionSpec {
    pub name: String,
    pub script: String,
}

impl ActionSpec {
    pub fn new(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LinkMenu {
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SelectionMenu {
    #[serde(default)]
    pub regexes: Vec<String>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

/// A menu entry exactly as it appears in the config file.
///
/// Exactly one of `link` / `selection` must be set; [`MenuSpec::resolve`]
/// enforces that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MenuSpec {
    #[serde(default)]
    pub link: Option<LinkMenu>,
    #[serde(default)]
    pub selection: Option<SelectionMenu>,
}

impl MenuSpec {
    pub fn link(patterns: Vec<Pattern>, actions: Vec<ActionSpec>) -> Self {
        Self {
            link: Some(LinkMenu { patterns, actions }),
            selection: None,
        }
    }

    pub fn selection(regexes: Vec<String>, actions: Vec<ActionSpec>) -> Self {
        Self {
            link: None,
            selection: Some(SelectionMenu { regexes, actions }),
        }
    }

    /// Resolve into the validated sum type.
    pub fn resolve(&self) -> Result<Menu<'_>, MenuVariantError> {
        match (&self.link, &self.selection) {
            (Some(link), None) => Ok(Menu::Link(link)),
            (None, Some(selection)) => Ok(Menu::Selection(selection)),
            (Some(_), Some(_)) => Err(MenuVariantError::Both),
            (None, None) => Err(MenuVariantError::Neither),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuVariantError {
    Both,
    Neither,
}

impl Display for MenuVariantError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        match self {
            MenuVariantError::Both => write!(formatter, "both 'link' and 'selection' are set"),
            MenuVariantError::Neither => {
                write!(formatter, "neither 'link' nor 'selection' is set")
            }
        }
    }
}

/// A menu with its variant settled.
#[derive(Debug, Clone, Copy)]
pub enum Menu<'a> {
    Link(&'a LinkMenu),
    Selection(&'a SelectionMenu),
}

impl<'a> Menu<'a> {
    pub fn context(&self) -> Context {
        match self {
            Menu::Link(_) => Context::Link,
            Menu::Selection(_) => Context::Selection,
        }
    }

    pub fn actions(&self) -> &'a [ActionSpec] {
        match self {
            Menu::Link(link) => &link.actions,
            Menu::Selection(selection) => &selection.actions,
        }
    }
}
