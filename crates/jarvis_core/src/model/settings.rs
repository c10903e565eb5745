//! User preferences persisted next to the collections.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

/// Placement of the navigation menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Side,
    Top,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Side => "side",
            Self::Top => "top",
        }
    }
}

/// Defaults to `{ theme: "dark", autoSave: true, layout: "side" }`.
///
/// Missing fields in a stored document take their default, so settings
/// saved before `layout` existed still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    pub auto_save: bool,
    pub layout: Layout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            auto_save: true,
            layout: Layout::Side,
        }
    }
}
