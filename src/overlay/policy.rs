use serde::{Deserialize, Serialize};

/// Horizontal placement of the overlay inside its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical placement of the overlay inside its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlignment {
    Top,
    #[default]
    Center,
    Bottom,
}

/// How the overlay is sized and placed relative to its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayPolicy {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
    /// Grow to the cell width
    pub grab_horizontal: bool,
    /// Grow to the cell height
    pub grab_vertical: bool,
    pub minimum_width: i32,
    pub minimum_height: i32,
}

impl Default for OverlayPolicy {
    fn default() -> Self {
        Self {
            horizontal: HorizontalAlignment::Center,
            vertical: VerticalAlignment::Center,
            grab_horizontal: false,
            grab_vertical: true,
            minimum_width: 0,
            minimum_height: 0,
        }
    }
}

impl OverlayPolicy {
    /// Fill the whole cell, the usual setup for an inline editor.
    pub fn fill() -> Self {
        Self {
            horizontal: HorizontalAlignment::Left,
            vertical: VerticalAlignment::Top,
            grab_horizontal: true,
            grab_vertical: true,
            ..Self::default()
        }
    }
}
