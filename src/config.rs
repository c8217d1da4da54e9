//! Grid construction options.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tree::DEFAULT_ROW_HEIGHT;
use crate::types::SelectionMode;

/// Options applied when a [`crate::Grid`] is created.
///
/// Missing JSON fields take their defaults:
///
/// ```
/// use cellgrid::GridConfig;
///
/// let config = GridConfig::from_json(r#"{ "virtual_mode": true }"#).unwrap();
/// assert!(config.virtual_mode);
/// assert_eq!(config.default_row_height, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Height of newly inserted rows in pixels
    pub default_row_height: i32,
    /// Draw one-pixel lines between cells
    pub lines_visible: bool,
    pub row_header_visible: bool,
    pub row_header_width: i32,
    pub column_header_visible: bool,
    pub header_height: i32,
    /// Populate rows lazily on first read
    pub virtual_mode: bool,
    pub selection_mode: SelectionMode,
    /// Indent per tree level in the default renderer
    pub tree_indent: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_row_height: DEFAULT_ROW_HEIGHT,
            lines_visible: true,
            row_header_visible: false,
            row_header_width: 40,
            column_header_visible: true,
            header_height: 20,
            virtual_mode: false,
            selection_mode: SelectionMode::Row,
            tree_indent: 16,
        }
    }
}

impl GridConfig {
    /// Parse a JSON document.
    ///
    /// # Errors
    /// [`crate::GridError::Config`] on malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
