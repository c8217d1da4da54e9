use serde::{Deserialize, Serialize};

/// How the grid tracks selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Whole rows are selected (default)
    #[default]
    Row,
    /// Individual cells are selected
    Cell,
}

/// Extra information carried by a selection notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionDetail {
    /// Selection set changed
    #[default]
    Changed,
    /// A checkbox was toggled in the given column
    Check { column: usize },
}
