//! Host-side capabilities consumed by the grid.
//!
//! - [`CellDataProvider`] stores per-cell content and decorations
//! - [`CellRenderer`] measures cells and reports text offsets for tree indent
//!
//! Both are indexed by `(item, column)`; column 0 is used when the grid has
//! no explicit columns.

use std::collections::HashMap;

use crate::tree::ItemId;
use crate::types::{Color, FontId, ImageId, Rect, Size};

/// Per-cell data storage implemented by the host.
pub trait CellDataProvider {
    fn text(&self, item: ItemId, column: usize) -> Option<&str>;
    fn set_text(&mut self, item: ItemId, column: usize, text: String);

    fn image(&self, item: ItemId, column: usize) -> Option<ImageId>;
    fn set_image(&mut self, item: ItemId, column: usize, image: Option<ImageId>);

    fn checked(&self, item: ItemId, column: usize) -> bool;
    fn set_checked(&mut self, item: ItemId, column: usize, checked: bool);

    fn grayed(&self, item: ItemId, column: usize) -> bool;
    fn set_grayed(&mut self, item: ItemId, column: usize, grayed: bool);

    fn checkable(&self, item: ItemId, column: usize) -> bool;
    fn set_checkable(&mut self, item: ItemId, column: usize, checkable: bool);

    /// Extra columns the cell extends into (0 = none)
    fn column_span(&self, item: ItemId, column: usize) -> i32;
    fn set_column_span(&mut self, item: ItemId, column: usize, span: i32);

    /// Extra rows the cell extends into (0 = none)
    fn row_span(&self, item: ItemId, column: usize) -> i32;
    fn set_row_span(&mut self, item: ItemId, column: usize, span: i32);

    fn background(&self, item: ItemId, column: usize) -> Option<Color>;
    fn set_background(&mut self, item: ItemId, column: usize, color: Option<Color>);

    fn foreground(&self, item: ItemId, column: usize) -> Option<Color>;
    fn set_foreground(&mut self, item: ItemId, column: usize, color: Option<Color>);

    fn font(&self, item: ItemId, column: usize) -> Option<FontId>;
    fn set_font(&mut self, item: ItemId, column: usize, font: Option<FontId>);

    fn tooltip_text(&self, item: ItemId, column: usize) -> Option<&str>;
    fn set_tooltip_text(&mut self, item: ItemId, column: usize, tooltip: Option<String>);

    /// Drop everything stored for a row.
    fn clear_row(&mut self, item: ItemId);
}

/// Stored content of one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellData {
    pub text: Option<String>,
    pub image: Option<ImageId>,
    pub checked: bool,
    pub grayed: bool,
    pub checkable: bool,
    pub column_span: i32,
    pub row_span: i32,
    pub background: Option<Color>,
    pub foreground: Option<Color>,
    pub font: Option<FontId>,
    pub tooltip: Option<String>,
}

impl Default for CellData {
    fn default() -> Self {
        Self {
            text: None,
            image: None,
            checked: false,
            grayed: false,
            checkable: true,
            column_span: 0,
            row_span: 0,
            background: None,
            foreground: None,
            font: None,
            tooltip: None,
        }
    }
}

/// In-memory provider keyed by `(item, column)`.
#[derive(Debug, Clone, Default)]
pub struct MapDataProvider {
    cells: HashMap<(ItemId, usize), CellData>,
}

impl MapDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, item: ItemId, column: usize) -> Option<&CellData> {
        self.cells.get(&(item, column))
    }

    fn cell_mut(&mut self, item: ItemId, column: usize) -> &mut CellData {
        self.cells.entry((item, column)).or_default()
    }

    /// Whether anything is stored for `item`.
    pub fn has_row(&self, item: ItemId) -> bool {
        self.cells.keys().any(|(id, _)| *id == item)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl CellDataProvider for MapDataProvider {
    fn text(&self, item: ItemId, column: usize) -> Option<&str> {
        self.cell(item, column).and_then(|c| c.text.as_deref())
    }

    fn set_text(&mut self, item: ItemId, column: usize, text: String) {
        self.cell_mut(item, column).text = Some(text);
    }

    fn image(&self, item: ItemId, column: usize) -> Option<ImageId> {
        self.cell(item, column).and_then(|c| c.image)
    }

    fn set_image(&mut self, item: ItemId, column: usize, image: Option<ImageId>) {
        self.cell_mut(item, column).image = image;
    }

    fn checked(&self, item: ItemId, column: usize) -> bool {
        self.cell(item, column).is_some_and(|c| c.checked)
    }

    fn set_checked(&mut self, item: ItemId, column: usize, checked: bool) {
        self.cell_mut(item, column).checked = checked;
    }

    fn grayed(&self, item: ItemId, column: usize) -> bool {
        self.cell(item, column).is_some_and(|c| c.grayed)
    }

    fn set_grayed(&mut self, item: ItemId, column: usize, grayed: bool) {
        self.cell_mut(item, column).grayed = grayed;
    }

    fn checkable(&self, item: ItemId, column: usize) -> bool {
        self.cell(item, column).map_or(true, |c| c.checkable)
    }

    fn set_checkable(&mut self, item: ItemId, column: usize, checkable: bool) {
        self.cell_mut(item, column).checkable = checkable;
    }

    fn column_span(&self, item: ItemId, column: usize) -> i32 {
        self.cell(item, column).map_or(0, |c| c.column_span)
    }

    fn set_column_span(&mut self, item: ItemId, column: usize, span: i32) {
        self.cell_mut(item, column).column_span = span;
    }

    fn row_span(&self, item: ItemId, column: usize) -> i32 {
        self.cell(item, column).map_or(0, |c| c.row_span)
    }

    fn set_row_span(&mut self, item: ItemId, column: usize, span: i32) {
        self.cell_mut(item, column).row_span = span;
    }

    fn background(&self, item: ItemId, column: usize) -> Option<Color> {
        self.cell(item, column).and_then(|c| c.background)
    }

    fn set_background(&mut self, item: ItemId, column: usize, color: Option<Color>) {
        self.cell_mut(item, column).background = color;
    }

    fn foreground(&self, item: ItemId, column: usize) -> Option<Color> {
        self.cell(item, column).and_then(|c| c.foreground)
    }

    fn set_foreground(&mut self, item: ItemId, column: usize, color: Option<Color>) {
        self.cell_mut(item, column).foreground = color;
    }

    fn font(&self, item: ItemId, column: usize) -> Option<FontId> {
        self.cell(item, column).and_then(|c| c.font)
    }

    fn set_font(&mut self, item: ItemId, column: usize, font: Option<FontId>) {
        self.cell_mut(item, column).font = font;
    }

    fn tooltip_text(&self, item: ItemId, column: usize) -> Option<&str> {
        self.cell(item, column).and_then(|c| c.tooltip.as_deref())
    }

    fn set_tooltip_text(&mut self, item: ItemId, column: usize, tooltip: Option<String>) {
        self.cell_mut(item, column).tooltip = tooltip;
    }

    fn clear_row(&mut self, item: ItemId) {
        self.cells.retain(|(id, _), _| *id != item);
    }
}

/// What a renderer needs to know about the cell it measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellContext {
    pub item: ItemId,
    pub column: usize,
    pub level: usize,
    pub has_children: bool,
    /// The column draws the tree indent
    pub tree_column: bool,
    /// A checkbox is drawn before the content
    pub check: bool,
}

/// Cell measurement, per column.
pub trait CellRenderer {
    /// Preferred size of the cell given optional width/height limits.
    fn compute_size(&self, cell: &CellContext, max_width: Option<i32>, max_height: Option<i32>)
        -> Size;

    /// Text area inside the cell, relative to the cell's top-left corner.
    /// Its `x` is the tree indent the overlay skips in tree columns.
    fn text_bounds(&self, cell: &CellContext, include_selection_offset: bool) -> Rect;
}

/// Fixed-metric renderer used when a column has none of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultCellRenderer {
    /// Indent per tree level
    pub indent: i32,
    /// Width of the expand/collapse toggle
    pub toggle_width: i32,
    /// Width of a checkbox including its gap
    pub check_width: i32,
    /// Padding around content
    pub margin: i32,
    /// Height of a line of text
    pub text_height: i32,
    /// Extra offset applied to selected text
    pub selection_offset: i32,
}

impl Default for DefaultCellRenderer {
    fn default() -> Self {
        Self {
            indent: 16,
            toggle_width: 12,
            check_width: 18,
            margin: 3,
            text_height: 14,
            selection_offset: 1,
        }
    }
}

impl CellRenderer for DefaultCellRenderer {
    fn compute_size(
        &self,
        cell: &CellContext,
        max_width: Option<i32>,
        max_height: Option<i32>,
    ) -> Size {
        let bounds = self.text_bounds(cell, false);
        let width = bounds.x + self.margin;
        let height = self.text_height + 2 * self.margin;
        Size::new(
            max_width.map_or(width, |w| w.min(width)),
            max_height.map_or(height, |h| h.min(height)),
        )
    }

    fn text_bounds(&self, cell: &CellContext, include_selection_offset: bool) -> Rect {
        let mut x = self.margin;
        if cell.tree_column {
            let level = i32::try_from(cell.level).unwrap_or(i32::MAX / 2);
            x = x.saturating_add(level.saturating_mul(self.indent)) + self.toggle_width;
        }
        if cell.check {
            x += self.check_width;
        }
        if include_selection_offset {
            x += self.selection_offset;
        }
        Rect::new(x, self.margin, 0, self.text_height)
    }
}
