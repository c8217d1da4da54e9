//! Viewport state: client area, scroll position and displayed row range.

use std::cell::Cell;

use super::ColumnSet;
use crate::tree::{ItemId, ItemTree};
use crate::types::{Point, Rect};

/// Default client area width in pixels
pub const DEFAULT_CLIENT_WIDTH: i32 = 800;

/// Default client area height in pixels
pub const DEFAULT_CLIENT_HEIGHT: i32 = 600;

/// Rows currently displayed, as flat row indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayedRange {
    /// First displayed row
    pub top: usize,
    /// Last row whose top edge lies inside the client area
    pub bottom: usize,
    /// Whether the bottom row fits entirely
    pub bottom_fully_shown: bool,
}

/// Viewport state - the visible window onto the grid
///
/// Horizontal scrolling is in pixels; vertical scrolling is in visible rows.
/// The displayed range is cached and recomputed lazily after
/// [`Viewport::invalidate_range`].
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Client area of the grid control
    pub client_area: Rect,
    /// Horizontal scroll offset in pixels
    pub scroll_x: i32,
    /// Vertical scroll offset as a count of visible rows
    pub scroll_row: usize,
    pub row_header_visible: bool,
    pub row_header_width: i32,
    pub column_header_visible: bool,
    pub header_height: i32,
    /// Grid lines drawn between cells
    pub lines_visible: bool,
    range: Cell<Option<Option<DisplayedRange>>>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Create a new viewport with default values
    pub fn new() -> Self {
        Self {
            client_area: Rect::new(0, 0, DEFAULT_CLIENT_WIDTH, DEFAULT_CLIENT_HEIGHT),
            scroll_x: 0,
            scroll_row: 0,
            row_header_visible: false,
            row_header_width: 40,
            column_header_visible: true,
            header_height: 20,
            lines_visible: true,
            range: Cell::new(None),
        }
    }

    /// Mark the displayed range obsolete.
    pub fn invalidate_range(&self) {
        self.range.set(None);
    }

    /// Left edge of the cell area (right of the row header).
    pub fn content_left(&self) -> i32 {
        self.client_area.x
            + if self.row_header_visible {
                self.row_header_width
            } else {
                0
            }
    }

    /// Top edge of the cell area (below the column header).
    pub fn content_top(&self) -> i32 {
        self.client_area.y
            + if self.column_header_visible {
                self.header_height
            } else {
                0
            }
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: i32, height: i32) {
        self.client_area.width = width.max(0);
        self.client_area.height = height.max(0);
        self.invalidate_range();
    }

    /// Set the horizontal scroll offset, clamped to the scrollable width.
    pub fn set_scroll_x(&mut self, x: i32, columns: &ColumnSet) {
        let visible_width = self.client_area.right() - self.content_left();
        let max_x = (columns.total_width() - visible_width).max(0);
        self.scroll_x = x.clamp(0, max_x);
    }

    /// Set the vertical scroll offset, clamped to the visible row count.
    pub fn set_scroll_row(&mut self, row: usize, tree: &ItemTree) {
        self.scroll_row = row.min(tree.visible_count().saturating_sub(1));
        self.invalidate_range();
    }

    /// Displayed flat row range, `None` when nothing is visible.
    pub fn displayed_range(&self, tree: &ItemTree) -> Option<DisplayedRange> {
        if let Some(cached) = self.range.get() {
            return cached;
        }
        let computed = self.compute_range(tree);
        self.range.set(Some(computed));
        computed
    }

    /// Flat index of the first displayed row.
    pub fn top_index(&self, tree: &ItemTree) -> Option<usize> {
        self.displayed_range(tree).map(|r| r.top)
    }

    /// Flat index of the last (possibly partially) displayed row.
    pub fn bottom_index(&self, tree: &ItemTree) -> Option<usize> {
        self.displayed_range(tree).map(|r| r.bottom)
    }

    fn compute_range(&self, tree: &ItemTree) -> Option<DisplayedRange> {
        let limit = self.client_area.bottom();
        let mut y = self.content_top();
        let mut range: Option<DisplayedRange> = None;
        for id in tree.visible_rows().skip(self.scroll_row) {
            if range.is_some() && y >= limit {
                break;
            }
            let height = tree.height(id).ok()?;
            let row = tree.row_index(id).ok()?;
            let fits = y + height <= limit;
            match range.as_mut() {
                Some(r) => {
                    r.bottom = row;
                    r.bottom_fully_shown = fits;
                }
                None => {
                    range = Some(DisplayedRange {
                        top: row,
                        bottom: row,
                        bottom_fully_shown: fits,
                    });
                }
            }
            y += height + 1;
        }
        log::trace!("displayed range recomputed: {range:?}");
        range
    }

    /// Whether `id` is visible and displayed in full.
    ///
    /// Partially displayed rows at the bottom edge do not count.
    pub fn is_shown(&self, tree: &ItemTree, id: ItemId) -> bool {
        if !tree.is_visible(id).unwrap_or(false) {
            return false;
        }
        let (Some(range), Ok(row)) = (self.displayed_range(tree), tree.row_index(id)) else {
            return false;
        };
        if row < range.top || row > range.bottom {
            return false;
        }
        row != range.bottom || range.bottom_fully_shown
    }

    /// Top edge of a row in client coordinates, relative to the scrolled top
    /// row (negative above it).
    pub fn row_y(&self, tree: &ItemTree, id: ItemId) -> i32 {
        let mut visible_seen = 0usize;
        let mut y = 0;
        let mut y_top = None;
        let mut y_item = None;
        for row in tree.rows() {
            let Ok(node) = tree.node(row) else {
                continue;
            };
            if node.is_visible() {
                if visible_seen == self.scroll_row {
                    y_top = Some(y);
                }
                visible_seen += 1;
            }
            if row == id {
                y_item = Some(y);
            }
            if y_top.is_some() && y_item.is_some() {
                break;
            }
            if node.is_visible() {
                y += node.height() + 1;
            }
        }
        self.content_top() + y_item.unwrap_or(y) - y_top.unwrap_or(0)
    }

    /// Top-left corner of a cell in client coordinates.
    pub fn origin(&self, columns: &ColumnSet, tree: &ItemTree, column: usize, id: ItemId) -> Point {
        let x = self.content_left() + columns.x_offset(column) - self.scroll_x;
        Point::new(x, self.row_y(tree, id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::layout::Column;

    fn flat_tree(rows: usize, height: i32) -> (ItemTree, Vec<ItemId>) {
        let mut tree = ItemTree::new(height);
        let ids = (0..rows).map(|_| tree.insert(None, None).unwrap()).collect();
        (tree, ids)
    }

    #[test]
    fn test_displayed_range() {
        let (tree, _) = flat_tree(50, 19);
        let mut vp = Viewport::new();
        vp.resize(200, 120);
        // header 20, then rows of 20 (19 + line): rows 0..=4 inside 120
        let range = vp.displayed_range(&tree).unwrap();
        assert_eq!(range.top, 0);
        assert_eq!(range.bottom, 4);
        assert!(range.bottom_fully_shown);

        vp.set_scroll_row(10, &tree);
        assert_eq!(vp.top_index(&tree), Some(10));
        assert_eq!(vp.bottom_index(&tree), Some(14));
    }

    #[test]
    fn test_partial_bottom_row_is_not_shown() {
        let (tree, ids) = flat_tree(10, 19);
        let mut vp = Viewport::new();
        vp.resize(200, 110);
        assert_eq!(vp.bottom_index(&tree), Some(4));
        assert!(vp.is_shown(&tree, ids[3]));
        assert!(!vp.is_shown(&tree, ids[4]));
        assert!(!vp.is_shown(&tree, ids[7]));
    }

    #[test]
    fn test_row_y_relative_to_scroll() {
        let (tree, ids) = flat_tree(10, 19);
        let mut vp = Viewport::new();
        vp.set_scroll_row(2, &tree);
        assert_eq!(vp.row_y(&tree, ids[2]), 20);
        assert_eq!(vp.row_y(&tree, ids[5]), 80);
        assert_eq!(vp.row_y(&tree, ids[0]), -20);
    }

    #[test]
    fn test_origin_includes_row_header_and_scroll() {
        let (tree, ids) = flat_tree(3, 19);
        let mut columns = ColumnSet::new();
        columns.push(Column::new(100)).unwrap();
        columns.push(Column::new(100)).unwrap();
        let mut vp = Viewport::new();
        vp.row_header_visible = true;
        vp.resize(150, 100);
        vp.set_scroll_x(30, &columns);
        let origin = vp.origin(&columns, &tree, 1, ids[1]);
        assert_eq!(origin, Point::new(40 + 100 - 30, 40));
    }

    #[test]
    fn test_range_cache_invalidation() {
        let (mut tree, _) = flat_tree(3, 19);
        let vp = Viewport::new();
        assert_eq!(vp.bottom_index(&tree), Some(2));
        tree.insert(None, None).unwrap();
        // Stale until invalidated.
        assert_eq!(vp.bottom_index(&tree), Some(2));
        vp.invalidate_range();
        assert_eq!(vp.bottom_index(&tree), Some(3));
    }
}
