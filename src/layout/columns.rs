//! Column model: widths, visual order, visibility and column groups.

use crate::error::{GridError, Result};

/// Default column width in pixels
pub const DEFAULT_COL_WIDTH: i32 = 64;

/// Handle to a column group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) usize);

/// A single grid column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Width in pixels
    pub width: i32,
    /// Own visibility flag (group rules may still hide the column)
    pub visible: bool,
    /// Column that draws the tree indent and expand toggles
    pub tree: bool,
    /// Cells in this column may carry checkboxes
    pub checkable: bool,
    /// Group membership
    pub group: Option<GroupId>,
    /// Shown while the group is expanded
    pub detail: bool,
    /// Shown while the group is collapsed
    pub summary: bool,
}

impl Default for Column {
    fn default() -> Self {
        Self {
            width: DEFAULT_COL_WIDTH,
            visible: true,
            tree: false,
            checkable: false,
            group: None,
            detail: true,
            summary: true,
        }
    }
}

impl Column {
    pub fn new(width: i32) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tree(mut self, tree: bool) -> Self {
        self.tree = tree;
        self
    }

    #[must_use]
    pub fn with_checkable(mut self, checkable: bool) -> Self {
        self.checkable = checkable;
        self
    }

    #[must_use]
    pub fn in_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    #[must_use]
    pub fn with_group_roles(mut self, detail: bool, summary: bool) -> Self {
        self.detail = detail;
        self.summary = summary;
        self
    }
}

/// A set of columns that expand/collapse together
#[derive(Debug, Clone, Default)]
pub struct ColumnGroup {
    pub expanded: bool,
    columns: Vec<usize>,
}

impl ColumnGroup {
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }
}

/// All columns of a grid plus their display order.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<Column>,
    order: Vec<usize>,
    groups: Vec<ColumnGroup>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// # Errors
    /// `InvalidRange` for an unknown column.
    pub fn get(&self, column: usize) -> Result<&Column> {
        self.columns.get(column).ok_or(GridError::InvalidRange {
            index: column,
            len: self.columns.len(),
        })
    }

    fn get_mut(&mut self, column: usize) -> Result<&mut Column> {
        let len = self.columns.len();
        self.columns.get_mut(column).ok_or(GridError::InvalidRange {
            index: column,
            len,
        })
    }

    /// Append a column at the end of both the index and the visual order.
    pub fn push(&mut self, column: Column) -> Result<usize> {
        let index = self.columns.len();
        if let Some(group) = column.group {
            self.group_mut(group)?.columns.push(index);
        }
        self.columns.push(column);
        self.order.push(index);
        Ok(index)
    }

    pub fn add_group(&mut self, expanded: bool) -> GroupId {
        self.groups.push(ColumnGroup {
            expanded,
            columns: Vec::new(),
        });
        GroupId(self.groups.len() - 1)
    }

    pub fn group(&self, group: GroupId) -> Result<&ColumnGroup> {
        self.groups.get(group.0).ok_or(GridError::InvalidRange {
            index: group.0,
            len: self.groups.len(),
        })
    }

    fn group_mut(&mut self, group: GroupId) -> Result<&mut ColumnGroup> {
        let len = self.groups.len();
        self.groups.get_mut(group.0).ok_or(GridError::InvalidRange {
            index: group.0,
            len,
        })
    }

    pub fn group_of(&self, column: usize) -> Option<GroupId> {
        self.columns.get(column).and_then(|c| c.group)
    }

    /// Display order: `order()[visual] = column index`
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Replace the display order. Returns the columns whose visual position
    /// changed.
    ///
    /// # Errors
    /// `InvalidArgument` unless `order` is a permutation of all columns.
    pub fn set_order(&mut self, order: Vec<usize>) -> Result<Vec<usize>> {
        let mut seen = vec![false; self.columns.len()];
        let valid = order.len() == self.columns.len()
            && order.iter().all(|c| match seen.get_mut(*c) {
                Some(flag) if !*flag => {
                    *flag = true;
                    true
                }
                _ => false,
            });
        if !valid {
            return Err(GridError::InvalidArgument(format!(
                "column order {order:?} is not a permutation of {} columns",
                self.columns.len()
            )));
        }
        let moved = order
            .iter()
            .zip(&self.order)
            .filter(|(new, old)| new != old)
            .map(|(new, _)| *new)
            .collect();
        self.order = order;
        Ok(moved)
    }

    /// Returns whether the width changed.
    pub fn set_width(&mut self, column: usize, width: i32) -> Result<bool> {
        if width < 0 {
            return Err(GridError::InvalidArgument(format!(
                "column width must be >= 0, got {width}"
            )));
        }
        let col = self.get_mut(column)?;
        let changed = col.width != width;
        col.width = width;
        Ok(changed)
    }

    /// Returns whether the effective visibility changed.
    pub fn set_visible(&mut self, column: usize, visible: bool) -> Result<bool> {
        let before = self.is_visible(column);
        self.get_mut(column)?.visible = visible;
        Ok(before != self.is_visible(column))
    }

    /// Returns whether the expanded flag changed.
    pub fn set_group_expanded(&mut self, group: GroupId, expanded: bool) -> Result<bool> {
        let g = self.group_mut(group)?;
        let changed = g.expanded != expanded;
        g.expanded = expanded;
        Ok(changed)
    }

    /// Effective visibility: own flag plus the group's detail/summary rule.
    pub fn is_visible(&self, column: usize) -> bool {
        let Some(col) = self.columns.get(column) else {
            return false;
        };
        if !col.visible {
            return false;
        }
        match col.group.and_then(|g| self.groups.get(g.0)) {
            Some(group) if group.expanded => col.detail,
            Some(_) => col.summary,
            None => true,
        }
    }

    /// Width a column takes on screen (0 when hidden).
    pub fn effective_width(&self, column: usize) -> i32 {
        match self.columns.get(column) {
            Some(col) if self.is_visible(column) => col.width,
            _ => 0,
        }
    }

    pub fn is_tree(&self, column: usize) -> bool {
        self.columns.get(column).is_some_and(|c| c.tree)
    }

    /// Horizontal offset of a column's left edge from the first visual column.
    pub fn x_offset(&self, column: usize) -> i32 {
        let visual = crate::layout::SpanResolver::visual_position(&self.order, column);
        self.order
            .iter()
            .take(visual)
            .map(|c| self.effective_width(*c))
            .sum()
    }

    pub fn total_width(&self) -> i32 {
        self.order.iter().map(|c| self.effective_width(*c)).sum()
    }

    /// Visible columns in display order.
    pub fn visible_in_order(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied().filter(|c| self.is_visible(*c))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn three() -> ColumnSet {
        let mut set = ColumnSet::new();
        for w in [10, 20, 30] {
            set.push(Column::new(w)).unwrap();
        }
        set
    }

    #[test]
    fn test_offsets_follow_order() {
        let mut set = three();
        assert_eq!(set.x_offset(2), 30);
        let moved = set.set_order(vec![2, 0, 1]).unwrap();
        assert_eq!(moved, vec![2, 0, 1]);
        assert_eq!(set.x_offset(2), 0);
        assert_eq!(set.x_offset(1), 40);
    }

    #[test]
    fn test_partial_move_reports_only_moved() {
        let mut set = three();
        let moved = set.set_order(vec![0, 2, 1]).unwrap();
        assert_eq!(moved, vec![2, 1]);
    }

    #[test]
    fn test_order_must_be_permutation() {
        let mut set = three();
        assert!(matches!(
            set.set_order(vec![0, 0, 1]),
            Err(GridError::InvalidArgument(_))
        ));
        assert!(set.set_order(vec![0, 1]).is_err());
        assert!(set.set_order(vec![0, 1, 7]).is_err());
    }

    #[test]
    fn test_hidden_column_has_no_width() {
        let mut set = three();
        assert!(set.set_visible(1, false).unwrap());
        assert!(!set.set_visible(1, false).unwrap());
        assert_eq!(set.effective_width(1), 0);
        assert_eq!(set.x_offset(2), 10);
        assert_eq!(set.total_width(), 40);
    }

    #[test]
    fn test_group_detail_and_summary() {
        let mut set = ColumnSet::new();
        let g = set.add_group(true);
        let detail = set
            .push(Column::new(10).in_group(g).with_group_roles(true, false))
            .unwrap();
        let summary = set
            .push(Column::new(10).in_group(g).with_group_roles(false, true))
            .unwrap();
        assert!(set.is_visible(detail));
        assert!(!set.is_visible(summary));

        set.set_group_expanded(g, false).unwrap();
        assert!(!set.is_visible(detail));
        assert!(set.is_visible(summary));
        assert_eq!(set.group(g).unwrap().columns(), &[detail, summary]);
    }

    #[test]
    fn test_unknown_group_rejected() {
        let mut set = ColumnSet::new();
        assert!(matches!(
            set.push(Column::new(10).in_group(GroupId(3))),
            Err(GridError::InvalidRange { index: 3, len: 0 })
        ));
    }
}
