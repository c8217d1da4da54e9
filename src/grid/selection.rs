use std::collections::HashSet;

use crate::tree::ItemId;
use crate::types::SelectionMode;

/// Selected rows or cells, depending on the mode.
///
/// Only one of the two sets is in use at a time; switching modes clears
/// both.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    mode: SelectionMode,
    rows: HashSet<ItemId>,
    cells: HashSet<(ItemId, usize)>,
}

impl SelectionModel {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SelectionMode) {
        if self.mode != mode {
            self.mode = mode;
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.cells.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cells.is_empty()
    }

    pub fn select(&mut self, item: ItemId) -> bool {
        self.rows.insert(item)
    }

    pub fn deselect(&mut self, item: ItemId) -> bool {
        self.rows.remove(&item)
    }

    pub fn is_selected(&self, item: ItemId) -> bool {
        self.rows.contains(&item)
    }

    pub fn select_cell(&mut self, item: ItemId, column: usize) -> bool {
        self.cells.insert((item, column))
    }

    pub fn deselect_cell(&mut self, item: ItemId, column: usize) -> bool {
        self.cells.remove(&(item, column))
    }

    pub fn is_cell_selected(&self, item: ItemId, column: usize) -> bool {
        self.cells.contains(&(item, column))
    }

    pub fn selected_rows(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.rows.iter().copied()
    }

    pub fn selected_cells(&self) -> impl Iterator<Item = (ItemId, usize)> + '_ {
        self.cells.iter().copied()
    }

    /// Deselect `items` according to the active mode: whole rows in row
    /// mode, every cell of the rows in cell mode. Returns whether anything
    /// was deselected.
    pub fn deselect_all_of(&mut self, items: &[ItemId]) -> bool {
        match self.mode {
            SelectionMode::Row => items
                .iter()
                .fold(false, |any, item| self.rows.remove(item) || any),
            SelectionMode::Cell => {
                let before = self.cells.len();
                self.cells.retain(|(item, _)| !items.contains(item));
                self.cells.len() != before
            }
        }
    }

    /// Forget a disposed row.
    pub fn purge(&mut self, item: ItemId) {
        self.rows.remove(&item);
        self.cells.retain(|(id, _)| *id != item);
    }
}
