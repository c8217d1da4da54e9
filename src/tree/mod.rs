//! Arena-owned item hierarchy.
//!
//! The tree owns every [`ItemNode`] by value; parents, children and roots are
//! [`ItemId`] handles into the arena. It maintains:
//! - Level and visibility at insertion time
//! - The visibility cascade on expand/collapse (a non-root row is visible iff
//!   its parent is visible and expanded)
//! - A count of visible rows
//! - Flat row indices (depth-first position over all rows), cached per item
//!   and recomputed by a scan when an entry is missing

mod node;
mod row_index;

pub use node::{ItemId, ItemNode};

use crate::error::{GridError, Result};
use crate::types::{RowDefaults, RowHeader};
use row_index::RowIndexCache;

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: i32 = 20;

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<ItemNode>,
}

/// Forest of grid rows.
#[derive(Debug)]
pub struct ItemTree {
    slots: Vec<Slot>,
    free: Vec<usize>,
    roots: Vec<ItemId>,
    len: usize,
    visible_count: usize,
    default_height: i32,
    row_cache: RowIndexCache,
}

impl Default for ItemTree {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_HEIGHT)
    }
}

impl ItemTree {
    /// Create an empty tree whose new rows start at `default_height` pixels.
    pub fn new(default_height: i32) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
            len: 0,
            visible_count: 0,
            default_height: default_height.max(1),
            row_cache: RowIndexCache::default(),
        }
    }

    /// Total number of rows, visible or not
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no rows
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of rows whose visible flag is set
    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// Root rows in display order
    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    /// Height given to newly inserted rows
    pub fn default_height(&self) -> i32 {
        self.default_height
    }

    /// Whether `id` still refers to a live row
    pub fn contains(&self, id: ItemId) -> bool {
        self.node(id).is_ok()
    }

    /// Look up a live node.
    ///
    /// # Errors
    /// `DisposedAccess` if the handle no longer refers to a live item.
    pub fn node(&self, id: ItemId) -> Result<&ItemNode> {
        self.slots
            .get(id.slot)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(GridError::DisposedAccess)
    }

    pub(crate) fn node_mut(&mut self, id: ItemId) -> Result<&mut ItemNode> {
        self.slots
            .get_mut(id.slot)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(GridError::DisposedAccess)
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// Insert a new row under `parent` (or as a root) at `index` among its
    /// siblings, appending when `index` is `None`.
    ///
    /// Roots start visible; children are visible iff the parent is visible
    /// and expanded.
    ///
    /// # Errors
    /// `DisposedAccess` for a dead parent, `InvalidRange` if `index` is past
    /// the end of the sibling list.
    pub fn insert(&mut self, parent: Option<ItemId>, index: Option<usize>) -> Result<ItemId> {
        let (level, visible, sibling_count) = match parent {
            Some(p) => {
                let node = self.node(p)?;
                (
                    node.level + 1,
                    node.visible && node.expanded,
                    node.children.len(),
                )
            }
            None => (0, true, self.roots.len()),
        };
        if let Some(index) = index {
            GridError::check_range(index, sibling_count + 1)?;
        }

        let row = self.insertion_row(parent, index)?;
        let id = self.allocate(parent, level);
        if let Ok(node) = self.node_mut(id) {
            node.visible = visible;
        }

        let siblings = match parent {
            Some(p) => &mut self.node_mut(p)?.children,
            None => &mut self.roots,
        };
        match index {
            Some(index) => siblings.insert(index, id),
            None => siblings.push(id),
        }

        // Appending after the last row displaces nothing.
        if row < self.len {
            self.row_cache.increment_from(row);
        }
        self.row_cache.set(id, row);
        self.len += 1;
        if visible {
            self.visible_count += 1;
        }
        log::debug!("insert {id} at row {row} (level {level}, visible {visible})");
        Ok(id)
    }

    /// Flat row the next inserted item will occupy.
    fn insertion_row(&self, parent: Option<ItemId>, index: Option<usize>) -> Result<usize> {
        let siblings = match parent {
            Some(p) => self.node(p)?.children.as_slice(),
            None => self.roots.as_slice(),
        };
        if let Some(&displaced) = index.and_then(|i| siblings.get(i)) {
            return self.row_index(displaced);
        }
        match parent {
            Some(p) => Ok(self.row_index(self.last_descendant(p))? + 1),
            None => Ok(self.len),
        }
    }

    fn allocate(&mut self, parent: Option<ItemId>, level: usize) -> ItemId {
        let height = self.default_height;
        if let Some(slot) = self.free.pop() {
            if let Some(entry) = self.slots.get_mut(slot) {
                let id = ItemId {
                    slot,
                    generation: entry.generation,
                };
                entry.node = Some(ItemNode::new(id, parent, level, height));
                return id;
            }
        }
        let id = ItemId {
            slot: self.slots.len(),
            generation: 0,
        };
        self.slots.push(Slot {
            generation: 0,
            node: Some(ItemNode::new(id, parent, level, height)),
        });
        id
    }

    fn release(&mut self, slot: usize) {
        if let Some(entry) = self.slots.get_mut(slot) {
            entry.node = None;
            entry.generation = entry.generation.wrapping_add(1);
            self.free.push(slot);
        }
    }

    /// Remove a row and its whole subtree.
    ///
    /// Children go first, youngest to oldest, depth-first; the returned list
    /// is in removal order so callers can release per-row data.
    ///
    /// # Errors
    /// `DisposedAccess` if the item is already gone.
    pub fn remove(&mut self, id: ItemId) -> Result<Vec<ItemId>> {
        self.node(id)?;
        let mut removed = Vec::new();
        self.remove_subtree(id, &mut removed);
        log::debug!("removed {id} and {} descendants", removed.len().saturating_sub(1));
        Ok(removed)
    }

    fn remove_subtree(&mut self, id: ItemId, removed: &mut Vec<ItemId>) {
        let children = match self.node(id) {
            Ok(node) => node.children.clone(),
            Err(_) => return,
        };
        for child in children.into_iter().rev() {
            self.remove_subtree(child, removed);
        }

        let row = self.row_index(id).ok();
        let Ok(node) = self.node(id) else {
            return;
        };
        let (parent, visible) = (node.parent, node.visible);
        match parent {
            Some(p) => {
                if let Ok(parent_node) = self.node_mut(p) {
                    parent_node.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }

        self.row_cache.forget(id);
        if let Some(row) = row {
            self.row_cache.decrement_after(row);
        }
        if visible {
            self.visible_count = self.visible_count.saturating_sub(1);
        }
        self.len = self.len.saturating_sub(1);
        self.release(id.slot);
        removed.push(id);
    }

    /// Drop every row without per-row bookkeeping. Returns the released
    /// handles, descendants before their ancestors.
    pub fn clear(&mut self) -> Vec<ItemId> {
        let mut all: Vec<ItemId> = self.rows().collect();
        all.reverse();
        for id in &all {
            self.release(id.slot);
        }
        self.roots.clear();
        self.len = 0;
        self.visible_count = 0;
        self.row_cache.invalidate_all();
        all
    }

    // -------------------------------------------------------------------------
    // Expansion and visibility
    // -------------------------------------------------------------------------

    /// Set the expanded flag and cascade visibility to descendants.
    ///
    /// Returns whether the flag changed.
    pub fn set_expanded(&mut self, id: ItemId, expanded: bool) -> Result<bool> {
        let node = self.node_mut(id)?;
        let changed = node.expanded != expanded;
        node.expanded = expanded;
        let children_visible = expanded && node.visible;
        let children = node.children.clone();
        for child in children {
            self.set_visible(child, children_visible)?;
        }
        Ok(changed)
    }

    /// Set a row's visible flag, cascading `visible && expanded` to children.
    ///
    /// Used by the expand/collapse cascade and by host-side filtering of roots.
    pub fn set_visible(&mut self, id: ItemId, visible: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.visible == visible {
            return Ok(());
        }
        node.visible = visible;
        let children_visible = visible && node.expanded;
        let children = node.children.clone();

        if visible {
            self.visible_count += 1;
        } else {
            self.visible_count = self.visible_count.saturating_sub(1);
        }
        for child in children {
            self.set_visible(child, children_visible)?;
        }
        Ok(())
    }

    /// Whether the row is visible (roots: own flag; others: parent visible and expanded)
    pub fn is_visible(&self, id: ItemId) -> Result<bool> {
        Ok(self.node(id)?.visible)
    }

    /// Whether the row shows its children when visible
    pub fn is_expanded(&self, id: ItemId) -> Result<bool> {
        Ok(self.node(id)?.expanded)
    }

    // -------------------------------------------------------------------------
    // Node queries
    // -------------------------------------------------------------------------

    /// Depth of the row, 0 for roots
    pub fn level(&self, id: ItemId) -> Result<usize> {
        Ok(self.node(id)?.level)
    }

    /// Parent row, `None` for roots
    pub fn parent(&self, id: ItemId) -> Result<Option<ItemId>> {
        Ok(self.node(id)?.parent)
    }

    /// Direct children in display order
    pub fn children(&self, id: ItemId) -> Result<&[ItemId]> {
        Ok(self.node(id)?.children.as_slice())
    }

    /// Number of direct children
    pub fn child_count(&self, id: ItemId) -> Result<usize> {
        Ok(self.node(id)?.children.len())
    }

    /// Whether the row has at least one child
    pub fn has_children(&self, id: ItemId) -> Result<bool> {
        Ok(self.node(id)?.has_children())
    }

    /// Child at `index`.
    ///
    /// # Errors
    /// `InvalidState` on a leaf, `InvalidRange` past the last child.
    pub fn child(&self, id: ItemId, index: usize) -> Result<ItemId> {
        let node = self.node(id)?;
        if node.children.is_empty() {
            return Err(GridError::InvalidState(format!("{id} has no children")));
        }
        node.children
            .get(index)
            .copied()
            .ok_or(GridError::InvalidRange {
                index,
                len: node.children.len(),
            })
    }

    /// Position of `child` among `parent`'s children, `None` if it is not one.
    pub fn index_of(&self, parent: ItemId, child: ItemId) -> Result<Option<usize>> {
        let node = self.node(parent)?;
        self.node(child)?;
        if node.children.is_empty() {
            return Err(GridError::InvalidState(format!("{parent} has no children")));
        }
        Ok(node.children.iter().position(|c| *c == child))
    }

    /// Position of a row among its siblings (root list for roots).
    pub fn sibling_index(&self, id: ItemId) -> Result<usize> {
        let node = self.node(id)?;
        let siblings = match node.parent {
            Some(p) => self.node(p)?.children.as_slice(),
            None => self.roots.as_slice(),
        };
        siblings
            .iter()
            .position(|s| *s == id)
            .ok_or_else(|| GridError::InvalidState(format!("{id} missing from its parent")))
    }

    /// Row height in pixels
    pub fn height(&self, id: ItemId) -> Result<i32> {
        Ok(self.node(id)?.height)
    }

    /// # Errors
    /// `InvalidArgument` when `height < 1`.
    pub fn set_height(&mut self, id: ItemId, height: i32) -> Result<()> {
        if height < 1 {
            return Err(GridError::InvalidArgument(format!(
                "row height must be >= 1, got {height}"
            )));
        }
        self.node_mut(id)?.height = height;
        Ok(())
    }

    /// Whether data for a virtual row has been requested
    pub fn is_materialized(&self, id: ItemId) -> Result<bool> {
        Ok(self.node(id)?.materialized)
    }

    pub(crate) fn set_materialized(&mut self, id: ItemId, materialized: bool) -> Result<()> {
        self.node_mut(id)?.materialized = materialized;
        Ok(())
    }

    /// Row-level default decorations
    pub fn defaults(&self, id: ItemId) -> Result<&RowDefaults> {
        Ok(&self.node(id)?.defaults)
    }

    /// Mutable row-level default decorations
    pub fn defaults_mut(&mut self, id: ItemId) -> Result<&mut RowDefaults> {
        Ok(&mut self.node_mut(id)?.defaults)
    }

    /// Row header content.
    pub fn header(&self, id: ItemId) -> Result<&RowHeader> {
        Ok(&self.node(id)?.header)
    }

    /// Mutable row header content
    pub fn header_mut(&mut self, id: ItemId) -> Result<&mut RowHeader> {
        Ok(&mut self.node_mut(id)?.header)
    }

    /// Number of rows below `id` in its subtree.
    pub fn descendant_count(&self, id: ItemId) -> usize {
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Ok(node) = self.node(next) {
                count += node.children.len();
                stack.extend_from_slice(&node.children);
            }
        }
        count
    }

    /// Deepest last row of `id`'s subtree (`id` itself for a leaf).
    pub fn last_descendant(&self, id: ItemId) -> ItemId {
        let mut current = id;
        while let Some(&last) = self
            .node(current)
            .ok()
            .and_then(|node| node.children.last())
        {
            current = last;
        }
        current
    }

    /// All rows below `id`, depth-first.
    pub fn descendants(&self, id: ItemId) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut stack: Vec<ItemId> = match self.node(id) {
            Ok(node) => node.children.iter().rev().copied().collect(),
            Err(_) => return out,
        };
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Ok(node) = self.node(next) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    // -------------------------------------------------------------------------
    // Flat row order
    // -------------------------------------------------------------------------

    /// Depth-first position of `id` over all rows.
    ///
    /// Served from the cache when possible; otherwise every row is renumbered
    /// by a scan, so the worst case is O(n).
    pub fn row_index(&self, id: ItemId) -> Result<usize> {
        self.node(id)?;
        if let Some(row) = self.row_cache.get(id) {
            return Ok(row);
        }
        log::trace!("row index cache miss for {id}");
        let mut found = None;
        for (row, item) in self.rows().enumerate() {
            self.row_cache.set(item, row);
            if item == id {
                found = Some(row);
            }
        }
        found.ok_or(GridError::DisposedAccess)
    }

    /// Drop all cached row indices; the next query rescans.
    pub fn invalidate_row_indices(&self) {
        self.row_cache.invalidate_all();
    }

    /// Row at depth-first position `row`.
    pub fn item_at(&self, row: usize) -> Option<ItemId> {
        self.rows().nth(row)
    }

    /// Position of `id` among visible rows, `None` when hidden.
    pub fn visible_index(&self, id: ItemId) -> Result<Option<usize>> {
        if !self.node(id)?.visible {
            return Ok(None);
        }
        Ok(self.visible_rows().position(|row| row == id))
    }

    /// All rows in depth-first order.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Visible rows in depth-first order.
    pub fn visible_rows(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.rows()
            .filter(|id| self.node(*id).map(|n| n.visible).unwrap_or(false))
    }

    /// Rows strictly after `id` in depth-first order.
    pub fn rows_after(&self, id: ItemId) -> RowsAfter<'_> {
        RowsAfter {
            tree: self,
            next: self.next_row(id),
        }
    }

    /// Depth-first successor of `id`.
    pub fn next_row(&self, id: ItemId) -> Option<ItemId> {
        let node = self.node(id).ok()?;
        if let Some(&first) = node.children.first() {
            return Some(first);
        }
        let mut current = id;
        loop {
            let node = self.node(current).ok()?;
            let siblings = match node.parent {
                Some(p) => self.node(p).ok()?.children.as_slice(),
                None => self.roots.as_slice(),
            };
            let position = siblings.iter().position(|s| *s == current)?;
            if let Some(&next) = siblings.get(position + 1) {
                return Some(next);
            }
            current = node.parent?;
        }
    }

    #[cfg(test)]
    pub(crate) fn cached_row_count(&self) -> usize {
        self.row_cache.len()
    }

    #[cfg(test)]
    pub(crate) fn cache_shift_count(&self) -> usize {
        self.row_cache.shift_count()
    }
}

/// Depth-first iterator over all rows.
pub struct Rows<'a> {
    tree: &'a ItemTree,
    stack: Vec<ItemId>,
}

impl Iterator for Rows<'_> {
    type Item = ItemId;

    fn next(&mut self) -> Option<ItemId> {
        let id = self.stack.pop()?;
        if let Ok(node) = self.tree.node(id) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(id)
    }
}

/// Depth-first iterator starting after a given row.
pub struct RowsAfter<'a> {
    tree: &'a ItemTree,
    next: Option<ItemId>,
}

impl Iterator for RowsAfter<'_> {
    type Item = ItemId;

    fn next(&mut self) -> Option<ItemId> {
        let current = self.next?;
        self.next = self.tree.next_row(current);
        Some(current)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    /// root0 { a { a1 }, b }, root1
    fn sample() -> (ItemTree, [ItemId; 6]) {
        let mut tree = ItemTree::default();
        let root0 = tree.insert(None, None).unwrap();
        let root1 = tree.insert(None, None).unwrap();
        let a = tree.insert(Some(root0), None).unwrap();
        let b = tree.insert(Some(root0), None).unwrap();
        let a1 = tree.insert(Some(a), None).unwrap();
        let x = tree.insert(Some(root1), None).unwrap();
        (tree, [root0, root1, a, b, a1, x])
    }

    #[test]
    fn test_levels_and_initial_visibility() {
        let (tree, [root0, _, a, b, a1, _]) = sample();
        assert_eq!(tree.level(root0).unwrap(), 0);
        assert_eq!(tree.level(a).unwrap(), 1);
        assert_eq!(tree.level(a1).unwrap(), 2);
        assert!(tree.is_visible(root0).unwrap());
        // Collapsed parent hides new children.
        assert!(!tree.is_visible(a).unwrap());
        assert!(!tree.is_visible(b).unwrap());
        assert_eq!(tree.visible_count(), 2);
    }

    #[test]
    fn test_row_order_is_depth_first() {
        let (tree, [root0, root1, a, b, a1, x]) = sample();
        let rows: Vec<_> = tree.rows().collect();
        assert_eq!(rows, vec![root0, a, a1, b, root1, x]);
        for (expected, id) in rows.iter().enumerate() {
            assert_eq!(tree.row_index(*id).unwrap(), expected);
        }
    }

    #[test]
    fn test_cached_rows_match_scan() {
        let (tree, ids) = sample();
        let cached: Vec<_> = ids.iter().map(|id| tree.row_index(*id).unwrap()).collect();
        tree.invalidate_row_indices();
        let scanned: Vec<_> = ids.iter().map(|id| tree.row_index(*id).unwrap()).collect();
        assert_eq!(cached, scanned);
        assert_eq!(tree.cached_row_count(), ids.len());
    }

    #[test]
    fn test_insert_at_index_shifts_following_rows() {
        let (mut tree, [root0, root1, a, _, _, x]) = sample();
        let c = tree.insert(Some(root0), Some(0)).unwrap();
        assert_eq!(tree.row_index(c).unwrap(), 1);
        assert_eq!(tree.row_index(a).unwrap(), 2);
        assert_eq!(tree.row_index(root1).unwrap(), 5);
        assert_eq!(tree.row_index(x).unwrap(), 6);
        assert_eq!(tree.child(root0, 0).unwrap(), c);
    }

    #[test]
    fn test_append_at_end_does_not_shift_cache() {
        let mut tree = ItemTree::default();
        let roots: Vec<_> = (0..100).map(|_| tree.insert(None, None).unwrap()).collect();
        // A child appended under the last root also lands on the last row.
        let tail = tree.insert(Some(roots[99]), None).unwrap();
        assert_eq!(tree.cache_shift_count(), 0);
        assert_eq!(tree.row_index(tail).unwrap(), 100);
        assert_eq!(tree.row_index(roots[42]).unwrap(), 42);
        assert_eq!(tree.cached_row_count(), 101);
    }

    #[test]
    fn test_append_child_lands_after_last_descendant() {
        let (mut tree, [root0, root1, a, b, a1, x]) = sample();
        let shifts = tree.cache_shift_count();
        // root0 { a { a1 }, b } ends at b (row 3)
        assert_eq!(tree.last_descendant(root0), b);
        let c = tree.insert(Some(root0), None).unwrap();
        assert_eq!(tree.row_index(c).unwrap(), 4);
        assert_eq!(tree.row_index(root1).unwrap(), 5);
        assert_eq!(tree.row_index(x).unwrap(), 6);
        assert_eq!(tree.cache_shift_count(), shifts + 1);

        let a2 = tree.insert(Some(a), None).unwrap();
        assert_eq!(tree.last_descendant(a), a2);
        assert_eq!(tree.row_index(a1).unwrap(), 2);
        assert_eq!(tree.row_index(a2).unwrap(), 3);
        assert_eq!(tree.row_index(b).unwrap(), 4);
        assert_eq!(tree.descendant_count(root0), 5);
        tree.invalidate_row_indices();
        let rows: Vec<_> = tree.rows().collect();
        assert_eq!(rows, vec![root0, a, a1, a2, b, c, root1, x]);
    }

    #[test]
    fn test_insert_index_past_end_is_rejected() {
        let (mut tree, [root0, ..]) = sample();
        assert!(matches!(
            tree.insert(Some(root0), Some(5)),
            Err(GridError::InvalidRange { index: 5, len: 3 })
        ));
    }

    #[test]
    fn test_expand_cascades_visibility() {
        let (mut tree, [root0, _, a, b, a1, _]) = sample();
        tree.set_expanded(root0, true).unwrap();
        assert!(tree.is_visible(a).unwrap());
        assert!(tree.is_visible(b).unwrap());
        assert!(!tree.is_visible(a1).unwrap());

        tree.set_expanded(a, true).unwrap();
        assert!(tree.is_visible(a1).unwrap());
        assert_eq!(tree.visible_count(), 5);

        tree.set_expanded(root0, false).unwrap();
        assert!(!tree.is_visible(a).unwrap());
        assert!(!tree.is_visible(a1).unwrap());
        // Expansion flag below survives the collapse.
        assert!(tree.is_expanded(a).unwrap());
        assert_eq!(tree.visible_count(), 2);
    }

    #[test]
    fn test_hidden_root_hides_expanded_subtree() {
        let (mut tree, [root0, _, a, _, a1, _]) = sample();
        tree.set_expanded(root0, true).unwrap();
        tree.set_expanded(a, true).unwrap();
        tree.set_visible(root0, false).unwrap();
        assert!(!tree.is_visible(a1).unwrap());
        tree.set_visible(root0, true).unwrap();
        assert!(tree.is_visible(a1).unwrap());
    }

    #[test]
    fn test_remove_subtree_order_and_shift() {
        let (mut tree, [root0, root1, a, b, a1, x]) = sample();
        let removed = tree.remove(root0).unwrap();
        assert_eq!(removed, vec![b, a1, a, root0]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.row_index(root1).unwrap(), 0);
        assert_eq!(tree.row_index(x).unwrap(), 1);
        assert!(matches!(tree.node(a1), Err(GridError::DisposedAccess)));
    }

    #[test]
    fn test_stale_handle_after_slot_reuse() {
        let mut tree = ItemTree::default();
        let first = tree.insert(None, None).unwrap();
        tree.remove(first).unwrap();
        let second = tree.insert(None, None).unwrap();
        assert_eq!(first.slot, second.slot);
        assert!(!tree.contains(first));
        assert!(tree.contains(second));
    }

    #[test]
    fn test_child_on_leaf_is_invalid_state() {
        let (tree, [_, _, _, b, _, _]) = sample();
        assert!(matches!(tree.child(b, 0), Err(GridError::InvalidState(_))));
    }

    #[test]
    fn test_set_height_rejects_zero() {
        let (mut tree, [root0, ..]) = sample();
        assert!(matches!(
            tree.set_height(root0, 0),
            Err(GridError::InvalidArgument(_))
        ));
        tree.set_height(root0, 33).unwrap();
        assert_eq!(tree.height(root0).unwrap(), 33);
    }

    #[test]
    fn test_rows_after_crosses_subtrees() {
        let (tree, [root0, root1, a, b, a1, x]) = sample();
        let after: Vec<_> = tree.rows_after(a1).collect();
        assert_eq!(after, vec![b, root1, x]);
        assert_eq!(tree.rows_after(root0).next(), Some(a));
        assert_eq!(tree.next_row(x), None);
    }

    #[test]
    fn test_clear_releases_everything() {
        let (mut tree, ids) = sample();
        let released = tree.clear();
        assert_eq!(released.len(), ids.len());
        assert!(tree.is_empty());
        assert_eq!(tree.visible_count(), 0);
        assert!(ids.iter().all(|id| !tree.contains(*id)));
    }
}
