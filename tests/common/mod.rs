//! Assertion helpers shared by the integration tests.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use cellgrid::{Grid, ItemTree, Notification};

// Re-export fixtures for convenience
pub use super::fixtures::*;

/// Every non-root row is visible iff its parent is visible and expanded, and
/// the visible counter matches.
pub fn assert_visibility_invariant(tree: &ItemTree) {
    let mut visible = 0;
    for id in tree.rows() {
        let node = tree.node(id).unwrap();
        if node.is_visible() {
            visible += 1;
        }
        if let Some(parent) = node.parent() {
            let expected = tree.is_visible(parent).unwrap() && tree.is_expanded(parent).unwrap();
            assert_eq!(
                node.is_visible(),
                expected,
                "{id} visibility disagrees with parent {parent}"
            );
        }
    }
    assert_eq!(tree.visible_count(), visible, "visible row counter drifted");
}

/// Cached row indices agree with a fresh depth-first walk.
pub fn assert_row_indices(tree: &ItemTree) {
    let expected: Vec<_> = tree.rows().collect();
    for (row, id) in expected.iter().enumerate() {
        assert_eq!(tree.row_index(*id).unwrap(), row, "row index of {id}");
        assert_eq!(tree.item_at(row), Some(*id));
    }
    // Visible order is the depth-first order filtered by visibility.
    let visible: Vec<_> = tree.visible_rows().collect();
    let filtered: Vec<_> = expected
        .iter()
        .copied()
        .filter(|id| tree.is_visible(*id).unwrap())
        .collect();
    assert_eq!(visible, filtered);
}

/// Selection notifications queued on `grid`, draining everything.
pub fn selection_notifications(grid: &mut Grid) -> Vec<Notification> {
    grid.take_notifications()
        .into_iter()
        .filter(|n| matches!(n, Notification::Selection { .. }))
        .collect()
}

/// Data requests queued on `grid`, draining everything.
pub fn set_data_requests(grid: &mut Grid) -> Vec<(cellgrid::ItemId, usize)> {
    grid.take_notifications()
        .into_iter()
        .filter_map(|n| match n {
            Notification::SetData { item, index } => Some((item, index)),
            _ => None,
        })
        .collect()
}
