//! Hierarchy tests: visibility cascade, row indices and disposal.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::cast_possible_truncation
)]

mod fixtures;
mod common;

use cellgrid::{Grid, GridError, ItemId, ItemTree, Notification};
use common::{assert_row_indices, assert_visibility_invariant, children, roots, GridBuilder};
use test_case::test_case;

// ============================================================================
// VISIBILITY CASCADE
// ============================================================================

#[test]
fn test_children_of_collapsed_parent_start_hidden() {
    let mut grid = GridBuilder::new().build();
    let root = roots(&mut grid, 1)[0];
    let kids = children(&mut grid, root, 3);
    for kid in &kids {
        assert!(!grid.tree().is_visible(*kid).unwrap());
        assert_eq!(grid.tree().level(*kid).unwrap(), 1);
    }
    assert_eq!(grid.tree().visible_count(), 1);

    grid.set_expanded(root, true).unwrap();
    assert_eq!(grid.tree().visible_count(), 4);
    assert_visibility_invariant(grid.tree());
}

#[test]
fn test_expand_does_not_reveal_collapsed_grandchildren() {
    let mut grid = GridBuilder::new().build();
    let root = roots(&mut grid, 1)[0];
    let mid = children(&mut grid, root, 1)[0];
    let leaf = children(&mut grid, mid, 1)[0];

    grid.set_expanded(root, true).unwrap();
    assert!(grid.tree().is_visible(mid).unwrap());
    assert!(!grid.tree().is_visible(leaf).unwrap());

    grid.set_expanded(mid, true).unwrap();
    assert!(grid.tree().is_visible(leaf).unwrap());

    // Collapsing the root hides both levels; re-expanding restores the
    // remembered expansion of `mid`.
    grid.set_expanded(root, false).unwrap();
    assert!(!grid.tree().is_visible(leaf).unwrap());
    grid.set_expanded(root, true).unwrap();
    assert!(grid.tree().is_visible(leaf).unwrap());
    assert_visibility_invariant(grid.tree());
}

#[test]
fn test_hidden_root_hides_subtree() {
    let mut grid = GridBuilder::new().build();
    let root = roots(&mut grid, 1)[0];
    let kid = children(&mut grid, root, 1)[0];
    grid.set_expanded(root, true).unwrap();

    grid.set_item_visible(root, false).unwrap();
    assert!(!grid.tree().is_visible(kid).unwrap());
    assert_eq!(grid.tree().visible_count(), 0);

    grid.set_item_visible(root, true).unwrap();
    assert!(grid.tree().is_visible(kid).unwrap());
    assert_visibility_invariant(grid.tree());
}

#[test]
fn test_child_visibility_cannot_be_set_directly() {
    let mut grid = GridBuilder::new().build();
    let root = roots(&mut grid, 1)[0];
    let kid = children(&mut grid, root, 1)[0];
    assert!(matches!(
        grid.set_item_visible(kid, true),
        Err(GridError::InvalidState(_))
    ));
}

/// Deterministic pseudo-random walk over insert/remove/expand/collapse.
#[test_case(7; "seed 7")]
#[test_case(42; "seed 42")]
#[test_case(1234; "seed 1234")]
fn test_invariants_hold_under_mixed_operations(seed: u64) {
    let mut state = seed;
    let mut next = move |bound: usize| {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((state >> 33) as usize) % bound.max(1)
    };

    let mut grid = GridBuilder::new().build();
    let mut live: Vec<ItemId> = Vec::new();
    for _ in 0..300 {
        match next(4) {
            0 | 1 => {
                let parent = if live.is_empty() || next(3) == 0 {
                    None
                } else {
                    Some(live[next(live.len())])
                };
                let siblings = match parent {
                    Some(p) => grid.tree().child_count(p).unwrap(),
                    None => grid.tree().roots().len(),
                };
                let index = (next(2) == 0).then(|| next(siblings + 1));
                live.push(grid.insert_item(parent, index).unwrap());
            }
            2 if !live.is_empty() => {
                let target = live[next(live.len())];
                grid.set_expanded(target, next(2) == 0).unwrap();
            }
            3 if !live.is_empty() => {
                let target = live[next(live.len())];
                grid.dispose_item(target).unwrap();
                live.retain(|id| grid.contains(*id));
            }
            _ => {}
        }
        assert_visibility_invariant(grid.tree());
    }
    assert_eq!(grid.item_count(), live.len());
    assert_row_indices(grid.tree());
}

// ============================================================================
// ROW INDICES
// ============================================================================

#[test]
fn test_row_indices_follow_depth_first_order() {
    let mut grid = GridBuilder::new().build();
    let r = roots(&mut grid, 2);
    let a = children(&mut grid, r[0], 2);
    let deep = children(&mut grid, a[0], 1)[0];
    // Insert in front of existing siblings to force shifts.
    let first = grid.insert_item(Some(r[0]), Some(0)).unwrap();
    let front_root = grid.insert_item(None, Some(0)).unwrap();

    let order: Vec<_> = grid.tree().rows().collect();
    assert_eq!(order, vec![front_root, r[0], first, a[0], deep, a[1], r[1]]);
    assert_row_indices(grid.tree());
}

#[test]
fn test_row_index_survives_cache_invalidation() {
    let mut grid = GridBuilder::new().build();
    let r = roots(&mut grid, 3);
    grid.tree().invalidate_row_indices();
    assert_eq!(grid.tree().row_index(r[2]).unwrap(), 2);
    assert_row_indices(grid.tree());
}

#[test]
fn test_visible_index_skips_hidden_rows() {
    let mut grid = GridBuilder::new().build();
    let r = roots(&mut grid, 2);
    children(&mut grid, r[0], 3);
    assert_eq!(grid.tree().row_index(r[1]).unwrap(), 4);
    assert_eq!(grid.tree().visible_index(r[1]).unwrap(), Some(1));
}

// ============================================================================
// STRUCTURAL HOUSEKEEPING
// ============================================================================

fn scroll_bound_notices(grid: &mut Grid) -> usize {
    grid.take_notifications()
        .iter()
        .filter(|n| matches!(n, Notification::ScrollBoundsObsolete))
        .count()
}

#[test]
fn test_scroll_bounds_reported_once_until_acknowledged() {
    let mut grid = GridBuilder::new().build();
    let r = roots(&mut grid, 2);
    children(&mut grid, r[0], 2);
    children(&mut grid, r[1], 2);
    grid.set_expanded(r[0], true).unwrap();
    grid.set_expanded(r[1], true).unwrap();
    assert_eq!(scroll_bound_notices(&mut grid), 1);
    grid.acknowledge_scroll_bounds();

    grid.set_expanded(r[0], false).unwrap();
    grid.set_expanded(r[1], false).unwrap();
    assert!(grid.scroll_bounds_obsolete());
    assert_eq!(scroll_bound_notices(&mut grid), 1);

    // Still obsolete: nothing new is queued.
    roots(&mut grid, 1);
    assert_eq!(scroll_bound_notices(&mut grid), 0);

    grid.acknowledge_scroll_bounds();
    assert!(!grid.scroll_bounds_obsolete());
    grid.set_expanded(r[0], true).unwrap();
    assert_eq!(scroll_bound_notices(&mut grid), 1);
}

#[test]
fn test_collapse_refreshes_displayed_range() {
    // Header 20, then five 20px rows with 1px lines fit in 125px.
    let mut grid = GridBuilder::new().size(200, 125).build();
    let root = roots(&mut grid, 1)[0];
    let kids = children(&mut grid, root, 3);
    let rest = roots(&mut grid, 4);
    grid.set_expanded(root, true).unwrap();

    assert_eq!(grid.viewport().top_index(grid.tree()), Some(0));
    assert_eq!(grid.viewport().bottom_index(grid.tree()), Some(4));
    assert!(grid.is_shown(kids[2]));

    grid.set_expanded(root, false).unwrap();
    assert_eq!(grid.viewport().top_index(grid.tree()), Some(0));
    assert_eq!(grid.viewport().bottom_index(grid.tree()), Some(7));
    assert!(!grid.is_shown(kids[2]));
    assert!(grid.is_shown(rest[3]));

    grid.set_expanded(root, true).unwrap();
    assert_eq!(grid.viewport().bottom_index(grid.tree()), Some(4));
    assert!(!grid.is_shown(rest[1]));
}

#[test]
fn test_insert_refreshes_displayed_range() {
    let mut grid = GridBuilder::new().size(200, 125).build();
    let r = roots(&mut grid, 2);
    assert_eq!(grid.viewport().bottom_index(grid.tree()), Some(1));

    roots(&mut grid, 5);
    assert_eq!(grid.viewport().bottom_index(grid.tree()), Some(4));
    grid.dispose_item(r[0]).unwrap();
    assert_eq!(grid.viewport().top_index(grid.tree()), Some(0));
    assert_eq!(grid.tree().row_index(r[1]).unwrap(), 0);
}

// ============================================================================
// DISPOSAL
// ============================================================================

#[test_case(1; "one row")]
#[test_case(5; "five rows")]
#[test_case(64; "many rows")]
fn test_insert_then_remove_in_reverse_restores_empty(count: usize) {
    let mut grid = GridBuilder::new().build();
    let rows = roots(&mut grid, count);
    for id in rows.iter().rev() {
        grid.dispose_item(*id).unwrap();
    }
    let tree = grid.tree();
    assert!(tree.is_empty());
    assert_eq!(tree.visible_count(), 0);
    assert!(tree.roots().is_empty());
    assert_eq!(tree.rows().count(), 0);
    for id in rows {
        assert!(matches!(tree.row_index(id), Err(GridError::DisposedAccess)));
    }
}

#[test]
fn test_dispose_cascades_and_reindexes() {
    let mut grid = GridBuilder::new().build();
    let r = roots(&mut grid, 2);
    let kids = children(&mut grid, r[0], 2);
    children(&mut grid, kids[1], 2);
    grid.set_expanded(r[0], true).unwrap();

    grid.dispose_item(kids[1]).unwrap();
    assert_eq!(grid.item_count(), 3);
    assert_eq!(grid.tree().children(r[0]).unwrap(), &[kids[0]]);
    assert_eq!(grid.tree().row_index(r[1]).unwrap(), 2);
    assert_visibility_invariant(grid.tree());
    assert_row_indices(grid.tree());
}

#[test]
fn test_stale_handle_after_slot_reuse() {
    let mut tree = ItemTree::default();
    let old = tree.insert(None, None).unwrap();
    tree.remove(old).unwrap();
    let new = tree.insert(None, None).unwrap();
    assert_ne!(old, new);
    assert!(matches!(tree.node(old), Err(GridError::DisposedAccess)));
    assert!(tree.node(new).is_ok());
}

#[test]
fn test_child_queries_report_errors() {
    let mut grid = GridBuilder::new().build();
    let root = roots(&mut grid, 1)[0];
    assert!(matches!(
        grid.tree().child(root, 0),
        Err(GridError::InvalidState(_))
    ));
    let kid = children(&mut grid, root, 1)[0];
    assert_eq!(grid.tree().child(root, 0).unwrap(), kid);
    assert!(matches!(
        grid.tree().child(root, 1),
        Err(GridError::InvalidRange { index: 1, len: 1 })
    ));
    assert_eq!(grid.tree().index_of(root, kid).unwrap(), Some(0));
    assert!(grid.insert_item(Some(root), Some(5)).is_err());
}
