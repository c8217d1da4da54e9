//! Selection pruning and focus transfer on collapse.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

mod fixtures;
mod common;

use cellgrid::{GridConfig, Notification, SelectionDetail, SelectionMode};
use common::{children, roots, selection_notifications, GridBuilder};

#[test]
fn test_collapse_deselects_descendants_with_one_notification() {
    let mut grid = GridBuilder::new().columns(&[50]).build();
    let root = roots(&mut grid, 1)[0];
    let kids = children(&mut grid, root, 3);
    let grandkid = children(&mut grid, kids[0], 1)[0];
    grid.set_expanded(root, true).unwrap();
    grid.set_expanded(kids[0], true).unwrap();
    for id in [kids[0], kids[2], grandkid] {
        grid.select(id).unwrap();
    }
    grid.select(root).unwrap();
    grid.take_notifications();

    grid.set_expanded(root, false).unwrap();

    assert_eq!(
        selection_notifications(&mut grid),
        vec![Notification::Selection {
            item: root,
            detail: SelectionDetail::Changed
        }]
    );
    for id in kids.iter().copied().chain([grandkid]) {
        assert!(!grid.is_selected(id), "{id} still selected");
    }
    assert!(grid.is_selected(root));
}

#[test]
fn test_collapse_without_selected_descendants_is_silent() {
    let mut grid = GridBuilder::new().columns(&[50]).build();
    let root = roots(&mut grid, 1)[0];
    children(&mut grid, root, 2);
    grid.set_expanded(root, true).unwrap();
    grid.select(root).unwrap();
    grid.take_notifications();

    grid.set_expanded(root, false).unwrap();
    assert!(selection_notifications(&mut grid).is_empty());
}

#[test]
fn test_cell_mode_clears_cells_of_every_column() {
    let config = GridConfig {
        selection_mode: SelectionMode::Cell,
        ..GridConfig::default()
    };
    let mut grid = GridBuilder::new()
        .config(config)
        .columns(&[50, 50, 50])
        .build();
    let r = roots(&mut grid, 2);
    let kid = children(&mut grid, r[0], 1)[0];
    grid.set_expanded(r[0], true).unwrap();
    grid.select_cell(kid, 0).unwrap();
    grid.select_cell(kid, 2).unwrap();
    grid.select_cell(r[1], 1).unwrap();
    grid.take_notifications();

    grid.set_expanded(r[0], false).unwrap();

    assert_eq!(selection_notifications(&mut grid).len(), 1);
    assert!(!grid.is_cell_selected(kid, 0));
    assert!(!grid.is_cell_selected(kid, 2));
    assert!(grid.is_cell_selected(r[1], 1));
}

#[test]
fn test_focus_on_hidden_descendant_moves_to_collapsed_row() {
    let mut grid = GridBuilder::new().columns(&[50]).build();
    let root = roots(&mut grid, 1)[0];
    let kid = children(&mut grid, root, 1)[0];
    let grandkid = children(&mut grid, kid, 1)[0];
    grid.set_expanded(root, true).unwrap();
    grid.set_expanded(kid, true).unwrap();
    grid.set_focus(Some(grandkid), None).unwrap();

    grid.set_expanded(root, false).unwrap();
    assert_eq!(grid.focus(), Some(root));
}

#[test]
fn test_focus_on_visible_row_is_kept() {
    let mut grid = GridBuilder::new().columns(&[50]).build();
    let r = roots(&mut grid, 2);
    children(&mut grid, r[0], 1);
    grid.set_expanded(r[0], true).unwrap();
    grid.set_focus(Some(r[1]), None).unwrap();

    grid.set_expanded(r[0], false).unwrap();
    assert_eq!(grid.focus(), Some(r[1]));
}
