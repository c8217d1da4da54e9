//! cellgrid - row/cell model for hierarchical, spreadsheet-like grids
//!
//! The model behind a tree grid widget, without any painting:
//! - Arena-owned row hierarchy with expand/collapse visibility cascade
//! - Cached depth-first row indices with scan fallback
//! - Column and row spans resolved to pixel rectangles
//! - Virtual rows populated on first read
//! - An overlay tracker that keeps an editor control glued to a cell
//!
//! # Usage
//!
//! ```
//! use cellgrid::{Column, Grid, GridConfig};
//!
//! let mut grid = Grid::new(&GridConfig::default());
//! grid.add_column(Column::new(120).with_tree(true)).unwrap();
//! grid.add_column(Column::new(80)).unwrap();
//!
//! let root = grid.insert_item(None, None).unwrap();
//! let child = grid.insert_item(Some(root), None).unwrap();
//! grid.set_expanded(root, true).unwrap();
//! grid.set_column_span(child, 0, 1).unwrap();
//!
//! assert_eq!(grid.cell_size(child, 0).unwrap().width, 200);
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod layout;
pub mod overlay;
pub mod provider;
pub mod scheduler;
pub mod tree;
pub mod types;
pub mod virtual_data;

pub use config::GridConfig;
pub use error::{GridError, Result};
pub use events::{ListenerId, Notification, ScrollAxis, StructuralEvent, Topic};
pub use grid::{Grid, SelectionModel};
pub use layout::{Column, ColumnSet, GroupId, SpanResolver, Viewport};
pub use overlay::{
    ControlRef, HorizontalAlignment, OverlayControl, OverlayPolicy, OverlayTracker,
    VerticalAlignment,
};
pub use provider::{
    CellContext, CellData, CellDataProvider, CellRenderer, DefaultCellRenderer, MapDataProvider,
};
pub use scheduler::Scheduler;
pub use tree::{ItemId, ItemNode, ItemTree};
pub use types::*;
pub use virtual_data::{Materializer, VirtualDataBridge};
