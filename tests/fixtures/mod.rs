//! Builders for grids, trees and overlay controls used across the
//! integration tests.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::rc::Rc;

use cellgrid::{
    Column, Disposable, Grid, GridConfig, ItemId, OverlayControl, OverlayTracker, Rect, Scheduler,
};

/// Fluent grid setup.
pub struct GridBuilder {
    config: GridConfig,
    columns: Vec<Column>,
    size: (i32, i32),
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GridBuilder {
    pub fn new() -> Self {
        Self {
            config: GridConfig::default(),
            columns: Vec::new(),
            size: (800, 600),
        }
    }

    #[must_use]
    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn row_height(mut self, height: i32) -> Self {
        self.config.default_row_height = height;
        self
    }

    #[must_use]
    pub fn virtual_mode(mut self) -> Self {
        self.config.virtual_mode = true;
        self
    }

    #[must_use]
    pub fn row_header(mut self, width: i32) -> Self {
        self.config.row_header_visible = true;
        self.config.row_header_width = width;
        self
    }

    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn columns(mut self, widths: &[i32]) -> Self {
        self.columns.extend(widths.iter().map(|w| Column::new(*w)));
        self
    }

    #[must_use]
    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn build(self) -> Grid {
        let mut grid = Grid::new(&self.config);
        for column in self.columns {
            grid.add_column(column).unwrap();
        }
        grid.resize(self.size.0, self.size.1).unwrap();
        grid.take_notifications();
        grid.acknowledge_scroll_bounds();
        grid
    }

    pub fn shared(self) -> Rc<RefCell<Grid>> {
        Rc::new(RefCell::new(self.build()))
    }
}

/// Append `count` root rows.
pub fn roots(grid: &mut Grid, count: usize) -> Vec<ItemId> {
    (0..count)
        .map(|_| grid.insert_item(None, None).unwrap())
        .collect()
}

/// Append `count` children under `parent`.
pub fn children(grid: &mut Grid, parent: ItemId, count: usize) -> Vec<ItemId> {
    (0..count)
        .map(|_| grid.insert_item(Some(parent), None).unwrap())
        .collect()
}

/// Control double that records what the tracker does to it.
#[derive(Debug, Default)]
pub struct RecordingControl {
    pub bounds: Rect,
    pub visible: bool,
    pub focused: bool,
    pub disposed: bool,
    /// Every `set_bounds` call, in order
    pub moves: Vec<Rect>,
    /// `set_bounds` drops focus, like a native resize can
    pub steals_focus: bool,
    pub focus_requests: usize,
}

impl RecordingControl {
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    pub fn shared() -> Rc<RefCell<RecordingControl>> {
        Rc::new(RefCell::new(Self::new()))
    }
}

impl Disposable for RecordingControl {
    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl OverlayControl for RecordingControl {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.moves.push(bounds);
        if self.steals_focus {
            self.focused = false;
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn set_focus(&mut self) {
        self.focused = true;
        self.focus_requests += 1;
    }
}

/// A tracker on `grid` with its own scheduler.
pub fn tracker(grid: &Rc<RefCell<Grid>>) -> (OverlayTracker, Rc<Scheduler>) {
    let scheduler = Rc::new(Scheduler::new());
    let tracker = OverlayTracker::new(grid, Rc::clone(&scheduler)).unwrap();
    (tracker, scheduler)
}
