//! Integer pixel geometry shared by layout and overlay code.

use serde::{Deserialize, Serialize};

/// A point in grid client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Rectangle in grid client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X position (left edge)
    pub x: i32,
    /// Y position (top edge)
    pub y: i32,
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
}

impl Rect {
    /// Degenerate rectangle used when there is nothing to track.
    pub const EMPTY: Rect = Rect::new(0, 0, 0, 0);

    /// Parking position for cells that must not be seen: hidden rows,
    /// rows scrolled out of view, or cells under the row header.
    pub const OFF_SCREEN: Rect = Rect::new(-1000, -1000, 0, 0);

    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// X coordinate one past the right edge.
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Y coordinate one past the bottom edge.
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}
