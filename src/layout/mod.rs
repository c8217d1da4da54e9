//! Layout engine for computing cell geometry.
//!
//! This module handles:
//! - Column widths, visual order, visibility and groups
//! - Span resolution (logical cell -> pixel size)
//! - Viewport state (client area, scroll position, displayed row range)

mod columns;
mod span;
mod viewport;

pub use columns::{Column, ColumnGroup, ColumnSet, GroupId, DEFAULT_COL_WIDTH};
pub use span::{RowExtent, SpanResolver};
pub use viewport::{DisplayedRange, Viewport, DEFAULT_CLIENT_HEIGHT, DEFAULT_CLIENT_WIDTH};
