//! Span geometry: turns a cell's logical coordinates into a pixel size.
//!
//! Column spans run over the *visual* column order, so reordering columns
//! moves which neighbours a span covers. Row spans run over absolute row
//! order: a hidden row still consumes one step of the span but adds no
//! height. Each spanned row adds one pixel for the grid line between rows.

use crate::types::{Point, Rect, Size};

/// Height and visibility of a row, as consumed by row spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowExtent {
    pub height: i32,
    pub visible: bool,
}

impl RowExtent {
    pub const fn new(height: i32, visible: bool) -> Self {
        Self { height, visible }
    }
}

/// Stateless span resolution.
pub struct SpanResolver;

impl SpanResolver {
    /// Visual position of `column` within `order`; falls back to the column
    /// index itself when the order does not mention it.
    pub fn visual_position(order: &[usize], column: usize) -> usize {
        order.iter().position(|c| *c == column).unwrap_or(column)
    }

    /// Width of `1 + col_span` consecutive visual columns starting at
    /// `column`, clipped at the last column. Non-positive spans cover only
    /// the cell's own column.
    pub fn span_width(
        order: &[usize],
        column: usize,
        col_span: i32,
        width_of: impl Fn(usize) -> i32,
    ) -> i32 {
        let start = Self::visual_position(order, column);
        let extra = usize::try_from(col_span).unwrap_or(0);
        order
            .iter()
            .skip(start)
            .take(extra.saturating_add(1))
            .map(|c| width_of(*c))
            .sum()
    }

    /// Height of a row plus `row_span` following rows (each adding its
    /// height and a one-pixel line when visible). Stops early when the
    /// following rows run out.
    pub fn span_height(
        own_height: i32,
        row_span: i32,
        following: impl IntoIterator<Item = RowExtent>,
    ) -> i32 {
        let extra = usize::try_from(row_span).unwrap_or(0);
        own_height
            + following
                .into_iter()
                .take(extra)
                .filter(|row| row.visible)
                .map(|row| row.height + 1)
                .sum::<i32>()
    }

    /// Full cell size from both span directions.
    pub fn compute_cell_size(
        order: &[usize],
        column: usize,
        col_span: i32,
        width_of: impl Fn(usize) -> i32,
        own_height: i32,
        row_span: i32,
        following: impl IntoIterator<Item = RowExtent>,
    ) -> Size {
        Size::new(
            Self::span_width(order, column, col_span, width_of),
            Self::span_height(own_height, row_span, following),
        )
    }

    /// Combine a layout origin with a computed size.
    pub fn compute_cell_bounds(origin: Point, size: Size) -> Rect {
        Rect::from_parts(origin, size)
    }
}
