//! Value types shared across the grid model.

mod capability;
mod geometry;
mod selection;
mod style;

pub use capability::*;
pub use geometry::*;
pub use selection::*;
pub use style::*;
