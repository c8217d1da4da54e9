use crate::types::{Disposable, Rect};

/// The externally owned control an [`super::OverlayTracker`] keeps glued to
/// its cell.
pub trait OverlayControl: Disposable {
    fn bounds(&self) -> Rect;
    fn set_bounds(&mut self, bounds: Rect);

    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    fn has_focus(&self) -> bool;
    fn set_focus(&mut self);
}
