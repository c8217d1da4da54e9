//! Opaque cell decoration values.
//!
//! Colors, fonts and images are owned by the host toolkit; the grid only
//! stores and hands back these small value handles.

use serde::{Deserialize, Serialize};

/// RGB color value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Handle to a host-side font resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontId(pub u32);

/// Handle to a host-side image resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub u32);

/// Row-level default decorations.
///
/// Each field falls back to the grid-wide default when unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowDefaults {
    pub background: Option<Color>,
    pub foreground: Option<Color>,
    pub font: Option<FontId>,
}

impl RowDefaults {
    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.foreground.is_none() && self.font.is_none()
    }
}

/// Content of a row's header cell, shown when the row header is visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowHeader {
    pub text: Option<String>,
    pub image: Option<ImageId>,
    pub background: Option<Color>,
    pub foreground: Option<Color>,
    pub font: Option<FontId>,
}
