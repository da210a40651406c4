//! Text overlay primitives

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Fixed top-left anchor for frame-wide banners.
pub const BANNER_ANCHOR: Position = Position { x: 5, y: 5 };

/// Banner drawn when a frame has no detections.
pub const NO_OBJECTS_BANNER: &str = "NO OBJECTS FOUND";

/// Horizontal offset of label text from the detection's left edge.
pub const LABEL_INDENT: i32 = 5;

/// Vertical distance between the two hop lines of one detection.
pub const LINE_SPACING: i32 = 27;

/// Smallest and largest pixel line height a renderer accepts
pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const GRAY40: Color = Color::rgba(40, 40, 40, 180);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    pub color: Color,
    pub background: Color,
}

impl TextStyle {
    /// White on translucent gray, for frame-wide banners.
    pub const BANNER: TextStyle = TextStyle { color: Color::WHITE, background: Color::GRAY40 };
    /// White on black, for per-detection labels.
    pub const LABEL: TextStyle = TextStyle { color: Color::WHITE, background: Color::BLACK };
}

/// Pixel position of the top-left corner of a text line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn below(self, dy: i32) -> Self {
        Self { x: self.x, y: self.y + dy }
    }
}

/// Draws text onto frames.
pub trait TextRenderer {
    type Frame;

    fn overlay_text(&mut self, frame: &mut Self::Frame, text: &str, at: Position, style: TextStyle) -> Result<()>;
}

/// Transliterate to plain ASCII for fonts without Unicode coverage.
pub fn normalize_text(text: &str) -> String {
    deunicode::deunicode(text)
}
