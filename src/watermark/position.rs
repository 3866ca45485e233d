//! Position calculation for watermark placement.
//!
//! All coordinates use a top-left origin with `y` naming the text baseline.
//! Nothing is clamped: text larger than the image yields negative or
//! out-of-bounds coordinates, and the renderer clips whatever falls outside.
//!
//! | Mode         | x                          | y                           |
//! |--------------|----------------------------|-----------------------------|
//! | TOP_LEFT     | 20                         | ascent + 20                 |
//! | CENTER       | (width - text width) / 2   | (height + ascent) / 2       |
//! | BOTTOM_RIGHT | width - text width - 20    | height - 20                 |

use crate::config::Position;

/// Distance from the image edges in pixels
pub const MARGIN: i32 = 20;

/// Dimensions of the target image.
#[derive(Debug, Clone, Copy)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Measured size of the watermark text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    /// Advance width of the whole string
    pub width: i32,
    /// Font ascent above the baseline
    pub ascent: i32,
}

/// Baseline origin of the watermark text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Calculate where the text baseline starts.
///
/// Division truncates toward zero.
pub fn calculate_position(
    position: Position,
    image: ImageDimensions,
    text: TextMetrics,
) -> PlacementPosition {
    let img_w = image.width as i32;
    let img_h = image.height as i32;

    match position {
        Position::TopLeft => PlacementPosition::new(MARGIN, text.ascent + MARGIN),
        Position::Center => {
            PlacementPosition::new((img_w - text.width) / 2, (img_h + text.ascent) / 2)
        }
        Position::BottomRight => {
            PlacementPosition::new(img_w - text.width - MARGIN, img_h - MARGIN)
        }
    }
}
