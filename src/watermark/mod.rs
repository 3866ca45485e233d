//! Watermark compositing
//!
//! Resolves the configured color, measures the text with the embedded face,
//! places it according to the configured [`Position`] and draws it onto the
//! decoded image in place.

pub mod color;
pub mod position;
pub mod text;

use crate::config::{Config, Position};
use crate::error::Result;
use image::{DynamicImage, GenericImageView};
use tracing::trace;

pub use color::Color;
pub use position::{ImageDimensions, PlacementPosition, TextMetrics, calculate_position};
pub use text::TextRenderer;

/// Stamp `text` onto `image` using the job's size, color and position.
///
/// The color string is resolved here, once per image, so an invalid value
/// fails the current file only. Returns the baseline origin used.
pub fn apply_watermark(
    image: &mut DynamicImage,
    text: &str,
    config: &Config,
) -> Result<PlacementPosition> {
    let color = Color::parse(&config.color)?;
    stamp(image, text, config.font_size, color, config.position)
}

/// Draw `text` with explicit styling.
pub fn stamp(
    image: &mut DynamicImage,
    text: &str,
    font_size: u32,
    color: Color,
    position: Position,
) -> Result<PlacementPosition> {
    let renderer = TextRenderer::new(font_size, color)?;
    let metrics = renderer.measure(text);

    let (width, height) = image.dimensions();
    let origin = calculate_position(position, ImageDimensions { width, height }, metrics);
    trace!(text, ?metrics, ?origin, %position, "Placing watermark");

    renderer.draw(image, text, origin);
    Ok(origin)
}
