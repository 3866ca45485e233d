//! Text rasterization onto decoded images.
//!
//! The face is an embedded bold sans-serif (DejaVu Sans Bold), so rendering
//! never depends on fonts installed on the host. A [`TextRenderer`] is the
//! per-file drawing context: it owns the scale and color for one image and
//! is dropped with it.

use super::color::Color;
use super::position::{PlacementPosition, TextMetrics};
use crate::error::{Error, Result};
use ab_glyph::{Font, FontRef, GlyphId, InvalidFont, PxScale, PxScaleFont, Rect, ScaleFont, point};
use image::{DynamicImage, GenericImage, GenericImageView, Pixel};
use std::sync::OnceLock;

/// Embedded font data (DejaVu Sans Bold, Bitstream Vera license).
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

static FONT: OnceLock<std::result::Result<FontRef<'static>, InvalidFont>> = OnceLock::new();

/// The embedded watermark face, parsed on first use.
fn font() -> Result<&'static FontRef<'static>> {
    FONT.get_or_init(|| FontRef::try_from_slice(EMBEDDED_FONT_DATA))
        .as_ref()
        .map_err(|e| Error::Font(e.to_string()))
}

/// Drawing context for one image
pub struct TextRenderer {
    font: PxScaleFont<&'static FontRef<'static>>,
    color: Color,
}

impl TextRenderer {
    /// Create a renderer for `font_size` pixels per em.
    pub fn new(font_size: u32, color: Color) -> Result<Self> {
        let font = font()?;
        let units_per_em = font
            .units_per_em()
            .ok_or_else(|| Error::Font("font has no units-per-em".to_string()))?;

        // PxScale is the ascent-to-descent height, not the em size
        let scale = PxScale::from(font_size as f32 * font.height_unscaled() / units_per_em);

        Ok(Self {
            font: font.as_scaled(scale),
            color,
        })
    }

    /// Advance width and ascent of `text`, rounded to whole pixels.
    pub fn measure(&self, text: &str) -> TextMetrics {
        let mut width = 0.0f32;
        let mut prev_glyph: Option<GlyphId> = None;

        for c in text.chars() {
            let glyph_id = self.font.glyph_id(c);
            if let Some(prev) = prev_glyph {
                width += self.font.kern(prev, glyph_id);
            }
            width += self.font.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }

        TextMetrics {
            width: width.round() as i32,
            ascent: self.font.ascent().round() as i32,
        }
    }

    /// Draw `text` with its baseline starting at `origin`.
    ///
    /// Glyph coverage is alpha-blended over the existing pixels in place.
    /// Glyphs that miss the image entirely are never rasterized; pixels
    /// outside the image are skipped.
    pub fn draw(&self, image: &mut DynamicImage, text: &str, origin: PlacementPosition) {
        let (width, height) = image.dimensions();
        let mut cursor_x = origin.x as f32;
        let baseline_y = origin.y as f32;
        let mut prev_glyph: Option<GlyphId> = None;

        for c in text.chars() {
            let glyph_id = self.font.glyph_id(c);
            if let Some(prev) = prev_glyph {
                cursor_x += self.font.kern(prev, glyph_id);
            }

            let mut glyph = self.font.scaled_glyph(c);
            glyph.position = point(cursor_x, baseline_y);

            let outlined = self
                .font
                .outline_glyph(glyph)
                .filter(|outlined| overlaps(outlined.px_bounds(), width, height));
            if let Some(outlined) = outlined {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let x = gx as i64 + bounds.min.x as i64;
                    let y = gy as i64 + bounds.min.y as i64;
                    if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
                        return;
                    }

                    let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                    if alpha == 0 {
                        return;
                    }

                    let (x, y) = (x as u32, y as u32);
                    let mut pixel = image.get_pixel(x, y);
                    pixel.blend(&self.color.with_alpha(alpha));
                    image.put_pixel(x, y, pixel);
                });
            }

            cursor_x += self.font.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }
    }
}

/// Whether a glyph's pixel box intersects a `width` x `height` image
fn overlaps(bounds: Rect, width: u32, height: u32) -> bool {
    bounds.max.x > 0.0
        && bounds.max.y > 0.0
        && bounds.min.x < width as f32
        && bounds.min.y < height as f32
}
