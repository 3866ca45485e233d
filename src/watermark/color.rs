//! Watermark color resolution

use crate::error::{Error, Result};
use image::Rgba;
use std::str::FromStr;

/// Opaque RGB text color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Fixed palette, matched case-insensitively
const NAMED_COLORS: &[(&str, Color)] = &[
    ("WHITE", Color::new(255, 255, 255)),
    ("LIGHT_GRAY", Color::new(192, 192, 192)),
    ("LIGHTGRAY", Color::new(192, 192, 192)),
    ("GRAY", Color::new(128, 128, 128)),
    ("DARK_GRAY", Color::new(64, 64, 64)),
    ("DARKGRAY", Color::new(64, 64, 64)),
    ("BLACK", Color::new(0, 0, 0)),
    ("RED", Color::new(255, 0, 0)),
    ("PINK", Color::new(255, 175, 175)),
    ("ORANGE", Color::new(255, 200, 0)),
    ("YELLOW", Color::new(255, 255, 0)),
    ("GREEN", Color::new(0, 255, 0)),
    ("MAGENTA", Color::new(255, 0, 255)),
    ("CYAN", Color::new(0, 255, 255)),
    ("BLUE", Color::new(0, 0, 255)),
];

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Resolve a color name or hex triplet.
    ///
    /// Names from the palette win; otherwise the value must be six hex
    /// digits, optionally prefixed with `#`, `0x` or `0X`.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        Self::from_name(trimmed)
            .or_else(|| Self::from_hex(trimmed))
            .ok_or_else(|| Error::InvalidColor {
                value: value.to_string(),
            })
    }

    fn from_name(name: &str) -> Option<Self> {
        NAMED_COLORS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, color)| *color)
    }

    fn from_hex(value: &str) -> Option<Self> {
        let digits = value
            .strip_prefix('#')
            .or_else(|| value.strip_prefix("0x"))
            .or_else(|| value.strip_prefix("0X"))
            .unwrap_or(value);

        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let rgb = u32::from_str_radix(digits, 16).ok()?;
        Some(Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
    }

    /// This color with the given alpha
    pub fn with_alpha(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::parse(s)
    }
}
