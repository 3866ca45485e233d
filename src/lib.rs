//! Photo Watermarker - stamps the EXIF capture date onto photos
//!
//! This library provides functionality for batch watermarking a directory
//! of photos with support for:
//! - EXIF `DateTimeOriginal` extraction
//! - Content-sniffed image decoding and extension-driven re-encoding
//! - Anti-aliased text rendering with an embedded bold sans-serif face
//! - Three placement modes (top-left, center, bottom-right)
//! - Per-file error isolation: one bad file never stops the batch

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod process;
pub mod time;
pub mod watermark;

#[cfg(test)]
mod test_helpers;

pub use cli::Cli;
pub use config::{Config, ConfigError, FileConfig, Position};
pub use error::{Error, Result};
pub use process::{FileResult, ProcessingStats, ProcessingStatus, Processor};
pub use time::CaptureTime;
pub use watermark::{Color, PlacementPosition, calculate_position};
