//! Configuration types for the photo watermarker

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default watermark font size in pixels per em
pub const DEFAULT_FONT_SIZE: u32 = 36;

/// Largest accepted font size; each glyph is rasterized into a buffer of
/// roughly this many pixels squared
pub const MAX_FONT_SIZE: u32 = 2000;

/// Default watermark color
pub const DEFAULT_COLOR: &str = "WHITE";

/// Placement of the watermark text on the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(from = "String")]
pub enum Position {
    /// 20px in from the top-left corner
    #[value(name = "TOP_LEFT", alias = "top-left")]
    TopLeft,
    /// Centered on both axes
    #[value(name = "CENTER", alias = "centre")]
    Center,
    /// 20px in from the bottom-right corner
    #[default]
    #[value(name = "BOTTOM_RIGHT", alias = "bottom-right")]
    BottomRight,
}

impl Position {
    /// Resolve a position name leniently.
    ///
    /// Matching ignores case and treats `-` like `_`. Anything that is not a
    /// known name resolves to [`Position::BottomRight`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_uppercase().replace('-', "_").as_str() {
            "TOP_LEFT" => Position::TopLeft,
            "CENTER" | "CENTRE" => Position::Center,
            _ => Position::BottomRight,
        }
    }

    /// Canonical name as accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::TopLeft => "TOP_LEFT",
            Position::Center => "CENTER",
            Position::BottomRight => "BOTTOM_RIGHT",
        }
    }
}

impl From<String> for Position {
    fn from(name: String) -> Self {
        Position::from_name(&name)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job configuration, fixed for the duration of a run
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory whose files get watermarked
    pub input_dir: PathBuf,

    /// Font size in pixels per em
    pub font_size: u32,

    /// Color name or hex triplet, resolved per file
    pub color: String,

    /// Where the text is placed
    pub position: Position,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            font_size: DEFAULT_FONT_SIZE,
            color: DEFAULT_COLOR.to_string(),
            position: Position::default(),
        }
    }
}

impl Config {
    /// Apply the values present in a defaults file
    pub fn with_file_defaults(mut self, file: FileConfig) -> Self {
        if let Some(font_size) = file.font_size {
            self.font_size = font_size;
        }
        if let Some(color) = file.color {
            self.color = color;
        }
        if let Some(position) = file.position {
            self.position = position;
        }
        self
    }

    /// Reject values that cannot produce a watermark
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.font_size == 0 {
            return Err(ConfigError::Invalid(
                "font size must be a positive integer".to_string(),
            ));
        }
        if self.font_size > MAX_FONT_SIZE {
            return Err(ConfigError::Invalid(format!(
                "font size must not exceed {}",
                MAX_FONT_SIZE
            )));
        }
        Ok(())
    }
}

/// Optional defaults read from a TOML file
///
/// Every key is optional; command-line values take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub font_size: Option<u32>,
    pub color: Option<String>,
    pub position: Option<Position>,
}

impl FileConfig {
    /// Load defaults from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// A value is out of range
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            ConfigError::Invalid(message) => write!(f, "Invalid configuration: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::Invalid(_) => None,
        }
    }
}
