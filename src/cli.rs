//! CLI argument parsing with clap

use crate::config::{Config, FileConfig, MAX_FONT_SIZE, Position};
use clap::Parser;
use std::path::PathBuf;

/// Photo Watermarker - Adds a date watermark to photos based on EXIF data
///
/// Every photo in the input directory that carries an EXIF capture date is
/// stamped with that date (YYYY-MM-DD) and written to
/// `<input>/<input name>_watermark/` under its original file name.
#[derive(Parser, Debug)]
#[command(name = "watermarker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the directory containing images
    pub input_dir: PathBuf,

    /// Font size of the watermark [default: 36]
    #[arg(
        short = 's',
        long,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_FONT_SIZE))
    )]
    pub font_size: Option<u32>,

    /// Color of the watermark (e.g. 'WHITE', 'RED', or hex #RRGGBB) [default: WHITE]
    #[arg(short, long)]
    pub color: Option<String>,

    /// Position of the watermark [default: BOTTOM_RIGHT]
    #[arg(short, long, value_enum, ignore_case = true)]
    pub position: Option<Position>,

    /// Path to a TOML file with default font_size, color and position
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON (applies to --log-file)
    #[arg(long)]
    pub json_log: bool,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Merge CLI arguments with defaults from a config file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, file: FileConfig) -> Config {
        let mut config = Config::default().with_file_defaults(file);
        self.apply(&mut config);
        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        let mut config = Config::default();
        self.apply(&mut config);
        config
    }

    fn apply(&self, config: &mut Config) {
        config.input_dir = self.input_dir.clone();
        if let Some(font_size) = self.font_size {
            config.font_size = font_size;
        }
        if let Some(ref color) = self.color {
            config.color = color.clone();
        }
        if let Some(position) = self.position {
            config.position = position;
        }
    }
}
