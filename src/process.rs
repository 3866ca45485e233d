//! Batch processor
//!
//! Handles the core logic of:
//! - Validating the input directory and creating the output directory
//! - Listing the files directly inside the input directory
//! - Extracting capture dates, stamping them and writing the results
//!
//! Files are handled one at a time. Whatever happens to one file is
//! recorded in its [`FileResult`] and never stops the batch.

use crate::codec::{decode_image, encode_image, output_format};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::time::extract_capture_time;
use crate::watermark::{Color, apply_watermark};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info, span, warn};

/// Suffix appended to the input directory name to form the output directory
pub const OUTPUT_DIR_SUFFIX: &str = "_watermark";

/// Result of processing a single file
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Source file path
    pub source: PathBuf,
    /// Written file path (if successful)
    pub destination: Option<PathBuf>,
    /// Text stamped onto the image (if successful)
    pub watermark: Option<String>,
    /// Processing status
    pub status: ProcessingStatus,
    /// Error message (if failed)
    pub error: Option<String>,
}

/// Status of file processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStatus {
    /// Watermarked copy written to the output directory
    Watermarked,
    /// Skipped: no capture date in the metadata
    NoDateInfo,
    /// Skipped: content is not a decodable image
    NotAnImage,
    /// Processing failed
    Failed,
}

impl FileResult {
    /// File name as shown in console messages
    pub fn file_name(&self) -> String {
        display_name(&self.source)
    }

    /// Whether the console line belongs on stderr
    pub fn is_error(&self) -> bool {
        self.status == ProcessingStatus::Failed
    }

    /// The one console line reported for this file
    pub fn console_line(&self) -> String {
        let name = self.file_name();
        match self.status {
            ProcessingStatus::Watermarked => format!("Watermarked: {}", name),
            ProcessingStatus::NoDateInfo => format!("Skipping (no date info): {}", name),
            ProcessingStatus::NotAnImage => format!("Skipping (not a supported image): {}", name),
            ProcessingStatus::Failed => format!(
                "Error processing file {}: {}",
                name,
                self.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    fn from_error(source: PathBuf, error: Error) -> Self {
        let status = match error {
            Error::NoDateInfo { .. } => ProcessingStatus::NoDateInfo,
            Error::UnsupportedFormat { .. } | Error::Decode { .. } => ProcessingStatus::NotAnImage,
            _ => ProcessingStatus::Failed,
        };
        let error = (status == ProcessingStatus::Failed).then(|| error.to_string());

        Self {
            source,
            destination: None,
            watermark: None,
            status,
            error,
        }
    }
}

/// Processing statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total_files: usize,
    pub watermarked: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, status: ProcessingStatus) {
        match status {
            ProcessingStatus::Watermarked => self.watermarked += 1,
            ProcessingStatus::NoDateInfo | ProcessingStatus::NotAnImage => self.skipped += 1,
            ProcessingStatus::Failed => self.failed += 1,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Watermarked: {}, Skipped: {}, Failed: {}",
            self.total_files, self.watermarked, self.skipped, self.failed
        )
    }
}

/// Main processor for watermarking a directory of photos
pub struct Processor {
    config: Config,
    input_dir: PathBuf,
    output_dir: PathBuf,
    stats: ProcessingStats,
}

impl Processor {
    /// Create a processor for the configured input directory
    ///
    /// Fails with [`Error::InvalidInput`] unless the input path is an
    /// existing directory. Nothing is created on disk yet.
    pub fn new(config: Config) -> Result<Self> {
        let invalid = || Error::InvalidInput {
            path: config.input_dir.clone(),
        };

        if !config.input_dir.is_dir() {
            return Err(invalid());
        }
        let input_dir = fs::canonicalize(&config.input_dir).map_err(|_| invalid())?;
        let output_dir = output_dir_for(&input_dir);

        if let Err(e) = Color::parse(&config.color) {
            warn!(error = %e, "Watermark color does not resolve, every image will fail");
        }

        Ok(Self {
            config,
            input_dir,
            output_dir,
            stats: ProcessingStats::new(),
        })
    }

    /// Absolute path of the input directory
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Absolute path of the output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Statistics of the last run
    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    /// Create the output directory (and any missing parents)
    pub fn prepare_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::OutputDir {
            path: self.output_dir.clone(),
            source: e,
        })
    }

    /// Regular files directly inside the input directory, sorted by name
    ///
    /// Subdirectories are skipped; symlinks are followed.
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let listing_error = |e: std::io::Error| Error::Listing {
            path: self.input_dir.clone(),
            source: e,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.input_dir).map_err(listing_error)? {
            let path = entry.map_err(listing_error)?.path();
            if path.is_file() {
                files.push(path);
            } else {
                debug!(?path, "Skipping non-file entry");
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Create the output directory and run the processing pipeline
    pub fn run(&mut self) -> Result<Vec<FileResult>> {
        self.prepare_output_dir()?;
        self.run_with(|_| {})
    }

    /// Run the processing pipeline, handing each result to `on_result` as
    /// soon as its file is done
    ///
    /// The output directory must already exist, see
    /// [`Processor::prepare_output_dir`]. Only listing failures are returned
    /// as errors.
    pub fn run_with<F>(&mut self, mut on_result: F) -> Result<Vec<FileResult>>
    where
        F: FnMut(&FileResult),
    {
        let _span = span!(Level::INFO, "processor_run", input = %self.input_dir.display()).entered();

        let files = self.collect_files()?;
        info!(count = files.len(), "Found files");

        self.stats = ProcessingStats::new();
        self.stats.total_files = files.len();

        let mut results = Vec::with_capacity(files.len());
        for path in files {
            let _file_span = span!(Level::DEBUG, "process_file", file = %display_name(&path)).entered();

            let result = self.process_file(&path);
            match result.status {
                ProcessingStatus::Watermarked => debug!(destination = ?result.destination, "Watermarked"),
                ProcessingStatus::Failed => debug!(error = ?result.error, "Failed"),
                _ => debug!(status = ?result.status, "Skipped"),
            }

            self.stats.record(result.status);
            on_result(&result);
            results.push(result);
        }

        info!(summary = %self.stats.summary(), "Processing complete");
        Ok(results)
    }

    /// Process one file, converting every failure into a [`FileResult`]
    pub fn process_file(&self, path: &Path) -> FileResult {
        match self.watermark_file(path) {
            Ok((destination, watermark)) => FileResult {
                source: path.to_path_buf(),
                destination: Some(destination),
                watermark: Some(watermark),
                status: ProcessingStatus::Watermarked,
                error: None,
            },
            Err(e) => FileResult::from_error(path.to_path_buf(), e),
        }
    }

    /// Read, stamp and write a single file
    fn watermark_file(&self, path: &Path) -> Result<(PathBuf, String)> {
        let capture = extract_capture_time(path)?;
        let text = capture.watermark_text();

        let mut image = decode_image(path)?;
        apply_watermark(&mut image, &text, &self.config)?;

        let format = output_format(path)?;
        let file_name = path.file_name().ok_or_else(|| Error::UnknownFormat {
            path: path.to_path_buf(),
        })?;
        let destination = self.output_dir.join(file_name);
        encode_image(&image, &destination, format)?;

        Ok((destination, text))
    }
}

/// Output directory for an input directory: `<input>/<input name>_watermark`
pub fn output_dir_for(input_dir: &Path) -> PathBuf {
    let name = input_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input_dir.join(format!("{}{}", name, OUTPUT_DIR_SUFFIX))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
