//! Photo Watermarker - stamps the EXIF capture date onto photos
//!
//! Watermarks every photo in a directory with the date it was taken,
//! writing the results to `<input>/<input name>_watermark/`.

use anyhow::Result;
use clap::Parser;
use photo_watermarker::{Cli, Config, FileConfig, FileResult, Processor};
use std::path::Path;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Parse arguments, set up logging and run the batch
///
/// Fatal processing errors are reported here and turned into exit code 1;
/// the logging guard is dropped on return so the log file gets flushed.
fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let _guard = setup_logging(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Photo Watermarker starting"
    );

    // Load configuration
    let config = load_config(&cli)?;
    config.validate()?;
    info!(?config, "Configuration loaded");

    let mut processor = match Processor::new(config) {
        Ok(processor) => processor,
        Err(e) => return Ok(fatal(e)),
    };
    if let Err(e) = processor.prepare_output_dir() {
        return Ok(fatal(e));
    }

    println!("Processing files in: {}", processor.input_dir().display());
    println!(
        "Saving watermarked files to: {}",
        processor.output_dir().display()
    );

    if let Err(e) = processor.run_with(report) {
        return Ok(fatal(e));
    }

    println!("Processing complete.");
    info!(summary = %processor.stats().summary(), "Run finished");
    Ok(ExitCode::SUCCESS)
}

/// Print the console line for one file
fn report(result: &FileResult) {
    if result.is_error() {
        eprintln!("{}", result.console_line());
    } else {
        println!("{}", result.console_line());
    }
}

/// Report a run-ending error
fn fatal(e: photo_watermarker::Error) -> ExitCode {
    error!(error = %e, "Processing failed");
    eprintln!("Error: {}", e);
    ExitCode::FAILURE
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        info!(config_file = %config_path.display(), "Loading configuration from file");
        let file_config = FileConfig::load_from_file(config_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };

    Ok(config)
}

/// Setup logging: console on stderr, plus an optional log file
fn setup_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let (file_layer, guard) = match cli.log_file {
        Some(ref log_path) => {
            let file = open_log_file(log_path)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);

            let layer = if cli.json_log {
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking)
                    .boxed()
            } else {
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking)
                    .boxed()
            };

            let file_level = if cli.verbose {
                LevelFilter::DEBUG
            } else {
                LevelFilter::INFO
            };
            (Some(layer.with_filter(file_level)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter),
        )
        .init();

    Ok(guard)
}

fn open_log_file(log_path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    Ok(file)
}
