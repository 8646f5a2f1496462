//! # zip2pdf - Main Entry Point
//!
//! Converts every image zip archive of a directory into a PDF.
//!
//! ## Responsibilities:
//! - Parse command line arguments with `clap`
//! - Initialize `tracing` logging (INFO, DEBUG with `--debug`, verbose
//!   listings with `--verbose`)
//! - Build the `Config` (optionally from a JSON file) and run the pipeline
//! - Exit non-zero when the configuration is invalid or an archive failed
//!
//! ## Execution flow:
//! 1. Parse CLI arguments
//! 2. Configure logging
//! 3. Build and validate the configuration
//! 4. Run `ConversionPipeline` and print the summary
//!
//! ## Usage:
//! ```bash
//! zip2pdf ./scans ./pdfs --verbose
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use image_zip_pdf::{json_output::JsonMessage, Config, ConversionPipeline, VERBOSE_TARGET};

#[derive(Parser)]
#[command(name = "zip2pdf")]
#[command(about = "Application for converting zip archives that contain image files into PDF files.")]
struct Args {
    /// Input directory that contains image zip archive files
    input_dir: PathBuf,

    /// Output directory to store generated PDF files
    output_dir: PathBuf,

    /// Show debug logging
    #[arg(short, long)]
    debug: bool,

    /// Show verbose info logging
    #[arg(short, long)]
    verbose: bool,

    /// Output progress and status as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Do not draw the progress bar
    #[arg(long)]
    no_progress: bool,

    /// JSON configuration file used as base settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Filter directives for the given flags
fn log_filter(debug: bool, verbose: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    if verbose {
        level.to_string()
    } else {
        format!("{},{}=off", level, VERBOSE_TARGET)
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_filter(args.debug, args.verbose)))?;

    if args.json {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<Config> {
    let base = match args.config {
        Some(ref path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let config = Config {
        input_dir: args.input_dir.clone(),
        output_dir: args.output_dir.clone(),
        json_output: args.json || base.json_output,
        show_progress: !args.no_progress && base.show_progress,
        ..base
    };
    config.validate()?;

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    info!(
        "Required Arguments: input dir={}, output dir={}",
        args.input_dir.display(),
        args.output_dir.display()
    );
    info!(
        "Optional Arguments: debug logging={}, verbose logging={}",
        args.debug, args.verbose
    );

    let config = build_config(&args)?;
    let json_output = config.json_output;

    let pipeline = match ConversionPipeline::new(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Bad input or output directory. Stopping app.");
            if json_output {
                JsonMessage::error(e.to_string(), None).emit();
            }
            return Err(e.into());
        }
    };

    let report = pipeline.run()?;
    info!("{}", report.stats.format_summary());

    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_hides_verbose_target_by_default() {
        assert_eq!(log_filter(false, false), "info,image_zip_pdf::verbose=off");
        assert_eq!(log_filter(true, false), "debug,image_zip_pdf::verbose=off");
    }

    #[test]
    fn test_log_filter_verbose() {
        assert_eq!(log_filter(false, true), "info");
        assert_eq!(log_filter(true, true), "debug");
    }

    #[test]
    fn test_cli_parsing() {
        let args = Args::try_parse_from(["zip2pdf", "in", "out", "-d", "-v", "--json"]).unwrap();
        assert_eq!(args.input_dir, PathBuf::from("in"));
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert!(args.debug);
        assert!(args.verbose);
        assert!(args.json);
        assert!(!args.no_progress);
    }

    #[test]
    fn test_cli_requires_both_directories() {
        assert!(Args::try_parse_from(["zip2pdf", "in"]).is_err());
    }

    #[test]
    fn test_build_config_from_flags() {
        let args = Args::try_parse_from(["zip2pdf", "in", "out", "--no-progress"]).unwrap();
        let config = build_config(&args).unwrap();

        assert_eq!(config.input_dir, PathBuf::from("in"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(!config.show_progress);
        assert!(!config.json_output);
        assert_eq!(config.resolution, 100.0);
    }
}
