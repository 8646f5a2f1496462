//! # Image Zip to PDF Library
//!
//! Batch conversion of zip archives of images into one PDF per archive.
//!
//! ## Module layout:
//! - `config`: run configuration and validation
//! - `error`: error taxonomy of the pipeline
//! - `file_manager`: archive discovery and image collection
//! - `scratch`: the shared scratch directory
//! - `archive_extractor`: copy + unzip into the scratch directory
//! - `pdf_assembler`: image sequence to PDF
//! - `converter`: orchestrator, path resolution, outcome tracking
//! - `progress`: progress bar and run statistics
//! - `json_output`: machine-readable events
//!
//! ## Usage:
//! ```ignore
//! use image_zip_pdf::{Config, ConversionPipeline};
//!
//! let config = Config {
//!     input_dir: "scans".into(),
//!     output_dir: "pdfs".into(),
//!     ..Default::default()
//! };
//! let report = ConversionPipeline::new(config)?.run()?;
//! ```

pub mod archive_extractor;
pub mod config;
pub mod converter;
pub mod error;
pub mod file_manager;
pub mod json_output;
pub mod pdf_assembler;
pub mod progress;
pub mod scratch;

pub use config::Config;
pub use converter::{
    ArchiveOutcome, ConversionPipeline, FailureRecord, ProcessedArchive, RunReport,
};
pub use error::ConvertError;
pub use file_manager::VERBOSE_TARGET;
