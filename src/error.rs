//! # Error Types Module
//!
//! Defines every error the conversion pipeline can raise.
//!
//! ## Categories:
//! - `Config`: bad input directory, output directory that cannot be created,
//!   invalid configuration values. The only fatal class: it stops the run
//!   before any archive is touched.
//! - `Extraction`: archive copy or unzip failure.
//! - `Assembly`: empty image set, undecodable image, PDF write failure.
//! - `Verification`: the PDF is missing after an assembly that reported success.
//! - `ScratchCleanup`: the scratch area could not be removed.
//!
//! Everything except `Config` is contained at the per-archive boundary and
//! ends up as a `FailureRecord`.
//!
//! ## Example:
//! ```ignore
//! if images.is_empty() {
//!     return Err(ConvertError::Assembly("no images to assemble".to_string()));
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for archive conversion
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Extraction failed for {path}: {reason}")]
    Extraction { path: PathBuf, reason: String },

    #[error("PDF assembly error: {0}")]
    Assembly(String),

    #[error("PDF not found after assembly: {0}")]
    Verification(PathBuf),

    #[error("Scratch area cleanup error: {0}")]
    ScratchCleanup(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF writer error: {0}")]
    Pdf(#[from] lopdf::Error),
}

impl ConvertError {
    /// Whether the error must stop the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConvertError::Config(_))
    }
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
