//! # Path Resolution Module
//!
//! Validates the input/output directories of a run and derives the PDF
//! path of every archive.

use crate::error::{ConvertError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Centralized path computations for the conversion run
pub struct PathResolver;

impl PathResolver {
    /// Resolve the input directory to an absolute, existing directory.
    ///
    /// A missing input directory is a fatal configuration error.
    pub fn resolve_input_dir(path: &Path) -> Result<PathBuf> {
        if path.exists() {
            info!("Input directory path exists: {}", path.display());
        } else {
            info!("Input directory path does not exist: {}", path.display());
        }

        let absolute = Self::absolute(path)?;
        if !absolute.exists() {
            return Err(ConvertError::Config(format!(
                "Bad input directory: {}",
                path.display()
            )));
        }
        if !absolute.is_dir() {
            return Err(ConvertError::Config(format!(
                "Input path is not a directory: {}",
                absolute.display()
            )));
        }

        debug!("Resolved input directory: {}", absolute.display());
        Ok(absolute)
    }

    /// Resolve the output directory, creating it (with parents) if missing
    pub fn resolve_output_dir(path: &Path) -> Result<PathBuf> {
        let absolute = Self::absolute(path)?;

        if absolute.exists() {
            info!("Output directory exists: {}", absolute.display());
        } else {
            info!("Output directory does not exist: {}", path.display());
            info!("Attempting to create directory: {}", absolute.display());
            std::fs::create_dir_all(&absolute).map_err(|e| {
                ConvertError::Config(format!(
                    "Failed to create output directory {}: {}",
                    absolute.display(),
                    e
                ))
            })?;
        }

        if !absolute.is_dir() {
            return Err(ConvertError::Config(format!(
                "Output path is not a directory: {}",
                absolute.display()
            )));
        }

        Ok(absolute)
    }

    /// `<output_dir>/<archive stem>.pdf`
    pub fn output_target(archive: &Path, output_dir: &Path) -> PathBuf {
        let stem = archive.file_stem().unwrap_or_default().to_string_lossy();
        output_dir.join(format!("{}.pdf", stem))
    }

    /// Check whether the PDF of an archive is already in the output directory
    pub fn output_exists(archive: &Path, output_dir: &Path) -> bool {
        let target = Self::output_target(archive, output_dir);
        let exists = target.exists();

        if exists {
            info!("PDF exists for zipfile, {} , @ {}", archive.display(), target.display());
        } else {
            info!("PDF does not exist for zipfile, {} , @ {}", archive.display(), target.display());
        }

        exists
    }

    fn absolute(path: &Path) -> Result<PathBuf> {
        std::path::absolute(path).map_err(|e| {
            ConvertError::Config(format!("Cannot resolve path {}: {}", path.display(), e))
        })
    }
}
