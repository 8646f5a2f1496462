//! # Archive Extraction Module
//!
//! Stages one archive into the scratch area: the archive is copied byte for
//! byte under its original name, then the copy is unpacked in place.
//! Only the zip container is supported, without encryption.

use crate::error::{ConvertError, Result};
use crate::scratch::ScratchArea;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::ZipArchive;

/// Copies and unpacks archives into the scratch area
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Copy `archive` into the scratch area and extract it there.
    ///
    /// Returns the path of the staged copy. A scratch area that was not freshly
    /// reset, or any copy or unzip failure, is reported as
    /// [`ConvertError::Extraction`].
    pub fn extract(archive: &Path, scratch: &mut ScratchArea) -> Result<PathBuf> {
        scratch
            .ensure_ready()
            .map_err(|e| Self::extraction_error(archive, e))?;
        scratch.mark_used();

        let staged = Self::copy_to_scratch(archive, scratch.path())
            .map_err(|e| Self::extraction_error(archive, e))?;
        Self::unzip(&staged, scratch.path()).map_err(|e| Self::extraction_error(archive, e))?;

        Ok(staged)
    }

    fn copy_to_scratch(archive: &Path, scratch_dir: &Path) -> Result<PathBuf> {
        let file_name = archive.file_name().ok_or_else(|| ConvertError::Extraction {
            path: archive.to_path_buf(),
            reason: "archive path has no file name".to_string(),
        })?;

        info!("Attempting to copy {} file to {}", archive.display(), scratch_dir.display());
        let staged = scratch_dir.join(file_name);
        fs::copy(archive, &staged)?;
        info!("Copied file to {}", staged.display());

        Ok(staged)
    }

    fn unzip(staged: &Path, destination: &Path) -> Result<()> {
        let file = File::open(staged)?;
        let mut zip = ZipArchive::new(file)?;
        debug!("{} entries in {}", zip.len(), staged.display());
        zip.extract(destination)?;
        Ok(())
    }

    fn extraction_error(archive: &Path, err: ConvertError) -> ConvertError {
        match err {
            ConvertError::Extraction { .. } => err,
            other => ConvertError::Extraction {
                path: archive.to_path_buf(),
                reason: other.to_string(),
            },
        }
    }
}
