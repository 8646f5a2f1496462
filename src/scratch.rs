//! # Scratch Area Module
//!
//! Owns the single working directory (`<output>/tmp` by default) where each
//! archive is copied and extracted.
//!
//! ## Lifecycle:
//! 1. `ScratchArea::new()` only records the location, nothing is created yet
//! 2. `reset()` wipes the directory and recreates it empty, once per archive
//! 3. `ensure_ready()` is checked right before extraction: the directory must
//!    exist, be empty and have been reset since the last extraction
//! 4. `destroy()` removes it at the end of the run; dropping the handle
//!    without calling `destroy()` removes it as well
//!
//! Deletion is tolerant: an entry that cannot be removed is logged and the
//! walk keeps going.

use crate::error::{ConvertError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Handle on the shared scratch directory
#[derive(Debug)]
pub struct ScratchArea {
    path: PathBuf,
    ready: bool,
    destroyed: bool,
}

impl ScratchArea {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            ready: false,
            destroyed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove any previous contents and recreate the directory empty
    pub fn reset(&mut self) -> Result<()> {
        self.ready = false;

        if self.path.exists() {
            let failures = Self::remove_tree(&self.path);
            if failures > 0 {
                warn!("{} entries could not be removed from {}", failures, self.path.display());
            } else {
                debug!("Deleted temporary directory {}", self.path.display());
            }
        }

        fs::create_dir_all(&self.path).map_err(|e| {
            ConvertError::ScratchCleanup(format!(
                "Failed to create temporary directory {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Self::set_permissive_mode(&self.path);

        info!("Created temporary directory @ {}", self.path.display());
        self.ready = true;
        Ok(())
    }

    /// Precondition for extraction: freshly reset, existing and empty
    pub fn ensure_ready(&self) -> Result<()> {
        if !self.ready {
            return Err(ConvertError::ScratchCleanup(format!(
                "Temporary directory {} was not reset before use",
                self.path.display()
            )));
        }

        let mut entries = fs::read_dir(&self.path)?;
        if entries.next().is_some() {
            return Err(ConvertError::ScratchCleanup(format!(
                "Temporary directory {} is not empty",
                self.path.display()
            )));
        }

        Ok(())
    }

    /// Mark the area as used so the next archive has to reset it again
    pub fn mark_used(&mut self) {
        self.ready = false;
    }

    /// Remove the scratch area at the end of the run
    pub fn destroy(mut self) -> Result<()> {
        self.destroyed = true;
        self.ready = false;
        Self::destroy_path(&self.path)
    }

    fn destroy_path(path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let failures = Self::remove_tree(path);
        if failures > 0 || path.exists() {
            return Err(ConvertError::ScratchCleanup(format!(
                "Failed to delete the temporary directory @ {} ({} entries left behind)",
                path.display(),
                failures
            )));
        }

        info!("Deleted temporary directory.");
        Ok(())
    }

    /// Delete a directory tree bottom-up, returning how many entries failed
    fn remove_tree(root: &Path) -> usize {
        let mut failures = 0;

        for entry in WalkDir::new(root).contents_first(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Cannot read entry while deleting {}: {}", root.display(), e);
                    failures += 1;
                    continue;
                }
            };

            let result = if entry.file_type().is_dir() {
                fs::remove_dir(entry.path())
            } else {
                fs::remove_file(entry.path())
            };

            if let Err(e) = result {
                warn!("{} exception thrown when deleting {}", e, entry.path().display());
                failures += 1;
            }
        }

        failures
    }

    #[cfg(unix)]
    fn set_permissive_mode(path: &Path) {
        use std::os::unix::fs::PermissionsExt;

        if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o777)) {
            warn!("Could not change mode of {}: {}", path.display(), e);
        }
    }

    #[cfg(not(unix))]
    fn set_permissive_mode(_path: &Path) {}
}

impl Drop for ScratchArea {
    fn drop(&mut self) {
        if !self.destroyed {
            if let Err(e) = Self::destroy_path(&self.path) {
                error!("{}", e);
            }
        }
    }
}
