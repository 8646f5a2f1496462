//! # File Management Module
//!
//! Directory listing for the two places the pipeline looks for files:
//! the input directory (archives) and the extraction folder inside the
//! scratch area (images).
//!
//! ## Matching rules:
//! - **Archives**: regular files whose *name* contains the archive marker
//!   (`.zip` by default). This is a substring test, so `report.zip.backup`
//!   matches as well.
//! - **Images**: regular files whose name contains one of the supported
//!   extensions (`.png`, `.jpg`, `.jpeg`), case-sensitive.
//!
//! ## Ordering:
//! - Archives come back in directory-listing order, unsorted.
//! - Images come back sorted ascending by full path. That order is the page
//!   order of the produced PDF.
//!
//! ## Example:
//! ```ignore
//! let archives = FileManager::find_archives(&input_dir, ".zip")?;
//! let images = FileManager::collect_images(&scratch_dir, &archives[0], &extensions)?;
//! ```

use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Log target for messages only shown with `--verbose`
pub const VERBOSE_TARGET: &str = "image_zip_pdf::verbose";

/// Manages file discovery in the input directory and the scratch area
pub struct FileManager;

impl FileManager {
    /// List the regular files directly inside `dir`, in directory-listing order
    pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Log every file of the input directory (debug) and their count
    pub fn log_input_listing(input_dir: &Path) -> Result<usize> {
        let files = Self::list_files(input_dir)?;

        debug!("Listing files in directory [{}]:", input_dir.display());
        for file in &files {
            debug!("File: {}", Self::file_name(file));
        }
        info!("Found {} files in input directory", files.len());

        Ok(files.len())
    }

    /// Find all archives in the input directory as absolute paths
    pub fn find_archives(input_dir: &Path, marker: &str) -> Result<Vec<PathBuf>> {
        let base = std::path::absolute(input_dir)?;
        let archives: Vec<PathBuf> = Self::list_files(&base)?
            .into_iter()
            .filter(|path| Self::is_archive(path, marker))
            .collect();

        info!(target: VERBOSE_TARGET, "Listing zip files in directory [{}]:", base.display());
        for archive in &archives {
            info!(target: VERBOSE_TARGET, "File: {}", archive.display());
        }
        info!("Found {} zip files", archives.len());

        Ok(archives)
    }

    /// Check if a file name marks an archive
    pub fn is_archive(path: &Path, marker: &str) -> bool {
        Self::file_name(path).contains(marker)
    }

    /// Check if a file name carries one of the supported image extensions
    pub fn is_supported_image<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
        let name = Self::file_name(path);
        extensions.iter().any(|ext| name.contains(ext.as_ref()))
    }

    /// Folder an archive extracts into: `<scratch>/<archive stem>`
    pub fn extraction_dir(scratch_dir: &Path, archive: &Path) -> PathBuf {
        let stem = archive.file_stem().unwrap_or_default();
        scratch_dir.join(stem)
    }

    /// Collect the extracted images of an archive, sorted by path
    pub fn collect_images<S: AsRef<str>>(
        scratch_dir: &Path,
        archive: &Path,
        extensions: &[S],
    ) -> Result<Vec<PathBuf>> {
        let images_dir = Self::extraction_dir(scratch_dir, archive);

        if !images_dir.is_dir() {
            warn!("Extraction folder not found: {}", images_dir.display());
            return Ok(Vec::new());
        }

        let mut images: Vec<PathBuf> = Self::list_files(&images_dir)?
            .into_iter()
            .filter(|path| Self::is_supported_image(path, extensions))
            .collect();
        images.sort();

        info!(target: VERBOSE_TARGET, "Listing image files in directory, {}:", images_dir.display());
        for image in &images {
            info!(target: VERBOSE_TARGET, "Image: {}", image.display());
        }
        info!("Found {} image files", images.len());

        Ok(images)
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    fn file_name(path: &Path) -> std::borrow::Cow<'_, str> {
        path.file_name().unwrap_or_default().to_string_lossy()
    }
}
