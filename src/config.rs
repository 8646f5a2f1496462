//! # Configuration Management Module
//!
//! Holds every tunable of a conversion run.
//!
//! ## Parameters:
//! - `input_dir`: directory scanned for archives
//! - `output_dir`: directory receiving `<stem>.pdf` files and the scratch area
//! - `scratch_dir_name`: name of the scratch directory under `output_dir` (default: `tmp`)
//! - `archive_marker`: substring identifying archives (default: `.zip`)
//! - `image_extensions`: substrings identifying images (default: `.png`, `.jpg`, `.jpeg`)
//! - `resolution`: PDF resolution metadata, pixels per inch (default: 100)
//! - `json_output`: emit JSON lines on stdout (default: false)
//! - `show_progress`: draw the progress bar (default: true)
//!
//! ## Example:
//! ```ignore
//! let config = Config {
//!     input_dir: PathBuf::from("scans"),
//!     output_dir: PathBuf::from("pdfs"),
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SCRATCH_DIR_NAME: &str = "tmp";
pub const DEFAULT_ARCHIVE_MARKER: &str = ".zip";
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];
pub const DEFAULT_RESOLUTION: f32 = 100.0;

/// Configuration for a conversion run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory containing the image archives
    pub input_dir: PathBuf,
    /// Directory receiving the generated PDFs
    pub output_dir: PathBuf,
    /// Scratch directory name, created under the output directory
    pub scratch_dir_name: String,
    /// Substring a file name must contain to be treated as an archive
    pub archive_marker: String,
    /// Substrings a file name must contain to be treated as an image
    pub image_extensions: Vec<String>,
    /// Resolution metadata of the produced PDF pages
    pub resolution: f32,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
    /// Draw a progress bar while converting
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            scratch_dir_name: DEFAULT_SCRATCH_DIR_NAME.to_string(),
            archive_marker: DEFAULT_ARCHIVE_MARKER.to_string(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            resolution: DEFAULT_RESOLUTION,
            json_output: false,
            show_progress: true,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.image_extensions.is_empty() || self.image_extensions.iter().any(|e| e.is_empty()) {
            return Err(anyhow::anyhow!("At least one non-empty image extension is required"));
        }

        if self.archive_marker.is_empty() {
            return Err(anyhow::anyhow!("Archive marker must not be empty"));
        }

        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(anyhow::anyhow!("Resolution must be a positive number"));
        }

        if self.scratch_dir_name.is_empty()
            || self.scratch_dir_name.contains('/')
            || self.scratch_dir_name.contains('\\')
            || self.scratch_dir_name == ".."
        {
            return Err(anyhow::anyhow!(
                "Scratch directory name must be a plain directory name: {:?}",
                self.scratch_dir_name
            ));
        }

        Ok(())
    }

    /// Scratch area location for this run
    pub fn scratch_dir(&self) -> PathBuf {
        self.output_dir.join(&self.scratch_dir_name)
    }

    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
