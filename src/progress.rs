//! # Progress Tracking and Statistics Module
//!
//! Progress bar and per-run counters.
//!
//! ## Components:
//! - `ProgressManager`: wraps the `indicatif` bar, one tick per archive
//! - `ConversionStats`: cumulative counters for the run
//!
//! ## Tracked statistics:
//! - **converted**: archives turned into a new PDF
//! - **skipped**: archives whose PDF already existed
//! - **failed**: archives recorded as failures
//! - **pages_written**: total pages across the new PDFs
//! - **bytes_written**: total size of the new PDFs
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:12] [========================>---------------] 6/10 (60%) [OK] book.zip: 24 pages
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for a conversion run
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_archives: u64) -> Self {
        let bar = ProgressBar::new(total_archives);

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Progress manager that draws nothing (JSON mode, `--no-progress`)
    pub fn hidden(total_archives: u64) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total_archives);
        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Set a custom message without incrementing
    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

/// Statistics for a conversion run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConversionStats {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub pages_written: usize,
    pub bytes_written: u64,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_converted(&mut self, pages: usize, bytes: u64) {
        self.converted += 1;
        self.pages_written += pages;
        self.bytes_written += bytes;
    }

    pub fn add_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn add_failed(&mut self) {
        self.failed += 1;
    }

    pub fn archives_seen(&self) -> usize {
        self.converted + self.skipped + self.failed
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Archives: {} | Converted: {} | Skipped: {} | Failed: {} | Pages: {} | Written: {}",
            self.archives_seen(),
            self.converted,
            self.skipped,
            self.failed,
            self.pages_written,
            crate::file_manager::FileManager::format_size(self.bytes_written)
        )
    }
}
