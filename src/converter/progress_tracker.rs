//! # Progress Tracking Module
//!
//! Turns per-archive results into counters, progress bar updates, JSON
//! events and the failure list of the run.

use crate::{
    error::ConvertError,
    json_output::{ArchiveStatus, JsonMessage},
    pdf_assembler::AssembledPdf,
    progress::{ConversionStats, ProgressManager},
};
use std::path::{Path, PathBuf};

/// What happened to an archive that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveOutcome {
    /// A new PDF was written
    Converted(AssembledPdf),
    /// The PDF was already in the output directory
    Skipped { output: PathBuf },
}

/// An archive that could not be converted in this run
#[derive(Debug, Clone, PartialEq)]
pub struct FailureRecord {
    pub archive: PathBuf,
    pub reason: String,
}

/// Final state of one archive, in the order archives were processed
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedArchive {
    pub archive: PathBuf,
    pub status: ArchiveStatus,
}

/// Aggregated result of a whole run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub stats: ConversionStats,
    pub processed: Vec<ProcessedArchive>,
    pub failures: Vec<FailureRecord>,
    pub duration_seconds: f64,
}

impl RunReport {
    /// Archives that got a new PDF, in processing order
    pub fn converted_archives(&self) -> Vec<PathBuf> {
        self.processed
            .iter()
            .filter(|p| p.status == ArchiveStatus::Converted)
            .map(|p| p.archive.clone())
            .collect()
    }

    pub fn failed_archives(&self) -> Vec<PathBuf> {
        self.failures.iter().map(|f| f.archive.clone()).collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Tracks the run while archives are processed one after the other
pub struct ProgressTracker {
    pub total_archives: usize,
    json_output: bool,
    stats: ConversionStats,
    processed: Vec<ProcessedArchive>,
    failures: Vec<FailureRecord>,
    progress_manager: ProgressManager,
}

impl ProgressTracker {
    pub fn new(total_archives: usize, json_output: bool, show_progress: bool) -> Self {
        let progress_manager = if show_progress && !json_output {
            ProgressManager::new(total_archives as u64)
        } else {
            ProgressManager::hidden(total_archives as u64)
        };

        Self {
            total_archives,
            json_output,
            stats: ConversionStats::new(),
            processed: Vec::new(),
            failures: Vec::new(),
            progress_manager,
        }
    }

    /// Archive `index` (1-based) is about to be processed
    pub fn archive_started(&self, index: usize, archive: &Path) {
        if self.json_output {
            JsonMessage::archive_start(archive.to_path_buf(), index, self.total_archives).emit();
        }
        self.progress_manager
            .set_message(&archive.file_name().unwrap_or_default().to_string_lossy());
    }

    /// Record the result of one archive
    pub fn handle_archive_completion(
        &mut self,
        archive: &Path,
        result: &Result<ArchiveOutcome, ConvertError>,
    ) {
        let name = archive.file_name().unwrap_or_default().to_string_lossy().to_string();

        let (status, output, pages, error, message) = match result {
            Ok(ArchiveOutcome::Converted(pdf)) => {
                self.stats.add_converted(pdf.pages, pdf.bytes);
                (
                    ArchiveStatus::Converted,
                    Some(pdf.path.clone()),
                    pdf.pages,
                    None,
                    format!("[OK] {}: {} pages", name, pdf.pages),
                )
            }
            Ok(ArchiveOutcome::Skipped { output }) => {
                self.stats.add_skipped();
                (
                    ArchiveStatus::Skipped,
                    Some(output.clone()),
                    0,
                    None,
                    format!("[SKIP] {}: already converted", name),
                )
            }
            Err(e) => {
                self.stats.add_failed();
                self.failures.push(FailureRecord {
                    archive: archive.to_path_buf(),
                    reason: e.to_string(),
                });
                (
                    ArchiveStatus::Failed,
                    None,
                    0,
                    Some(e.to_string()),
                    format!("[ERROR] {}: failed", name),
                )
            }
        };

        self.processed.push(ProcessedArchive {
            archive: archive.to_path_buf(),
            status,
        });

        if self.json_output {
            JsonMessage::archive_complete(archive.to_path_buf(), status, output, pages, error).emit();
        }
        self.progress_manager.update(&message);
    }

    pub fn stats(&self) -> &ConversionStats {
        &self.stats
    }

    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    pub fn processed(&self) -> &[ProcessedArchive] {
        &self.processed
    }

    /// Close the progress bar and build the run report
    pub fn finish(self, duration_seconds: f64) -> RunReport {
        self.progress_manager.finish(&self.stats.format_summary());

        let report = RunReport {
            stats: self.stats,
            processed: self.processed,
            failures: self.failures,
            duration_seconds,
        };

        if self.json_output {
            JsonMessage::Complete {
                converted: report.stats.converted,
                skipped: report.stats.skipped,
                failed: report.stats.failed,
                pages_written: report.stats.pages_written,
                bytes_written: report.stats.bytes_written,
                duration_seconds,
                failed_archives: report.failed_archives(),
            }
            .emit();
        }

        report
    }
}
