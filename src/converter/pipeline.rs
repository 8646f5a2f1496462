//! # Conversion Pipeline
//!
//! Main orchestrator: converts every archive of the input directory into a
//! PDF, one archive at a time.
//!
//! ## Per-archive states:
//! 1. **SkipCheck**: `<output>/<stem>.pdf` already exists, nothing else to do
//! 2. **Reset**: the scratch area is wiped and recreated
//! 3. **Extract**: copy + unzip into the scratch area
//! 4. **Collect**: sorted list of extracted images
//! 5. **Assemble**: write the PDF
//! 6. **Verify**: the PDF must exist on disk
//!
//! Every step returns a `Result`; an `Err` anywhere becomes a `FailureRecord`
//! and the loop moves on to the next archive. Only configuration errors,
//! raised before the first archive, stop the run.
//!
//! ## Example:
//! ```ignore
//! let pipeline = ConversionPipeline::new(config)?;
//! let report = pipeline.run()?;
//! if report.has_failures() {
//!     std::process::exit(1);
//! }
//! ```

use crate::{
    archive_extractor::ArchiveExtractor,
    config::Config,
    converter::{
        path_resolver::PathResolver,
        progress_tracker::{ArchiveOutcome, FailureRecord, ProgressTracker, RunReport},
    },
    error::{ConvertError, Result},
    file_manager::FileManager,
    json_output::JsonMessage,
    pdf_assembler::PdfAssembler,
    scratch::ScratchArea,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

/// Sequential archive-to-PDF converter
pub struct ConversionPipeline {
    config: Config,
    assembler: PdfAssembler,
}

impl ConversionPipeline {
    /// Validate the configuration and resolve both directories.
    ///
    /// Fails with [`ConvertError::Config`] when the input directory is missing
    /// or the output directory cannot be created.
    pub fn new(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| ConvertError::Config(e.to_string()))?;

        let input_dir = PathResolver::resolve_input_dir(&config.input_dir)?;
        let output_dir = PathResolver::resolve_output_dir(&config.output_dir)?;
        let assembler = PdfAssembler::new(config.resolution);

        Ok(Self {
            config: Config {
                input_dir,
                output_dir,
                ..config
            },
            assembler,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Convert every archive of the input directory
    pub fn run(&self) -> Result<RunReport> {
        let start_time = Instant::now();
        info!("Starting image zip file processing...");

        FileManager::log_input_listing(&self.config.input_dir)
            .map_err(|e| ConvertError::Config(format!("Cannot read input directory: {}", e)))?;
        let archives = FileManager::find_archives(&self.config.input_dir, &self.config.archive_marker)
            .map_err(|e| ConvertError::Config(format!("Cannot read input directory: {}", e)))?;

        info!("Listing absolute file paths for zip files:");
        for archive in &archives {
            info!("File path: {}", archive.display());
        }

        if self.config.json_output {
            JsonMessage::start(
                self.config.input_dir.clone(),
                self.config.output_dir.clone(),
                archives.len(),
            )
            .emit();
        }

        let report = self.convert_archives(&archives, start_time);

        info!("Finished image zip file processing.");
        Ok(report)
    }

    /// Process the archives in order, then report failures and drop the scratch area
    pub fn convert_archives(&self, archives: &[PathBuf], start_time: Instant) -> RunReport {
        info!("Starting image zip file conversion...");

        let mut scratch = ScratchArea::new(self.config.scratch_dir());
        let mut tracker = ProgressTracker::new(
            archives.len(),
            self.config.json_output,
            self.config.show_progress,
        );

        for (position, archive) in archives.iter().enumerate() {
            let index = position + 1;
            info!("File #{} : Starting processing of {}", index, archive.display());
            tracker.archive_started(index, archive);

            let result = self.process_archive(index, archive, &mut scratch);
            match &result {
                Ok(ArchiveOutcome::Converted(_)) => {
                    info!("File #{} : Finished Processing of {}", index, archive.display());
                }
                Ok(ArchiveOutcome::Skipped { output }) => {
                    info!(
                        "File #{} : PDF already created here: {}. Skipping to next file.",
                        index,
                        output.display()
                    );
                }
                Err(e) => {
                    error!(
                        "File #{} : Failed processing of {}: {}. Attempting next file.",
                        index,
                        archive.display(),
                        e
                    );
                }
            }
            tracker.handle_archive_completion(archive, &result);
        }

        info!("Completed all file conversions.");
        Self::report_failures(tracker.failures());

        if let Err(e) = scratch.destroy() {
            error!("{}", e);
        }

        tracker.finish(start_time.elapsed().as_secs_f64())
    }

    /// Run one archive through skip check, extraction, assembly and verification
    pub fn process_archive(
        &self,
        index: usize,
        archive: &Path,
        scratch: &mut ScratchArea,
    ) -> Result<ArchiveOutcome> {
        let target = PathResolver::output_target(archive, &self.config.output_dir);

        if PathResolver::output_exists(archive, &self.config.output_dir) {
            return Ok(ArchiveOutcome::Skipped { output: target });
        }

        if let Err(e) = scratch.reset() {
            warn!("File #{} : {}", index, e);
        }

        ArchiveExtractor::extract(archive, scratch)?;

        let images =
            FileManager::collect_images(scratch.path(), archive, &self.config.image_extensions)?;

        let pdf = self.assembler.assemble(&images, &target)?;
        self.verify_output(archive)?;

        info!("PDF successfully created.");
        Ok(ArchiveOutcome::Converted(pdf))
    }

    /// The PDF of `archive` must be on disk once assembly reported success
    pub fn verify_output(&self, archive: &Path) -> Result<()> {
        if PathResolver::output_exists(archive, &self.config.output_dir) {
            Ok(())
        } else {
            Err(ConvertError::Verification(PathResolver::output_target(
                archive,
                &self.config.output_dir,
            )))
        }
    }

    fn report_failures(failures: &[FailureRecord]) {
        if failures.is_empty() {
            return;
        }

        let names: Vec<String> = failures
            .iter()
            .map(|f| f.archive.display().to_string())
            .collect();
        error!("List of files that could not be processed:");
        error!("{}", names.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn png_bytes(width: u32) -> Vec<u8> {
        let mut bytes = std::io::Cursor::new(Vec::new());
        RgbImage::from_pixel(width, 4, Rgb([0, 0, 255]))
            .write_to(&mut bytes, image::ImageOutputFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    fn write_zip(path: &Path, entries: &[(String, Vec<u8>)]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, data) in entries {
            writer.start_file(name.as_str(), SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    fn pipeline(input: &Path, output: &Path) -> ConversionPipeline {
        ConversionPipeline::new(Config {
            input_dir: input.to_path_buf(),
            output_dir: output.to_path_buf(),
            show_progress: false,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_new_rejects_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let result = ConversionPipeline::new(Config {
            input_dir: temp_dir.path().join("missing"),
            output_dir: temp_dir.path().join("out"),
            ..Default::default()
        });

        assert!(matches!(result, Err(ConvertError::Config(_))));
        assert!(!temp_dir.path().join("out").exists());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let result = ConversionPipeline::new(Config {
            input_dir: temp_dir.path().to_path_buf(),
            output_dir: temp_dir.path().to_path_buf(),
            resolution: -1.0,
            ..Default::default()
        });

        assert!(matches!(result, Err(ConvertError::Config(_))));
    }

    #[test]
    fn test_process_archive_converts() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let archive = input.path().join("book.zip");
        write_zip(
            &archive,
            &[
                ("book/2.png".to_string(), png_bytes(20)),
                ("book/1.png".to_string(), png_bytes(10)),
            ],
        );

        let pipeline = pipeline(input.path(), output.path());
        let mut scratch = ScratchArea::new(pipeline.config().scratch_dir());
        let outcome = pipeline.process_archive(1, &archive, &mut scratch).unwrap();

        match outcome {
            ArchiveOutcome::Converted(pdf) => {
                assert_eq!(pdf.pages, 2);
                assert_eq!(pdf.path, output.path().join("book.pdf"));
                assert!(pdf.path.exists());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_process_archive_skips_without_touching_scratch() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let archive = input.path().join("book.zip");
        fs::write(&archive, b"never read").unwrap();
        fs::write(output.path().join("book.pdf"), b"%PDF-existing").unwrap();

        let pipeline = pipeline(input.path(), output.path());
        let mut scratch = ScratchArea::new(pipeline.config().scratch_dir());
        let outcome = pipeline.process_archive(1, &archive, &mut scratch).unwrap();

        assert_eq!(
            outcome,
            ArchiveOutcome::Skipped {
                output: output.path().join("book.pdf")
            }
        );
        assert!(!scratch.path().exists());
        assert_eq!(fs::read(output.path().join("book.pdf")).unwrap(), b"%PDF-existing");
    }

    #[test]
    fn test_process_archive_without_images_fails() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let archive = input.path().join("notes.zip");
        write_zip(&archive, &[("notes/readme.txt".to_string(), b"hello".to_vec())]);

        let pipeline = pipeline(input.path(), output.path());
        let mut scratch = ScratchArea::new(pipeline.config().scratch_dir());
        let err = pipeline.process_archive(1, &archive, &mut scratch).unwrap_err();

        assert!(matches!(err, ConvertError::Assembly(_)));
        assert!(!output.path().join("notes.pdf").exists());
    }

    #[test]
    fn test_verify_output_reports_missing_pdf() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let archive = input.path().join("book.zip");
        write_zip(&archive, &[("book/1.png".to_string(), png_bytes(10))]);

        let pipeline = pipeline(input.path(), output.path());
        let mut scratch = ScratchArea::new(pipeline.config().scratch_dir());
        pipeline.process_archive(1, &archive, &mut scratch).unwrap();
        assert!(pipeline.verify_output(&archive).is_ok());

        fs::remove_file(output.path().join("book.pdf")).unwrap();

        match pipeline.verify_output(&archive) {
            Err(e @ ConvertError::Verification(_)) => {
                assert!(!e.is_fatal());
                assert!(e.to_string().contains("book.pdf"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_run_with_no_archives() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("readme.txt"), b"x").unwrap();

        let report = pipeline(input.path(), output.path()).run().unwrap();

        assert_eq!(report.stats.archives_seen(), 0);
        assert!(!report.has_failures());
        assert!(!output.path().join("tmp").exists());
    }
}
