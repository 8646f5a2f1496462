//! # Converter Module
//!
//! Splits the conversion run into submodules:
//! - `pipeline`: per-archive state machine and batch loop
//! - `progress_tracker`: outcome accounting, failure list, progress events
//! - `path_resolver`: directory validation and output naming

pub mod path_resolver;
pub mod pipeline;
pub mod progress_tracker;

pub use path_resolver::PathResolver;
pub use pipeline::ConversionPipeline;
pub use progress_tracker::{
    ArchiveOutcome, FailureRecord, ProcessedArchive, ProgressTracker, RunReport,
};
