//! # JSON Output Module
//!
//! Structured JSON lines on stdout for callers driving the converter from
//! another program.
//!
//! ## Message types:
//! - `start`: run begins, with the archive count
//! - `archive_start`: an archive is about to be processed
//! - `archive_complete`: an archive was converted, skipped or failed
//! - `complete`: run finished, with totals and the failed archives
//! - `error`: fatal error before any archive was processed

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Final state of one archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveStatus {
    Converted,
    Skipped,
    Failed,
}

/// JSON message type
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    #[serde(rename = "start")]
    Start {
        input_dir: PathBuf,
        output_dir: PathBuf,
        total_archives: usize,
    },

    #[serde(rename = "archive_start")]
    ArchiveStart {
        path: PathBuf,
        index: usize,
        total: usize,
    },

    #[serde(rename = "archive_complete")]
    ArchiveComplete {
        path: PathBuf,
        status: ArchiveStatus,
        output: Option<PathBuf>,
        pages: usize,
        error: Option<String>,
    },

    #[serde(rename = "complete")]
    Complete {
        converted: usize,
        skipped: usize,
        failed: usize,
        pages_written: usize,
        bytes_written: u64,
        duration_seconds: f64,
        failed_archives: Vec<PathBuf>,
    },

    #[serde(rename = "error")]
    Error {
        message: String,
        details: Option<String>,
    },
}

impl JsonMessage {
    /// Emit the message as one line on stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn start(input_dir: PathBuf, output_dir: PathBuf, total_archives: usize) -> Self {
        Self::Start {
            input_dir,
            output_dir,
            total_archives,
        }
    }

    pub fn archive_start(path: PathBuf, index: usize, total: usize) -> Self {
        Self::ArchiveStart { path, index, total }
    }

    pub fn archive_complete(
        path: PathBuf,
        status: ArchiveStatus,
        output: Option<PathBuf>,
        pages: usize,
        error: Option<String>,
    ) -> Self {
        Self::ArchiveComplete {
            path,
            status,
            output,
            pages,
            error,
        }
    }

    pub fn error(message: String, details: Option<String>) -> Self {
        Self::Error { message, details }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_tagged() {
        let message = JsonMessage::archive_complete(
            PathBuf::from("/in/book.zip"),
            ArchiveStatus::Skipped,
            Some(PathBuf::from("/out/book.pdf")),
            0,
            None,
        );
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["type"], "archive_complete");
        assert_eq!(value["status"], "skipped");
        assert_eq!(value["output"], "/out/book.pdf");
        assert!(value["error"].is_null());
    }

    #[test]
    fn test_start_message_shape() {
        let message = JsonMessage::start(PathBuf::from("in"), PathBuf::from("out"), 3);
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(
            json,
            r#"{"type":"start","input_dir":"in","output_dir":"out","total_archives":3}"#
        );
    }
}
