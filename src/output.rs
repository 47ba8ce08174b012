//! Result types describing a finished (or kept-going) batch run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome for one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    /// Input document.
    pub input: PathBuf,
    /// Markdown destination (`<output_dir>/<stem>.md`), set even on failure.
    pub output: PathBuf,
    /// Pages in the converted document; 0 when conversion failed.
    pub page_count: usize,
    /// Bytes of Markdown written; 0 when nothing was written.
    pub bytes_written: usize,
    /// Error description when this file failed (keep-going mode only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a batch run, in processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub files: Vec<FileOutcome>,
    /// Wall-clock duration of the whole run in milliseconds.
    pub total_duration_ms: u64,
}

impl BatchReport {
    /// Number of files written successfully.
    pub fn written(&self) -> usize {
        self.files.iter().filter(|f| f.is_success()).count()
    }

    /// Number of files that failed.
    pub fn failed(&self) -> usize {
        self.files.len() - self.written()
    }

    /// Total Markdown bytes written across the batch.
    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.bytes_written).sum()
    }
}
