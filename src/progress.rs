//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive the
//! "Converting X ..." / "-> wrote Y" notices as the driver works through the
//! batch. The library itself only logs through `tracing`; printing to the
//! console is the host's business.
//!
//! # Example
//!
//! ```rust
//! use pdf4markdown::{BatchConfig, BatchProgressCallback};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     written: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_file_written(&self, index: usize, total: usize, output: &Path, bytes: usize) {
//!         self.written.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} -> {} ({} bytes)", index, total, output.display(), bytes);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { written: AtomicUsize::new(0) });
//!
//! let config = BatchConfig::builder()
//!     .progress_callback(counter as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the batch driver as it processes each file.
///
/// Files are processed strictly one after another, so events for a batch
/// arrive in order. The `Send + Sync` bound only lets hosts share one
/// callback between threads of their own. All methods default to no-ops.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after discovery, before the first file is converted.
    ///
    /// # Arguments
    /// * `total_files` — number of files matched in the input directory
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file is handed to the converter.
    ///
    /// # Arguments
    /// * `index` — 1-indexed position in the sorted batch
    /// * `total` — number of files in the batch
    /// * `input` — path of the input document
    fn on_file_start(&self, index: usize, total: usize, input: &Path) {
        let _ = (index, total, input);
    }

    /// Called after the Markdown for a file has been written.
    ///
    /// # Arguments
    /// * `output` — path of the written `.md` file
    /// * `bytes`  — byte length of the written Markdown
    fn on_file_written(&self, index: usize, total: usize, output: &Path, bytes: usize) {
        let _ = (index, total, output, bytes);
    }

    /// Called when a file fails (conversion or write).
    ///
    /// Under [`crate::config::FailurePolicy::Abort`] this is the last event
    /// of the batch.
    fn on_file_error(&self, index: usize, total: usize, input: &Path, error: &str) {
        let _ = (index, total, input, error);
    }

    /// Called once after every file has been attempted (not called when the
    /// batch aborts).
    ///
    /// # Arguments
    /// * `total_files`   — number of files in the batch
    /// * `success_count` — files written without error
    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
