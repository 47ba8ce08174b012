//! # pdf4markdown
//!
//! Batch-convert a directory of PDF documents into Markdown files, one
//! `<stem>.md` per input.
//!
//! The crate has two halves that meet at a single trait:
//!
//! * the **batch driver** ([`run_batch`]) resolves the input directory,
//!   finds `*.pdf` files, processes them in file-name order and writes the
//!   results;
//! * the **converter** ([`DocumentConverter`]) turns one file into a
//!   [`StructuredDocument`], which knows how to export itself as Markdown.
//!   [`PdfiumConverter`] is the bundled backend; anything implementing the
//!   trait can replace it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input_dir
//!  │
//!  ├─ 1. Check    input directory exists
//!  ├─ 2. Prepare  create output directory (with parents)
//!  ├─ 3. Discover *.pdf, non-recursive, sorted by file name
//!  └─ 4. For each file, in order:
//!         convert ──▶ export_to_markdown ──▶ write <output_dir>/<stem>.md
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf4markdown::{run_batch, BatchConfig, PdfiumConverter, PdfiumOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::new("./data/VP_OP", "/tmp/out_markdown");
//!     let converter = PdfiumConverter::new(PdfiumOptions::default())?;
//!     let report = run_batch(&config, &converter)?;
//!     eprintln!("wrote {} files", report.written());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf4markdown` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf4markdown = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod converter;
pub mod document;
pub mod error;
pub mod markdown;
pub mod output;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{discover_inputs, output_path_for, run_batch, write_markdown};
pub use config::{BatchConfig, BatchConfigBuilder, ExportOptions, FailurePolicy, PageSeparator};
pub use converter::{DocumentConverter, PdfiumConverter, PdfiumOptions};
pub use document::{DocumentMetadata, Page, StructuredDocument};
pub use error::{BatchError, ConversionError};
pub use output::{BatchReport, FileOutcome};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
