//! Error types for the pdf4markdown library.
//!
//! Two distinct error types reflect two distinct failure scopes:
//!
//! * [`BatchError`]: the batch run as a whole cannot proceed (input
//!   directory missing, output directory not creatable) or a file failed
//!   under the abort-on-first-failure policy. Returned as `Err(BatchError)`
//!   from [`crate::batch::run_batch`].
//!
//! * [`ConversionError`]: one document could not be turned into a
//!   [`crate::document::StructuredDocument`]. Produced by a
//!   [`crate::converter::DocumentConverter`]; the driver wraps it in
//!   [`BatchError::Conversion`] or records it in a
//!   [`crate::output::FileOutcome`], depending on the failure policy.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the batch driver.
#[derive(Debug, Error)]
pub enum BatchError {
    // ── Input directory ───────────────────────────────────────────────────
    /// The configured input directory does not exist.
    #[error("Input directory not found: '{path}'\nCheck the path exists and is readable.")]
    InputDirNotFound { path: PathBuf },

    /// The configured input path exists but is a file.
    #[error("Input path is not a directory: '{path}'")]
    InputNotADirectory { path: PathBuf },

    /// Listing the input directory failed (permissions, I/O error).
    #[error("Failed to read input directory '{path}': {source}")]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output ────────────────────────────────────────────────────────────
    /// Could not create the output directory (or one of its parents).
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write an output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Conversion ────────────────────────────────────────────────────────
    /// The converter failed on one input file.
    #[error("Conversion of '{path}' failed")]
    Conversion {
        path: PathBuf,
        #[source]
        source: ConversionError,
    },

    /// Keep-going mode: the whole batch ran but at least one file failed.
    #[error("{failed}/{total} files failed during conversion")]
    PartialFailure { failed: usize, total: usize },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised by a [`crate::converter::DocumentConverter`] for a single
/// document.
#[derive(Debug, Error)]
pub enum ConversionError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium returned an error while reading a page's text layer.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Place libpdfium next to the binary or install it system-wide.\n\
  • Download a build from https://github.com/bblanchon/pdfium-binaries/releases\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected converter error (also used by custom converters).
    #[error("Converter error: {0}")]
    Other(String),
}
