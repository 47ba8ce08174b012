//! The document-conversion capability consumed by the batch driver.
//!
//! The driver only knows the [`DocumentConverter`] trait: hand it a path,
//! get back a [`StructuredDocument`] or a [`ConversionError`]. Everything that
//! happens in between (opening the PDF, reading its text layer, layout
//! handling) belongs to the backend. The crate ships one backend,
//! [`PdfiumConverter`]; tests and embedders plug in their own.
//!
//! ```text
//! path ──▶ input::validate_pdf ──▶ backend.convert ──▶ StructuredDocument
//!          (exists, readable,       (pdfium text layer,
//!           %PDF magic)              metadata)
//! ```

pub mod input;
pub mod pdfium;

pub use self::pdfium::{PdfiumConverter, PdfiumOptions};

use crate::document::StructuredDocument;
use crate::error::ConversionError;
use std::path::Path;

/// Turns one input file into a [`StructuredDocument`].
///
/// A converter is constructed once per run and borrowed by the driver for
/// every file of the batch. Calls are strictly sequential.
pub trait DocumentConverter {
    /// Convert the document at `path`.
    fn convert(&self, path: &Path) -> Result<StructuredDocument, ConversionError>;
}

impl<T: DocumentConverter + ?Sized> DocumentConverter for &T {
    fn convert(&self, path: &Path) -> Result<StructuredDocument, ConversionError> {
        (**self).convert(path)
    }
}

impl<T: DocumentConverter + ?Sized> DocumentConverter for Box<T> {
    fn convert(&self, path: &Path) -> Result<StructuredDocument, ConversionError> {
        (**self).convert(path)
    }
}
