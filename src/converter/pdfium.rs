//! PDFium-backed converter: text layer + metadata via `pdfium-render`.
//!
//! The PDFium library is bound once, when the converter is built, and the
//! same binding serves every file in the batch. Binding order:
//!
//! 1. `PdfiumOptions::library_path`, if set
//! 2. `PDFIUM_LIB_PATH` (a library file or the directory containing it)
//! 3. a platform library next to the working directory (`./libpdfium.so`, …)
//! 4. the system library search path

use super::input::validate_pdf;
use super::DocumentConverter;
use crate::config::ExportOptions;
use crate::document::{DocumentMetadata, Page, StructuredDocument};
use crate::error::ConversionError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an existing pdfium library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Settings for [`PdfiumConverter`].
#[derive(Debug, Clone, Default)]
pub struct PdfiumOptions {
    /// User password applied to every encrypted input.
    pub password: Option<String>,
    /// Markdown export settings attached to each produced document.
    pub export: ExportOptions,
    /// Explicit pdfium library (file or directory). Overrides `PDFIUM_LIB_PATH`.
    pub library_path: Option<PathBuf>,
}

/// Converts PDFs by reading their text layer through PDFium.
pub struct PdfiumConverter {
    pdfium: Pdfium,
    options: PdfiumOptions,
}

impl PdfiumConverter {
    /// Bind the PDFium library and build a converter.
    pub fn new(options: PdfiumOptions) -> Result<Self, ConversionError> {
        let pdfium = bind_pdfium(options.library_path.as_deref())?;
        Ok(Self { pdfium, options })
    }

    pub fn options(&self) -> &PdfiumOptions {
        &self.options
    }
}

impl DocumentConverter for PdfiumConverter {
    fn convert(&self, path: &Path) -> Result<StructuredDocument, ConversionError> {
        validate_pdf(path)?;

        let password = self.options.password.as_deref();
        let document = self
            .pdfium
            .load_pdf_from_file(path, password)
            .map_err(|e| classify_load_error(path, password.is_some(), &e))?;

        let metadata = read_metadata(&document);
        info!("PDF loaded: {} pages", metadata.page_count);

        let pages = extract_pages(&document)?;

        Ok(StructuredDocument::new(path, metadata, pages)
            .with_export_options(self.options.export.clone()))
    }
}

// ── Binding ──────────────────────────────────────────────────────────────

fn bind_pdfium(explicit: Option<&Path>) -> Result<Pdfium, ConversionError> {
    let configured = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(PDFIUM_LIB_PATH_ENV).map(PathBuf::from))
        .filter(|p| !p.as_os_str().is_empty());

    let bindings = match configured {
        Some(path) => {
            let lib = if path.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(&path)
            } else {
                path
            };
            debug!("Binding pdfium from {}", lib.display());
            Pdfium::bind_to_library(&lib).map_err(|e| {
                ConversionError::PdfiumBindingFailed(format!("{}: {}", lib.display(), e))
            })?
        }
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| ConversionError::PdfiumBindingFailed(e.to_string()))?,
    };

    Ok(Pdfium::new(bindings))
}

// ── Loading ──────────────────────────────────────────────────────────────

fn classify_load_error(path: &Path, has_password: bool, e: &PdfiumError) -> ConversionError {
    let detail = format!("{:?}", e);
    if detail.contains("Password") || detail.contains("password") {
        if has_password {
            ConversionError::WrongPassword {
                path: path.to_path_buf(),
            }
        } else {
            ConversionError::PasswordRequired {
                path: path.to_path_buf(),
            }
        }
    } else {
        ConversionError::CorruptPdf {
            path: path.to_path_buf(),
            detail,
        }
    }
}

fn read_metadata(document: &PdfDocument) -> DocumentMetadata {
    let metadata = document.metadata();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().trim().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: document.pages().len() as usize,
        pdf_version: version_label(&format!("{:?}", document.version())),
    }
}

fn extract_pages(document: &PdfDocument) -> Result<Vec<Page>, ConversionError> {
    let mut pages = Vec::with_capacity(document.pages().len() as usize);

    for (idx, page) in document.pages().iter().enumerate() {
        let text = page
            .text()
            .map_err(|e| ConversionError::TextExtractionFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?
            .all();
        debug!("Extracted page {} → {} chars", idx + 1, text.len());
        pages.push(Page::new(idx + 1, text));
    }

    Ok(pages)
}

/// Turn pdfium's version debug name (`Pdf1_7`, `Pdf2_0`, `Unset`) into a
/// dotted version string. Unknown shapes pass through unchanged.
fn version_label(debug_name: &str) -> String {
    match debug_name.strip_prefix("Pdf") {
        Some(v) if v.chars().all(|c| c.is_ascii_digit() || c == '_') => v.replace('_', "."),
        _ if debug_name == "Unset" => String::new(),
        _ => debug_name.to_string(),
    }
}
