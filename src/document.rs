//! The converter's in-memory result for one input file.
//!
//! A [`StructuredDocument`] lives only between the converter call and the
//! Markdown write: the driver asks it for [`StructuredDocument::export_to_markdown`],
//! persists the text, and drops it.

use crate::config::ExportOptions;
use crate::markdown::{clean_fragment, clean_markdown, format_yaml_front_matter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Metadata read from the PDF information dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    /// Number of pages in the document.
    pub page_count: usize,
    /// PDF version as reported by the backend, e.g. `"1.7"`. May be empty.
    pub pdf_version: String,
}

/// Text content of a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Raw text as delivered by the converter backend.
    pub text: String,
}

impl Page {
    pub fn new(page_num: usize, text: impl Into<String>) -> Self {
        Self {
            page_num,
            text: text.into(),
        }
    }
}

/// A parsed document ready for Markdown export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredDocument {
    /// Path the document was read from.
    pub source: PathBuf,
    pub metadata: DocumentMetadata,
    /// Pages in document order.
    pub pages: Vec<Page>,
    /// Export settings chosen by the converter that produced this document.
    #[serde(skip)]
    pub export: ExportOptions,
}

impl StructuredDocument {
    /// Create a document with default export settings.
    pub fn new(source: impl AsRef<Path>, metadata: DocumentMetadata, pages: Vec<Page>) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            metadata,
            pages,
            export: ExportOptions::default(),
        }
    }

    /// Replace the export settings used by [`Self::export_to_markdown`].
    pub fn with_export_options(mut self, export: ExportOptions) -> Self {
        self.export = export;
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Export the whole document as Markdown using the document's own
    /// export settings.
    pub fn export_to_markdown(&self) -> String {
        self.export_to_markdown_with(&self.export)
    }

    /// Export the whole document as Markdown.
    ///
    /// Pages without any text are skipped so a scanned cover page does not
    /// leave a dangling separator. The result always ends with exactly one
    /// newline.
    pub fn export_to_markdown_with(&self, options: &ExportOptions) -> String {
        let mut parts: Vec<String> = Vec::new();

        if options.include_metadata {
            parts.push(format_yaml_front_matter(&self.metadata));
        }

        let bodies = self
            .pages
            .iter()
            .map(|p| (p.page_num, clean_fragment(&p.text)))
            .filter(|(_, body)| !body.is_empty());

        for (i, (page_num, body)) in bodies.enumerate() {
            if i > 0 {
                parts.push(options.page_separator.render(page_num));
            }
            parts.push(body);
        }

        clean_markdown(&parts.join(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSeparator;

    fn doc(pages: &[&str]) -> StructuredDocument {
        let pages = pages
            .iter()
            .enumerate()
            .map(|(i, t)| Page::new(i + 1, *t))
            .collect::<Vec<_>>();
        let metadata = DocumentMetadata {
            title: Some("Nutzungsplan".into()),
            page_count: pages.len(),
            ..DocumentMetadata::default()
        };
        StructuredDocument::new("plan.pdf", metadata, pages)
    }

    #[test]
    fn pages_joined_with_blank_line_by_default() {
        let d = doc(&["First page\r\n", "Second page"]);
        assert_eq!(d.export_to_markdown(), "First page\n\nSecond page\n");
    }

    #[test]
    fn horizontal_rule_separator() {
        let d = doc(&["One", "Two"]).with_export_options(ExportOptions {
            page_separator: PageSeparator::HorizontalRule,
            include_metadata: false,
        });
        assert_eq!(d.export_to_markdown(), "One\n\n---\n\nTwo\n");
    }

    #[test]
    fn comment_separator_uses_following_page_number() {
        let d = doc(&["One", "", "Three"]);
        let md = d.export_to_markdown_with(&ExportOptions {
            page_separator: PageSeparator::Comment,
            include_metadata: false,
        });
        assert_eq!(md, "One\n\n<!-- page 3 -->\n\nThree\n");
    }

    #[test]
    fn empty_document_exports_single_newline() {
        let d = doc(&[]);
        assert_eq!(d.export_to_markdown(), "\n");
        let d = doc(&["   ", "\u{200B}"]);
        assert_eq!(d.export_to_markdown(), "\n");
    }

    #[test]
    fn front_matter_is_prepended() {
        let d = doc(&["Body"]);
        let md = d.export_to_markdown_with(&ExportOptions {
            page_separator: PageSeparator::None,
            include_metadata: true,
        });
        assert!(md.starts_with("---\ntitle: \"Nutzungsplan\"\n"));
        assert!(md.ends_with("---\n\nBody\n"));
    }

    #[test]
    fn export_is_deterministic() {
        let d = doc(&["A  b", "c"]);
        assert_eq!(d.export_to_markdown(), d.export_to_markdown());
    }
}
