//! Configuration types for batch PDF-to-Markdown conversion.
//!
//! A run is described by a [`BatchConfig`], built via its
//! [`BatchConfigBuilder`] and handed to [`crate::batch::run_batch`] together
//! with the converter. Markdown export settings live in [`ExportOptions`],
//! which belong to the converter rather than to the driver.

use crate::error::BatchError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Input directory used when none is given.
pub const DEFAULT_INPUT_DIR: &str = "./data/VP_OP";

/// Output directory used when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "./out_markdown";

/// File-name pattern selecting the documents of a batch.
pub const DEFAULT_PATTERN: &str = "*.pdf";

/// Configuration for one batch run.
///
/// # Example
/// ```rust
/// use pdf4markdown::{BatchConfig, FailurePolicy};
///
/// let config = BatchConfig::builder()
///     .input_dir("./data/VP_OP")
///     .output_dir("/tmp/out_markdown")
///     .failure_policy(FailurePolicy::Abort)
///     .build()
///     .unwrap();
/// assert_eq!(config.pattern, "*.pdf");
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Directory scanned (non-recursively) for input documents.
    pub input_dir: PathBuf,

    /// Directory receiving one `<stem>.md` per input. Created with all
    /// parents if missing.
    pub output_dir: PathBuf,

    /// Case-sensitive glob matched against file names. Default: `*.pdf`.
    pub pattern: String,

    /// What to do when a file fails. Default: [`FailurePolicy::Abort`].
    pub failure_policy: FailurePolicy,

    /// Optional receiver for per-file progress notices.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            pattern: DEFAULT_PATTERN.to_string(),
            failure_policy: FailurePolicy::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("pattern", &self.pattern)
            .field("failure_policy", &self.failure_policy)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }

    /// Shorthand for a config with default settings and the given directories.
    pub fn new(input_dir: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Self {
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.pattern = pattern.into();
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, BatchError> {
        let c = &self.config;
        if c.pattern.trim().is_empty() {
            return Err(BatchError::InvalidConfig(
                "File pattern must not be empty".into(),
            ));
        }
        if let Err(e) = glob::Pattern::new(&c.pattern) {
            return Err(BatchError::InvalidConfig(format!(
                "Invalid file pattern '{}': {}",
                c.pattern, e
            )));
        }
        if c.input_dir.as_os_str().is_empty() || c.output_dir.as_os_str().is_empty() {
            return Err(BatchError::InvalidConfig(
                "Input and output directories must be set".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the driver reacts when one file of the batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Stop at the first failing file; later files are never attempted. (default)
    #[default]
    Abort,
    /// Record the failure, continue with the next file, and report
    /// [`BatchError::PartialFailure`] once the batch is done.
    KeepGoing,
}

/// Settings for [`crate::document::StructuredDocument::export_to_markdown_with`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Separator inserted between pages. Default: [`PageSeparator::None`].
    pub page_separator: PageSeparator,
    /// Prepend YAML front matter with document metadata. Default: false.
    pub include_metadata: bool,
}

/// How to separate pages in the exported Markdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSeparator {
    /// No separator; pages joined with "\n\n". (default)
    #[default]
    None,
    /// Horizontal rule: "\n\n---\n\n"
    HorizontalRule,
    /// HTML comment with page number: "<!-- page N -->"
    Comment,
    /// Custom string inserted between pages.
    Custom(String),
}

impl PageSeparator {
    /// Render the separator string for the given page number (1-indexed).
    pub fn render(&self, page_num: usize) -> String {
        match self {
            PageSeparator::None => "\n\n".to_string(),
            PageSeparator::HorizontalRule => "\n\n---\n\n".to_string(),
            PageSeparator::Comment => format!("\n\n<!-- page {} -->\n\n", page_num),
            PageSeparator::Custom(s) => format!("\n\n{}\n\n", s),
        }
    }

    /// Parse a user-facing separator name: `none`, `hr`/`---`, `comment`,
    /// anything else is taken literally.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => PageSeparator::None,
            "hr" | "---" => PageSeparator::HorizontalRule,
            "comment" => PageSeparator::Comment,
            _ => PageSeparator::Custom(s.trim().to_string()),
        }
    }
}
