//! The batch driver: directory in, one Markdown file per PDF out.
//!
//! ```text
//! input_dir ──▶ discover ──▶ sort ──▶ for each file:
//!                                       convert ──▶ export ──▶ write <stem>.md
//! ```
//!
//! Files are processed strictly one after another. Each one is fully
//! converted and written before the next is touched, so an interrupted run
//! leaves complete outputs for every file processed so far and nothing for
//! the rest.

use crate::config::{BatchConfig, FailurePolicy};
use crate::converter::DocumentConverter;
use crate::error::BatchError;
use crate::output::{BatchReport, FileOutcome};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Convert every document in `config.input_dir` matching `config.pattern`
/// into `config.output_dir/<stem>.md`.
///
/// # Order of operations
/// 1. The input directory must exist, otherwise
///    [`BatchError::InputDirNotFound`] is returned before anything is created.
/// 2. The output directory is created with all parents (no-op if present).
/// 3. Matching files are listed (non-recursive, case-sensitive) and sorted by
///    file name.
/// 4. Each file is converted, exported to Markdown and written, overwriting
///    any previous output with the same stem. Unrelated files in the output
///    directory are never touched.
///
/// # Errors
/// With [`FailurePolicy::Abort`] (default) the first failing file ends the
/// run with its error; later files are never attempted. With
/// [`FailurePolicy::KeepGoing`] failures are recorded in the returned
/// [`BatchReport`]; use [`BatchReport::into_result`] to turn them into
/// [`BatchError::PartialFailure`].
pub fn run_batch<C>(config: &BatchConfig, converter: &C) -> Result<BatchReport, BatchError>
where
    C: DocumentConverter + ?Sized,
{
    let start = Instant::now();
    info!(
        "Starting batch: {} → {}",
        config.input_dir.display(),
        config.output_dir.display()
    );

    check_input_dir(&config.input_dir)?;
    ensure_output_dir(&config.output_dir)?;

    let inputs = discover_inputs(&config.input_dir, &config.pattern)?;
    let total = inputs.len();
    info!("Found {} files matching '{}'", total, config.pattern);

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut files = Vec::with_capacity(total);

    for (i, input) in inputs.iter().enumerate() {
        let index = i + 1;
        let output = output_path_for(&config.output_dir, input);

        info!("Converting {} ...", display_name(input));
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_start(index, total, input);
        }

        match convert_one(converter, input, &output) {
            Ok((page_count, bytes_written)) => {
                info!("  -> wrote {}", output.display());
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_written(index, total, &output, bytes_written);
                }
                files.push(FileOutcome {
                    input: input.clone(),
                    output,
                    page_count,
                    bytes_written,
                    error: None,
                });
            }
            Err(e) => {
                let message = describe(&e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_error(index, total, input, &message);
                }
                match config.failure_policy {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::KeepGoing => {
                        warn!("Skipping {}: {}", input.display(), message);
                        files.push(FileOutcome {
                            input: input.clone(),
                            output,
                            page_count: 0,
                            bytes_written: 0,
                            error: Some(message),
                        });
                    }
                }
            }
        }
    }

    let report = BatchReport {
        input_dir: config.input_dir.clone(),
        output_dir: config.output_dir.clone(),
        files,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Batch complete: {}/{} files, {}ms total",
        report.written(),
        total,
        report.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, report.written());
    }

    Ok(report)
}

impl BatchReport {
    /// Treat any failed file as an error.
    pub fn into_result(self) -> Result<BatchReport, BatchError> {
        match self.failed() {
            0 => Ok(self),
            failed => Err(BatchError::PartialFailure {
                failed,
                total: self.files.len(),
            }),
        }
    }
}

/// List the files in `dir` whose name matches `pattern`, sorted by name.
///
/// Matching is case-sensitive and never descends into subdirectories;
/// entries that are not regular files (directories named `x.pdf`, broken
/// symlinks) are skipped.
pub fn discover_inputs(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, BatchError> {
    let matcher = glob::Pattern::new(pattern).map_err(|e| {
        BatchError::InvalidConfig(format!("Invalid file pattern '{}': {}", pattern, e))
    })?;
    let options = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let read_err = |source| BatchError::ReadDirFailed {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let name = entry.file_name();
        if !matcher.matches_with(&name.to_string_lossy(), options) {
            continue;
        }

        let path = entry.path();
        if !path.is_file() {
            warn!("Skipping matching entry that is not a file: {}", path.display());
            continue;
        }
        files.push(path);
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Discovered {} inputs in {}", files.len(), dir.display());
    Ok(files)
}

/// Destination for `input`: `output_dir` joined with `<stem>.md`.
pub fn output_path_for(output_dir: &Path, input: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".md");
    output_dir.join(name)
}

/// Write `markdown` to `path` as UTF-8, replacing any existing file.
///
/// The text goes to a uniquely named temporary file in the same directory
/// and is persisted over `path`, so a crash mid-write never leaves a
/// truncated `.md` behind and no other file in the directory is touched.
pub fn write_markdown(path: &Path, markdown: &str) -> Result<(), BatchError> {
    let write_err = |source| BatchError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(markdown.as_bytes()).map_err(write_err)?;
    // On failure the returned handle still owns the temp file and removes it on drop.
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn check_input_dir(dir: &Path) -> Result<(), BatchError> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(BatchError::InputNotADirectory {
            path: dir.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(BatchError::InputDirNotFound {
            path: dir.to_path_buf(),
        }),
        Err(source) => Err(BatchError::ReadDirFailed {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

fn ensure_output_dir(dir: &Path) -> Result<(), BatchError> {
    std::fs::create_dir_all(dir).map_err(|source| BatchError::OutputDirCreateFailed {
        path: dir.to_path_buf(),
        source,
    })
}

/// Convert, export and write a single file. Returns `(pages, bytes)`.
fn convert_one<C>(converter: &C, input: &Path, output: &Path) -> Result<(usize, usize), BatchError>
where
    C: DocumentConverter + ?Sized,
{
    let document = converter
        .convert(input)
        .map_err(|source| BatchError::Conversion {
            path: input.to_path_buf(),
            source,
        })?;

    let markdown = document.export_to_markdown();
    write_markdown(output, &markdown)?;

    Ok((document.page_count(), markdown.len()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Error message including its source chain, on one line.
fn describe(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        msg.push_str(": ");
        msg.push_str(&s.to_string());
        source = s.source();
    }
    msg
}
