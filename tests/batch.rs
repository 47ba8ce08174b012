//! Integration tests for the batch driver.
//!
//! A scripted in-memory converter stands in for pdfium: each "PDF" is a
//! plain text file whose content becomes the page text, and any file whose
//! text starts with `FAIL` makes the converter return an error. No pdfium
//! library is needed to run these.

use pdf4markdown::{
    run_batch, BatchConfig, BatchError, BatchProgressCallback, ConversionError,
    DocumentConverter, DocumentMetadata, FailurePolicy, Page, StructuredDocument,
};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

// ── Test doubles ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct ScriptedConverter {
    attempted: Mutex<Vec<String>>,
}

impl ScriptedConverter {
    fn attempted(&self) -> Vec<String> {
        self.attempted.lock().unwrap().clone()
    }
}

impl DocumentConverter for ScriptedConverter {
    fn convert(&self, path: &Path) -> Result<StructuredDocument, ConversionError> {
        self.attempted.lock().unwrap().push(file_name(path));

        let text = std::fs::read_to_string(path).map_err(|e| ConversionError::Other(e.to_string()))?;
        if text.starts_with("FAIL") {
            return Err(ConversionError::CorruptPdf {
                path: path.to_path_buf(),
                detail: "scripted failure".into(),
            });
        }

        let metadata = DocumentMetadata {
            page_count: 1,
            ..DocumentMetadata::default()
        };
        Ok(StructuredDocument::new(path, metadata, vec![Page::new(1, text)]))
    }
}

#[derive(Default)]
struct RecordingProgress {
    events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl BatchProgressCallback for RecordingProgress {
    fn on_batch_start(&self, total_files: usize) {
        self.push(format!("start {total_files}"));
    }

    fn on_file_start(&self, index: usize, total: usize, input: &Path) {
        self.push(format!("converting {index}/{total} {}", file_name(input)));
    }

    fn on_file_written(&self, index: usize, total: usize, output: &Path, _bytes: usize) {
        self.push(format!("wrote {index}/{total} {}", file_name(output)));
    }

    fn on_file_error(&self, index: usize, total: usize, input: &Path, _error: &str) {
        self.push(format!("error {index}/{total} {}", file_name(input)));
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        self.push(format!("done {success_count}/{total_files}"));
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Route library logs through the test harness; `RUST_LOG` overrides.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pdf4markdown=debug")),
        )
        .with_test_writer()
        .try_init();
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

fn write_inputs(dir: &Path, files: &[(&str, &str)]) {
    std::fs::create_dir_all(dir).unwrap();
    for (name, text) in files {
        std::fs::write(dir.join(name), text).unwrap();
    }
}

/// Sorted file names in `dir`.
fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn read(path: PathBuf) -> String {
    std::fs::read_to_string(path).unwrap()
}

struct Fixture {
    _tmp: TempDir,
    input: PathBuf,
    output: PathBuf,
}

fn fixture(files: &[(&str, &str)]) -> Fixture {
    init_logging();
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("in");
    let output = tmp.path().join("nested").join("out");
    write_inputs(&input, files);
    Fixture {
        _tmp: tmp,
        input,
        output,
    }
}

// ── Happy path ───────────────────────────────────────────────────────────────

#[test]
fn one_markdown_file_per_pdf_with_matching_stem() {
    let fx = fixture(&[
        ("report.pdf", "Quarterly report"),
        ("plan.v2.pdf", "Plan, second draft"),
        ("notes.txt", "not a pdf"),
        ("SCAN.PDF", "wrong case"),
    ]);
    let converter = ScriptedConverter::default();

    let report = run_batch(&BatchConfig::new(&fx.input, &fx.output), &converter).unwrap();

    assert_eq!(listing(&fx.output), vec!["plan.v2.md", "report.md"]);
    assert_eq!(read(fx.output.join("report.md")), "Quarterly report\n");
    assert_eq!(read(fx.output.join("plan.v2.md")), "Plan, second draft\n");
    assert_eq!(report.written(), 2);
    assert_eq!(report.failed(), 0);
}

#[test]
fn files_are_processed_in_name_order() {
    let fx = fixture(&[("b.pdf", "B"), ("c.pdf", "C"), ("a.pdf", "A")]);
    let converter = ScriptedConverter::default();
    let progress = Arc::new(RecordingProgress::default());
    let config = BatchConfig::builder()
        .input_dir(&fx.input)
        .output_dir(&fx.output)
        .progress_callback(progress.clone())
        .build()
        .unwrap();

    let report = run_batch(&config, &converter).unwrap();

    assert_eq!(converter.attempted(), vec!["a.pdf", "b.pdf", "c.pdf"]);
    assert_eq!(
        progress.events(),
        vec![
            "start 3",
            "converting 1/3 a.pdf",
            "wrote 1/3 a.md",
            "converting 2/3 b.pdf",
            "wrote 2/3 b.md",
            "converting 3/3 c.pdf",
            "wrote 3/3 c.md",
            "done 3/3",
        ]
    );
    let outputs: Vec<String> = report.files.iter().map(|f| file_name(&f.output)).collect();
    assert_eq!(outputs, vec!["a.md", "b.md", "c.md"]);
}

#[test]
fn utf8_text_survives_unchanged() {
    let fx = fixture(&[("zh.pdf", "Zürich – Lötschberg\nSeite 2")]);
    let converter = ScriptedConverter::default();

    run_batch(&BatchConfig::new(&fx.input, &fx.output), &converter).unwrap();

    assert_eq!(read(fx.output.join("zh.md")), "Zürich – Lötschberg\nSeite 2\n");
}

#[test]
fn second_run_produces_identical_output() {
    let fx = fixture(&[("a.pdf", "Alpha"), ("b.pdf", "Beta")]);
    let converter = ScriptedConverter::default();
    let config = BatchConfig::new(&fx.input, &fx.output);

    run_batch(&config, &converter).unwrap();
    let first: Vec<String> = listing(&fx.output)
        .iter()
        .map(|n| read(fx.output.join(n)))
        .collect();

    run_batch(&config, &converter).unwrap();
    let second: Vec<String> = listing(&fx.output)
        .iter()
        .map(|n| read(fx.output.join(n)))
        .collect();

    assert_eq!(listing(&fx.output), vec!["a.md", "b.md"]);
    assert_eq!(first, second);
}

// ── Output directory handling ────────────────────────────────────────────────

#[test]
fn existing_output_is_overwritten_and_other_files_kept() {
    let fx = fixture(&[("a.pdf", "fresh")]);
    write_inputs(
        &fx.output,
        &[("a.md", "stale content\n"), ("README.txt", "keep me")],
    );
    let converter = ScriptedConverter::default();

    run_batch(&BatchConfig::new(&fx.input, &fx.output), &converter).unwrap();

    assert_eq!(read(fx.output.join("a.md")), "fresh\n");
    assert_eq!(read(fx.output.join("README.txt")), "keep me");
    assert_eq!(listing(&fx.output), vec!["README.txt", "a.md"]);
}

#[test]
fn unrelated_tmp_file_in_output_dir_is_left_alone() {
    let fx = fixture(&[("a.pdf", "fresh")]);
    write_inputs(&fx.output, &[("a.md.tmp", "user notes")]);
    let converter = ScriptedConverter::default();

    run_batch(&BatchConfig::new(&fx.input, &fx.output), &converter).unwrap();

    assert_eq!(listing(&fx.output), vec!["a.md", "a.md.tmp"]);
    assert_eq!(read(fx.output.join("a.md.tmp")), "user notes");
    assert_eq!(read(fx.output.join("a.md")), "fresh\n");
}

#[test]
fn empty_input_dir_still_creates_output_dir() {
    let fx = fixture(&[("readme.txt", "no pdfs here")]);
    let converter = ScriptedConverter::default();
    assert!(!fx.output.exists());

    let report = run_batch(&BatchConfig::new(&fx.input, &fx.output), &converter).unwrap();

    assert!(fx.output.is_dir());
    assert!(listing(&fx.output).is_empty());
    assert!(report.files.is_empty());
    assert!(converter.attempted().is_empty());
}

// ── Failures ─────────────────────────────────────────────────────────────────

#[test]
fn missing_input_dir_fails_before_creating_output() {
    init_logging();
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("does-not-exist");
    let output = tmp.path().join("out");
    let converter = ScriptedConverter::default();

    let err = run_batch(&BatchConfig::new(&input, &output), &converter).unwrap_err();

    assert!(
        matches!(err, BatchError::InputDirNotFound { ref path } if *path == input),
        "got: {err:?}"
    );
    assert!(!output.exists());
}

#[test]
fn first_failure_aborts_the_run() {
    let fx = fixture(&[("a.pdf", "Alpha"), ("b.pdf", "FAIL"), ("c.pdf", "Gamma")]);
    let converter = ScriptedConverter::default();
    let progress = Arc::new(RecordingProgress::default());
    let config = BatchConfig::builder()
        .input_dir(&fx.input)
        .output_dir(&fx.output)
        .progress_callback(progress.clone())
        .build()
        .unwrap();

    let err = run_batch(&config, &converter).unwrap_err();

    match err {
        BatchError::Conversion { ref path, ref source } => {
            assert_eq!(file_name(path), "b.pdf");
            assert!(matches!(source, ConversionError::CorruptPdf { .. }));
        }
        other => panic!("expected a conversion error, got {other:?}"),
    }
    assert_eq!(converter.attempted(), vec!["a.pdf", "b.pdf"]);
    assert_eq!(listing(&fx.output), vec!["a.md"]);
    assert_eq!(
        progress.events(),
        vec![
            "start 3",
            "converting 1/3 a.pdf",
            "wrote 1/3 a.md",
            "converting 2/3 b.pdf",
            "error 2/3 b.pdf",
        ]
    );
}

#[test]
fn write_failure_aborts_the_run() {
    let fx = fixture(&[("a.pdf", "Alpha"), ("b.pdf", "Beta"), ("c.pdf", "Gamma")]);
    // A directory squatting on b's output name makes the write fail.
    std::fs::create_dir_all(fx.output.join("b.md")).unwrap();
    let converter = ScriptedConverter::default();

    let err = run_batch(&BatchConfig::new(&fx.input, &fx.output), &converter).unwrap_err();

    match err {
        BatchError::OutputWriteFailed { ref path, .. } => assert_eq!(file_name(path), "b.md"),
        other => panic!("expected a write error, got {other:?}"),
    }
    assert_eq!(converter.attempted(), vec!["a.pdf", "b.pdf"]);
    assert_eq!(listing(&fx.output), vec!["a.md", "b.md"]);
    assert_eq!(read(fx.output.join("a.md")), "Alpha\n");
    assert!(fx.output.join("b.md").is_dir());
    assert!(!fx.output.join("c.md").exists());
}

#[test]
fn keep_going_records_failures_and_converts_the_rest() {
    let fx = fixture(&[("a.pdf", "Alpha"), ("b.pdf", "FAIL"), ("c.pdf", "Gamma")]);
    let converter = ScriptedConverter::default();
    let config = BatchConfig::builder()
        .input_dir(&fx.input)
        .output_dir(&fx.output)
        .failure_policy(FailurePolicy::KeepGoing)
        .build()
        .unwrap();

    let report = run_batch(&config, &converter).unwrap();

    assert_eq!(converter.attempted(), vec!["a.pdf", "b.pdf", "c.pdf"]);
    assert_eq!(listing(&fx.output), vec!["a.md", "c.md"]);
    assert_eq!(report.written(), 2);
    assert_eq!(report.failed(), 1);

    let failed = &report.files[1];
    assert_eq!(file_name(&failed.input), "b.pdf");
    assert!(failed
        .error
        .as_deref()
        .is_some_and(|e| e.contains("scripted failure")));

    let err = report.into_result().unwrap_err();
    assert!(matches!(err, BatchError::PartialFailure { failed: 1, total: 3 }));
}
