//! CLI binary for pdf4markdown.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `BatchConfig` / `PdfiumOptions`, prints per-file notices and a summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf4markdown::config::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR, DEFAULT_PATTERN};
use pdf4markdown::{
    run_batch, BatchConfig, BatchProgressCallback, ExportOptions, FailurePolicy, PageSeparator,
    PdfiumConverter, PdfiumOptions, ProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Console progress callback ────────────────────────────────────────────────

/// Prints the two per-file notices and, when attached to a terminal, keeps
/// an [indicatif] bar at the bottom counting finished files.
struct ConsoleProgress {
    /// `None` with `--no-progress`.
    bar: Option<ProgressBar>,
    /// Send notices to stderr (stdout carries `--json` output).
    to_stderr: bool,
}

impl ConsoleProgress {
    fn new(show_bar: bool, to_stderr: bool) -> Arc<Self> {
        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} files  \
                 ⏱ {elapsed_precise}  ETA {eta_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(style);
            bar.set_prefix("Converting");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });

        Arc::new(Self { bar, to_stderr })
    }

    /// Clear the bar; safe to call more than once.
    fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }

    /// Print one notice line. The bar is suspended while printing so the
    /// line lands on the same stream whether or not the bar is drawn.
    fn notice(&self, line: String) {
        let print = || {
            if self.to_stderr {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        };
        match self.bar {
            Some(ref bar) => bar.suspend(print),
            None => print(),
        }
    }
}

/// `Converting <file name> ...`
fn converting_line(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    format!("Converting {name} ...")
}

/// `  -> wrote <output path>`
fn wrote_line(output: &Path) -> String {
    format!("  -> wrote {}", output.display())
}

impl BatchProgressCallback for ConsoleProgress {
    fn on_batch_start(&self, total_files: usize) {
        if let Some(ref bar) = self.bar {
            bar.set_length(total_files as u64);
            bar.reset_eta();
        }
    }

    fn on_file_start(&self, _index: usize, _total: usize, input: &Path) {
        self.notice(converting_line(input));
    }

    fn on_file_written(&self, _index: usize, _total: usize, output: &Path, _bytes: usize) {
        self.notice(wrote_line(output));
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    fn on_file_error(&self, _index: usize, _total: usize, input: &Path, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 100 {
            format!("{}\u{2026}", error.chars().take(99).collect::<String>())
        } else {
            error.to_string()
        };
        self.notice(format!("  {} {}  {}", red("✗"), input.display(), red(&msg)));
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    fn on_batch_complete(&self, _total_files: usize, _success_count: usize) {
        self.finish();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert ./data/VP_OP/*.pdf into ./out_markdown/
  pdf4markdown

  # Explicit directories
  pdf4markdown ./scans ~/tmp/out_markdown

  # Only some files, continue past broken ones
  pdf4markdown --pattern 'VP_OP_*.pdf' --keep-going ./data ./out

  # Page markers and YAML front matter
  pdf4markdown --separator comment --metadata ./data ./out

  # Machine-readable report
  pdf4markdown --json ./data ./out > report.json

BEHAVIOUR:
  Files are processed one at a time in file-name order. Each input
  <name>.pdf produces <output-dir>/<name>.md; existing files with that name
  are overwritten, other files in the output directory are left alone.
  By default the first failing file stops the run (exit code 1).

OUTPUT:
  The per-file notices ("Converting X ..." / "  -> wrote Y") go to stdout,
  or to stderr with --json. The progress bar and summary line use stderr.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
  PDF4MD_INPUT_DIR        Default input directory
  PDF4MD_OUTPUT_DIR       Default output directory
  RUST_LOG                Override log filter (e.g. pdf4markdown=debug)
"#;

/// Batch-convert a directory of PDFs to Markdown files.
#[derive(Parser, Debug)]
#[command(
    name = "pdf4markdown",
    version,
    about = "Batch-convert a directory of PDF files to Markdown",
    long_about = "Convert every PDF in a directory into a Markdown file of the same name \
in an output directory, one file at a time, in file-name order.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the PDFs (not searched recursively).
    #[arg(env = "PDF4MD_INPUT_DIR", default_value = DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,

    /// Directory receiving the Markdown files (created if missing).
    #[arg(env = "PDF4MD_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Case-sensitive file-name pattern selecting the inputs.
    #[arg(long, env = "PDF4MD_PATTERN", default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Continue with the next file when one fails; exit non-zero at the end.
    #[arg(short = 'k', long, env = "PDF4MD_KEEP_GOING")]
    keep_going: bool,

    /// Page separator: none, hr, comment, or custom string.
    #[arg(long, env = "PDF4MD_SEPARATOR", default_value = "none")]
    separator: String,

    /// Prepend YAML front-matter with document metadata.
    #[arg(long, env = "PDF4MD_METADATA")]
    metadata: bool,

    /// PDF user password applied to encrypted documents.
    #[arg(long, env = "PDF4MD_PASSWORD")]
    password: Option<String>,

    /// Path to libpdfium (file or directory). Overrides PDFIUM_LIB_PATH.
    #[arg(long)]
    pdfium_lib: Option<PathBuf>,

    /// Print the batch report as JSON on stdout.
    #[arg(long, env = "PDF4MD_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF4MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF4MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF4MD_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The per-file notices already tell the user what is happening, so
    // library INFO logs are only shown with --no-progress.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config and converter ───────────────────────────────────────
    let console = (!cli.quiet).then(|| ConsoleProgress::new(show_progress, cli.json));
    let progress_cb: Option<ProgressCallback> = console
        .as_ref()
        .map(|c| Arc::clone(c) as Arc<dyn BatchProgressCallback>);

    let config = build_config(&cli, progress_cb)?;

    let converter = PdfiumConverter::new(PdfiumOptions {
        password: cli.password.clone(),
        export: ExportOptions {
            page_separator: PageSeparator::parse(&cli.separator),
            include_metadata: cli.metadata,
        },
        library_path: cli.pdfium_lib.clone(),
    })
    .context("Failed to initialise the PDF engine")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let result = run_batch(&config, &converter);
    // An aborted batch never reaches on_batch_complete.
    if let Some(ref c) = console {
        c.finish();
    }
    let report = result.context("Batch conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    }

    if !cli.quiet {
        let total = report.files.len();
        let failed = report.failed();
        let mark = if failed == 0 {
            green("✔")
        } else if failed == total {
            red("✘")
        } else {
            cyan("⚠")
        };
        eprintln!(
            "{}  {}/{} files  {}  {}ms  →  {}",
            mark,
            report.written(),
            total,
            dim(&format!("{} bytes", report.total_bytes())),
            report.total_duration_ms,
            bold(&report.output_dir.display().to_string()),
        );
    }

    report.into_result().context("Some files could not be converted")?;
    Ok(())
}

/// Map CLI args to `BatchConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<BatchConfig> {
    let mut builder = BatchConfig::builder()
        .input_dir(&cli.input_dir)
        .output_dir(&cli.output_dir)
        .pattern(cli.pattern.clone())
        .failure_policy(if cli.keep_going {
            FailurePolicy::KeepGoing
        } else {
            FailurePolicy::Abort
        });

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
