//! Markdown cleanup: deterministic normalisation of extracted page text.
//!
//! PDF text layers come back with platform line endings, non-breaking
//! spaces, runs of padding spaces used for visual alignment, and invisible
//! characters (soft hyphens, zero-width joiners, BOMs). None of those carry
//! meaning in Markdown, and several of them break diffs between two runs on
//! the same input. The rules below are pure `&str → String` passes applied in
//! a fixed order:
//!
//! 1. Normalise line endings (CRLF / CR → LF)
//! 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens, …)
//! 3. Replace non-breaking spaces and collapse horizontal whitespace runs
//! 4. Trim trailing whitespace per line
//! 5. Collapse 3+ consecutive blank lines down to 2
//! 6. Ensure the text ends with exactly one newline
//!
//! Line endings must be fixed first so the whitespace rule never sees a
//! stray `\r`, and invisible characters are removed before whitespace is
//! collapsed so `a \u{200B} b` ends up as `a b`.

use crate::document::DocumentMetadata;
use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to one page (or a whole assembled document).
pub fn clean_markdown(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = collapse_horizontal_whitespace(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    ensure_final_newline(&s)
}

/// Like [`clean_markdown`] but without forcing a trailing newline, for page
/// bodies that are later joined with separators.
pub fn clean_fragment(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = collapse_horizontal_whitespace(&s);
    let s = trim_trailing_whitespace(&s);
    collapse_blank_lines(&s).trim_matches('\n').to_string()
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 3: Horizontal whitespace ────────────────────────────────────────────

static RE_HSPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\x0B\x0C]{2,}|[\t\x0B\x0C]").unwrap());

fn collapse_horizontal_whitespace(input: &str) -> String {
    let s = input.replace('\u{00A0}', " ");
    // Leading indentation is kept so indented code-like blocks survive.
    s.lines()
        .map(|line| {
            let body = line.trim_start_matches(' ');
            let indent = &line[..line.len() - body.len()];
            format!("{}{}", indent, RE_HSPACE.replace_all(body, " "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 5: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}

// ── Rule 6: Ensure file ends with single newline ─────────────────────────────

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}

// ── Front matter ─────────────────────────────────────────────────────────────

/// Format document metadata as YAML front matter.
pub fn format_yaml_front_matter(meta: &DocumentMetadata) -> String {
    let mut yaml = String::from("---\n");

    let fields = [
        ("title", &meta.title),
        ("author", &meta.author),
        ("subject", &meta.subject),
        ("creator", &meta.creator),
        ("producer", &meta.producer),
    ];
    for (key, value) in fields {
        if let Some(v) = value {
            yaml.push_str(&format!("{}: \"{}\"\n", key, yaml_escape(v)));
        }
    }
    yaml.push_str(&format!("pages: {}\n", meta.page_count));
    if !meta.pdf_version.is_empty() {
        yaml.push_str(&format!("pdf_version: \"{}\"\n", yaml_escape(&meta.pdf_version)));
    }

    yaml.push_str("---\n\n");
    yaml
}

fn yaml_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

// ── Tests ────────────────────────────────────────────────────────────────────
