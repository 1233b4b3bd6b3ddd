//! CLI output formatting for build and check runs.
//!
//! # Information-First Display
//!
//! Each document is listed by its card title, with the source file and card
//! location as indented context lines. Documents without a title show their
//! source filename in parentheses instead.
//!
//! ```text
//! 001 Hello World
//!     Source: index.html
//!     Description: A page about greetings
//!     Card: public/og/index.png → https://x.example/index.png
//! 002 (draft.html)
//!     Skipped: no contents
//! 003 (broken.html)
//!     Failed at load background: Failed to read background image bg.png: ...
//!
//! Rendered 1 card, 1 skipped, 1 failed
//! Background: 1 cached, 1 decoded (2 total)
//! ```
//!
//! # Architecture
//!
//! `format_*` functions return `Vec<String>` and do no I/O; `print_*` wrappers
//! write their lines to stdout.

use std::path::Path;

use crate::report::{BuildReport, DocumentRecord, DocumentStatus, ReportCounts};
use crate::types::CardRef;

const MAX_DESCRIPTION: usize = 72;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Header line: titled documents show the title, untitled show the filename.
///
/// ```text
/// 001 Hello World
/// 002 (draft.html)
/// ```
fn document_header(index: usize, title: Option<&str>, source: &Path) -> String {
    match title {
        Some(t) if !t.is_empty() => format!("{} {}", format_index(index), t),
        _ => {
            let filename = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| source.display().to_string());
            format!("{} ({})", format_index(index), filename)
        }
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((byte, _)) => format!("{}...", &text[..byte]),
    }
}

fn card_line(card: &CardRef) -> String {
    format!("Card: {} → {}", card.path.display(), card.url)
}

/// Lines for one document record.
pub fn format_document(index: usize, record: &DocumentRecord) -> Vec<String> {
    let mut lines = vec![document_header(index, record.title(), &record.source)];
    let ctx = indent(1);
    lines.push(format!("{}Source: {}", ctx, record.source.display()));

    match &record.status {
        DocumentStatus::Rendered {
            description, card, ..
        }
        | DocumentStatus::Planned {
            description, card, ..
        } => {
            if !description.is_empty() {
                lines.push(format!(
                    "{}Description: {}",
                    ctx,
                    truncate_desc(description, MAX_DESCRIPTION)
                ));
            }
            lines.push(format!("{}{}", ctx, card_line(card)));
        }
        DocumentStatus::Skipped => {
            lines.push(format!("{}Skipped: no contents", ctx));
        }
        DocumentStatus::Failed { stage, message } => {
            lines.push(format!("{}Failed at {}: {}", ctx, stage, message));
        }
    }
    lines
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// One-line summary of a run.
pub fn format_summary(counts: &ReportCounts) -> String {
    let mut parts = Vec::new();
    if counts.planned > 0 {
        parts.push(format!("Checked {}", plural(counts.planned, "document")));
    }
    if counts.rendered > 0 || counts.planned == 0 {
        parts.push(format!("Rendered {}", plural(counts.rendered, "card")));
    }
    if counts.skipped > 0 {
        parts.push(format!("{} skipped", counts.skipped));
    }
    if counts.failed > 0 {
        parts.push(format!("{} failed", counts.failed));
    }
    parts.join(", ")
}

/// Full report: every document, a blank line, the summary and cache stats.
pub fn format_report(report: &BuildReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .documents
        .iter()
        .enumerate()
        .flat_map(|(i, record)| format_document(i + 1, record))
        .collect();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    let counts = report.counts();
    lines.push(format_summary(&counts));
    if counts.planned == 0 {
        lines.push(format!("Background: {}", report.cache));
    }
    lines
}

pub fn print_report(report: &BuildReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}
