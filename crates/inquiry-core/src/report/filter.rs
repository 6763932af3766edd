//! Section filtering over an already generated markdown document.
//!
//! A heading line starts with `## ` or `### `. A section runs from its heading
//! line up to, but not including, the next heading line of either level, or
//! the end of the document. Only a heading whose text equals a canonical title
//! exactly marks a section for removal; everything else passes through
//! byte for byte.

use super::section::SectionKind;
use super::settings::{ReportFormat, ReportSettings};

const HEADING_MARKERS: [&str; 2] = ["## ", "### "];

/// Returns the heading text when `line` is a section heading line.
fn heading_text(line: &str) -> Option<&str> {
    HEADING_MARKERS
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(|rest| rest.trim())
}

/// Removes every section switched off in `settings`.
///
/// Idempotent: filtering the output again with the same settings returns it
/// unchanged. Documents in a format other than markdown are returned as is.
pub fn filter_sections(document: &str, settings: &ReportSettings) -> String {
    if settings.format != ReportFormat::Markdown {
        return document.to_string();
    }
    remove_sections(document, |kind| !settings.includes(kind))
}

/// Removes the sections for which `exclude` returns true.
pub fn remove_sections(document: &str, exclude: impl Fn(SectionKind) -> bool) -> String {
    let mut output = String::with_capacity(document.len());
    let mut skipping = false;

    for line in document.split_inclusive('\n') {
        if let Some(text) = heading_text(line) {
            skipping = SectionKind::from_title(text).is_some_and(&exclude);
        }
        if !skipping {
            output.push_str(line);
        }
    }
    output
}
