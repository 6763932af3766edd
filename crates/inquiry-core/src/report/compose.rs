//! Local report composition.
//!
//! `compose` is a pure function of the session and the settings. Sections are
//! emitted in canonical order and skipped when switched off or empty.

use super::section::SectionKind;
use super::settings::{Language, ReportFormat, ReportSettings, ReportStyle};
use crate::session::{Priority, ResearchSession};
use strum::IntoEnumIterator;

/// Body of one section before it is rendered into a concrete format.
#[derive(Debug, Clone, PartialEq)]
enum Block {
    Bullets(Vec<Entry>),
    Numbered(Vec<String>),
    /// Labelled paragraphs, e.g. notes categories.
    Labelled(Vec<Entry>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    label: Option<String>,
    text: String,
}

impl Entry {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            label: None,
            text: text.into(),
        }
    }

    fn labelled(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            text: text.into(),
        }
    }
}

/// Builds the report document from session fields.
pub fn compose(session: &ResearchSession, settings: &ReportSettings) -> String {
    let language = settings.language;
    let title = format!("{}: {}", document_title(settings.style, language), session.topic.trim());
    let sections: Vec<(&'static str, Block)> = SectionKind::iter()
        .filter(|kind| settings.includes(*kind))
        .filter_map(|kind| section_block(kind, session, language).map(|b| (kind.title(language), b)))
        .collect();

    match settings.format {
        ReportFormat::Markdown => render_markdown(&title, &sections),
        ReportFormat::Plain => render_plain(&title, &sections),
        ReportFormat::Html => render_html(&title, &sections),
    }
}

fn document_title(style: ReportStyle, language: Language) -> &'static str {
    match (style, language) {
        (ReportStyle::Academic, Language::Ru) => "Исследовательский отчёт",
        (ReportStyle::Academic, Language::En) => "Research Report",
        (ReportStyle::Business, Language::Ru) => "Аналитическая записка",
        (ReportStyle::Business, Language::En) => "Business Brief",
        (ReportStyle::Informal, Language::Ru) => "Что удалось выяснить",
        (ReportStyle::Informal, Language::En) => "What I Found Out",
    }
}

fn priority_marker(priority: Priority, language: Language) -> &'static str {
    match (priority, language) {
        (Priority::High, Language::Ru) => "высокий",
        (Priority::Medium, Language::Ru) => "средний",
        (Priority::Low, Language::Ru) => "низкий",
        (Priority::High, Language::En) => "high",
        (Priority::Medium, Language::En) => "medium",
        (Priority::Low, Language::En) => "low",
    }
}

fn strengths_labels(language: Language) -> (&'static str, &'static str) {
    match language {
        Language::Ru => ("Сильные стороны", "Слабые стороны"),
        Language::En => ("Strengths", "Weaknesses"),
    }
}

/// The section body, or `None` when the underlying data is empty.
fn section_block(kind: SectionKind, session: &ResearchSession, language: Language) -> Option<Block> {
    let analysis = &session.analysis;
    let block = match kind {
        SectionKind::Goals => Block::Bullets(lines(&session.goals).map(Entry::plain).collect()),
        SectionKind::Tasks => Block::Numbered(lines(&session.tasks).collect()),
        SectionKind::KeyTerms => Block::Bullets(
            analysis
                .key_terms
                .iter()
                .filter(|t| !t.term.trim().is_empty())
                .map(|t| Entry::labelled(single_line(&t.term), single_line(&t.definition)))
                .collect(),
        ),
        SectionKind::Approaches => Block::Bullets(
            analysis
                .approaches
                .iter()
                .filter(|a| !a.name.trim().is_empty())
                .map(|a| Entry::labelled(single_line(&a.name), single_line(&a.description)))
                .collect(),
        ),
        SectionKind::Comparison => Block::Text(analysis.comparison.trim().to_string()),
        SectionKind::StrengthsWeaknesses => {
            let (strengths, weaknesses) = strengths_labels(language);
            Block::Labelled(
                [(strengths, &analysis.strengths), (weaknesses, &analysis.weaknesses)]
                    .into_iter()
                    .filter(|(_, text)| !text.trim().is_empty())
                    .map(|(label, text)| Entry::labelled(label, text.trim()))
                    .collect(),
            )
        }
        SectionKind::OwnPosition => Block::Text(analysis.own_position.trim().to_string()),
        SectionKind::Notes => Block::Labelled(
            session
                .notes_categories
                .iter()
                .filter(|(_, c)| !c.content.trim().is_empty())
                .map(|(_, c)| Entry::labelled(single_line(&c.name), c.content.trim()))
                .collect(),
        ),
        SectionKind::Recommendations => Block::Bullets(
            session
                .recommendations
                .iter()
                .filter(|r| !r.text.trim().is_empty())
                .map(|r| {
                    Entry::plain(format!(
                        "[{}] {}",
                        priority_marker(r.priority, language),
                        single_line(&r.text)
                    ))
                })
                .collect(),
        ),
    };

    let empty = match &block {
        Block::Bullets(entries) | Block::Labelled(entries) => entries.is_empty(),
        Block::Numbered(items) => items.is_empty(),
        Block::Text(text) => text.is_empty(),
    };
    (!empty).then_some(block)
}

fn lines(items: &[String]) -> impl Iterator<Item = String> + '_ {
    items
        .iter()
        .map(|item| single_line(item))
        .filter(|item| !item.is_empty())
}

/// Collapses internal line breaks so list items stay on one line.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escapes leading `#` in free text so user content never reads as a heading.
fn escape_markdown_block(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                format!("\\{}", line.trim_start())
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_markdown(title: &str, sections: &[(&str, Block)]) -> String {
    let mut out = format!("# {title}\n\n");
    for (heading, block) in sections {
        out.push_str(&format!("## {heading}\n\n"));
        let body = match block {
            Block::Bullets(entries) => entries
                .iter()
                .map(|e| match &e.label {
                    Some(label) if e.text.is_empty() => format!("- **{label}**"),
                    Some(label) => format!("- **{label}**: {}", e.text),
                    None => format!("- {}", e.text),
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Numbered(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| format!("{}. {item}", i + 1))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Labelled(entries) => entries
                .iter()
                .map(|e| match &e.label {
                    Some(label) => format!("**{label}**\n\n{}", escape_markdown_block(&e.text)),
                    None => escape_markdown_block(&e.text),
                })
                .collect::<Vec<_>>()
                .join("\n\n"),
            Block::Text(text) => escape_markdown_block(text),
        };
        out.push_str(&body);
        out.push_str("\n\n");
    }
    finish(out)
}

fn render_plain(title: &str, sections: &[(&str, Block)]) -> String {
    let mut out = format!("{title}\n{}\n\n", "=".repeat(title.chars().count()));
    for (heading, block) in sections {
        out.push_str(&format!("{heading}\n{}\n\n", "-".repeat(heading.chars().count())));
        let body = match block {
            Block::Bullets(entries) => entries
                .iter()
                .map(|e| match &e.label {
                    Some(label) if e.text.is_empty() => format!("- {label}"),
                    Some(label) => format!("- {label}: {}", e.text),
                    None => format!("- {}", e.text),
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Numbered(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| format!("{}. {item}", i + 1))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Labelled(entries) => entries
                .iter()
                .map(|e| match &e.label {
                    Some(label) => format!("{label}:\n{}", e.text),
                    None => e.text.clone(),
                })
                .collect::<Vec<_>>()
                .join("\n\n"),
            Block::Text(text) => text.clone(),
        };
        out.push_str(&body);
        out.push_str("\n\n");
    }
    finish(out)
}

fn render_html(title: &str, sections: &[(&str, Block)]) -> String {
    let mut out = format!("<h1>{}</h1>\n", escape_html(title));
    for (heading, block) in sections {
        out.push_str(&format!("<h2>{}</h2>\n", escape_html(heading)));
        match block {
            Block::Bullets(entries) => {
                out.push_str("<ul>\n");
                for e in entries {
                    let item = match &e.label {
                        Some(label) if e.text.is_empty() => {
                            format!("<strong>{}</strong>", escape_html(label))
                        }
                        Some(label) => format!(
                            "<strong>{}</strong>: {}",
                            escape_html(label),
                            escape_html(&e.text)
                        ),
                        None => escape_html(&e.text),
                    };
                    out.push_str(&format!("<li>{item}</li>\n"));
                }
                out.push_str("</ul>\n");
            }
            Block::Numbered(items) => {
                out.push_str("<ol>\n");
                for item in items {
                    out.push_str(&format!("<li>{}</li>\n", escape_html(item)));
                }
                out.push_str("</ol>\n");
            }
            Block::Labelled(entries) => {
                for e in entries {
                    if let Some(label) = &e.label {
                        out.push_str(&format!("<p><strong>{}</strong></p>\n", escape_html(label)));
                    }
                    push_html_paragraphs(&mut out, &e.text);
                }
            }
            Block::Text(text) => push_html_paragraphs(&mut out, text),
        }
    }
    out
}

fn push_html_paragraphs(out: &mut String, text: &str) {
    for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        out.push_str(&format!("<p>{}</p>\n", escape_html(paragraph)));
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn finish(mut out: String) -> String {
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push('\n');
    out
}
