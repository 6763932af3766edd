//! Report composition options.

use super::section::SectionKind;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportStyle {
    #[default]
    Academic,
    Business,
    Informal,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Markdown,
    Html,
    Plain,
}

/// Language of section titles and fixed report wording.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
}

/// Which sections a report contains and how it is rendered.
///
/// Every section is included by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportSettings {
    pub include_goals: bool,
    pub include_tasks: bool,
    pub include_key_terms: bool,
    pub include_approaches: bool,
    pub include_comparison: bool,
    pub include_strengths_weaknesses: bool,
    pub include_own_position: bool,
    pub include_notes: bool,
    pub include_recommendations: bool,
    pub style: ReportStyle,
    pub format: ReportFormat,
    pub language: Language,
    /// Ask the report collaborator for retrieval-augmented content instead
    /// of composing locally.
    #[serde(rename = "useRAG")]
    pub use_rag: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            include_goals: true,
            include_tasks: true,
            include_key_terms: true,
            include_approaches: true,
            include_comparison: true,
            include_strengths_weaknesses: true,
            include_own_position: true,
            include_notes: true,
            include_recommendations: true,
            style: ReportStyle::default(),
            format: ReportFormat::default(),
            language: Language::default(),
            use_rag: false,
        }
    }
}

impl ReportSettings {
    pub fn includes(&self, section: SectionKind) -> bool {
        match section {
            SectionKind::Goals => self.include_goals,
            SectionKind::Tasks => self.include_tasks,
            SectionKind::KeyTerms => self.include_key_terms,
            SectionKind::Approaches => self.include_approaches,
            SectionKind::Comparison => self.include_comparison,
            SectionKind::StrengthsWeaknesses => self.include_strengths_weaknesses,
            SectionKind::OwnPosition => self.include_own_position,
            SectionKind::Notes => self.include_notes,
            SectionKind::Recommendations => self.include_recommendations,
        }
    }

    pub fn set_included(&mut self, section: SectionKind, included: bool) {
        let flag = match section {
            SectionKind::Goals => &mut self.include_goals,
            SectionKind::Tasks => &mut self.include_tasks,
            SectionKind::KeyTerms => &mut self.include_key_terms,
            SectionKind::Approaches => &mut self.include_approaches,
            SectionKind::Comparison => &mut self.include_comparison,
            SectionKind::StrengthsWeaknesses => &mut self.include_strengths_weaknesses,
            SectionKind::OwnPosition => &mut self.include_own_position,
            SectionKind::Notes => &mut self.include_notes,
            SectionKind::Recommendations => &mut self.include_recommendations,
        };
        *flag = included;
    }

    /// Settings with the given sections switched off.
    pub fn excluding(mut self, sections: impl IntoIterator<Item = SectionKind>) -> Self {
        for section in sections {
            self.set_included(section, false);
        }
        self
    }
}
