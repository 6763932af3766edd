//! Canonical report sections.

use super::settings::Language;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Report sections in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum SectionKind {
    Goals,
    Tasks,
    KeyTerms,
    Approaches,
    Comparison,
    StrengthsWeaknesses,
    OwnPosition,
    Notes,
    Recommendations,
}

impl SectionKind {
    pub fn title(self, language: Language) -> &'static str {
        match language {
            Language::Ru => match self {
                SectionKind::Goals => "Цели",
                SectionKind::Tasks => "Задачи",
                SectionKind::KeyTerms => "Ключевые термины",
                SectionKind::Approaches => "Подходы",
                SectionKind::Comparison => "Сравнительный анализ",
                SectionKind::StrengthsWeaknesses => "Сильные и слабые стороны",
                SectionKind::OwnPosition => "Собственная позиция",
                SectionKind::Notes => "Заметки",
                SectionKind::Recommendations => "Рекомендации",
            },
            Language::En => match self {
                SectionKind::Goals => "Goals",
                SectionKind::Tasks => "Tasks",
                SectionKind::KeyTerms => "Key Terms",
                SectionKind::Approaches => "Approaches",
                SectionKind::Comparison => "Comparison",
                SectionKind::StrengthsWeaknesses => "Strengths and Weaknesses",
                SectionKind::OwnPosition => "Own Position",
                SectionKind::Notes => "Notes",
                SectionKind::Recommendations => "Recommendations",
            },
        }
    }

    /// The section whose title is exactly `title` in any language.
    pub fn from_title(title: &str) -> Option<SectionKind> {
        SectionKind::iter()
            .find(|kind| Language::iter().any(|language| kind.title(language) == title))
    }
}
