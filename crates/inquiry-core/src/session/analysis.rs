//! Structured analysis data and recommendations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTerm {
    pub id: String,
    pub term: String,
    #[serde(default)]
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approach {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisData {
    #[serde(default)]
    pub key_terms: Vec<KeyTerm>,
    #[serde(default)]
    pub approaches: Vec<Approach>,
    #[serde(default)]
    pub comparison: String,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub weaknesses: String,
    #[serde(default)]
    pub own_position: String,
}

/// Free-text analysis fields that are edited as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisField {
    Comparison,
    Strengths,
    Weaknesses,
    OwnPosition,
}

impl AnalysisData {
    pub fn field_mut(&mut self, field: AnalysisField) -> &mut String {
        match field {
            AnalysisField::Comparison => &mut self.comparison,
            AnalysisField::Strengths => &mut self.strengths,
            AnalysisField::Weaknesses => &mut self.weaknesses,
            AnalysisField::OwnPosition => &mut self.own_position,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    /// Older snapshots stored the text under `title`.
    #[serde(alias = "title")]
    pub text: String,
    #[serde(default)]
    pub priority: Priority,
}
