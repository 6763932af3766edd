use super::settings::ReportSettings;
use crate::session::{AnalysisData, ResearchId};
use serde::{Deserialize, Serialize};

/// Payload for collaborator-backed report generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub research_id: ResearchId,
    pub topic: String,
    pub goals: Vec<String>,
    pub tasks: Vec<String>,
    /// All notes categories joined by blank lines.
    pub notes: String,
    pub recommendations: Vec<String>,
    pub analysis: AnalysisData,
    pub settings: ReportSettings,
}
