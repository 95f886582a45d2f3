use serde::{Deserialize, Serialize};
use std::fmt;

/// Which parser a model reply was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Educational,
    Contract,
}

/// Structured form of a model reply, tagged by `document_type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "document_type", rename_all = "lowercase")]
pub enum AnalysisResult {
    Educational(EducationalAnalysis),
    Contract(ContractAnalysis),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationalAnalysis {
    pub timestamp: String,
    pub key_insights: KeyInsights,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyInsights {
    pub teaching_purpose: String,
    pub key_principles: Vec<String>,
    pub anti_patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractAnalysis {
    pub timestamp: String,
    pub clauses: Vec<Clause>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub clause: String,
    pub risk: String,
    pub fix: String,
    #[serde(default)]
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        f.write_str(label)
    }
}

impl AnalysisResult {
    pub fn document_type(&self) -> DocumentType {
        match self {
            AnalysisResult::Educational(_) => DocumentType::Educational,
            AnalysisResult::Contract(_) => DocumentType::Contract,
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            AnalysisResult::Educational(analysis) => &analysis.timestamp,
            AnalysisResult::Contract(analysis) => &analysis.timestamp,
        }
    }
}
