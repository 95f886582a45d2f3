//! Turns a free-text model reply into an [`AnalysisResult`].
//!
//! The model is asked for quote/risk/fix triples, but it sometimes decides
//! the upload is a teaching sample rather than a live contract and answers
//! with a lesson instead. Keyword signals pick which shape to parse.

use chrono::Local;
use tracing::debug;

use crate::models::{
    AnalysisResult, Clause, ContractAnalysis, DocumentType, EducationalAnalysis, KeyInsights,
    Severity,
};

/// Phrases that mark a reply as commentary on an example document.
pub const SATIRE_KEYWORDS: [&str; 4] = ["satirical", "teaching example", "demonstration", "how not to"];

const TEACHING_PURPOSE_MARKER: &str = "**Teaching Purpose:**";
const BULLET: &str = "* ";
const BOLD: &str = "**";

pub fn classify(text: &str) -> DocumentType {
    let lowered = text.to_lowercase();
    if SATIRE_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        DocumentType::Educational
    } else {
        DocumentType::Contract
    }
}

pub fn clean_analysis(text: &str) -> AnalysisResult {
    let document_type = classify(text);
    debug!(?document_type, reply_length = text.len(), "Classified model reply");
    match document_type {
        DocumentType::Educational => process_educational_content(text),
        DocumentType::Contract => process_contract_content(text),
    }
}

pub fn process_educational_content(text: &str) -> AnalysisResult {
    process_educational_content_at(text, current_timestamp())
}

pub fn process_contract_content(text: &str) -> AnalysisResult {
    process_contract_content_at(text, current_timestamp())
}

pub fn process_educational_content_at(text: &str, timestamp: String) -> AnalysisResult {
    let mut insights = KeyInsights::default();

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if line.contains(TEACHING_PURPOSE_MARKER) {
            insights.teaching_purpose = line.replace(TEACHING_PURPOSE_MARKER, "").trim().to_string();
        } else if let Some(rest) = line.strip_prefix(BULLET) {
            if line.contains(BOLD) {
                insights.key_principles.push(rest.replace(BOLD, "").trim().to_string());
            } else {
                insights.anti_patterns.push(rest.trim().to_string());
            }
        }
    }

    AnalysisResult::Educational(EducationalAnalysis {
        timestamp,
        key_insights: insights,
    })
}

pub fn process_contract_content_at(text: &str, timestamp: String) -> AnalysisResult {
    let normalized = text.replace("\r\n", "\n");

    let clauses: Vec<Clause> = normalized
        .split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .filter_map(|block| {
            let mut parts = block.split('\n').map(str::trim).filter(|part| !part.is_empty());
            // quote, risk, fix; anything after the third line is dropped
            let clause = parts.next()?;
            let risk = parts.next()?;
            let fix = parts.next()?;
            Some(Clause {
                clause: clause.to_string(),
                risk: risk.to_string(),
                fix: fix.to_string(),
                severity: Severity::Medium,
            })
        })
        .collect();

    let summary = format!("Found {} potentially problematic clauses", clauses.len());

    AnalysisResult::Contract(ContractAnalysis {
        timestamp,
        clauses,
        summary,
    })
}

fn current_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
