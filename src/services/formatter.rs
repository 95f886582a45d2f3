//! Plain-language rendering of an analysis record.

use crate::models::{AnalysisResult, ContractAnalysis, EducationalAnalysis};

pub fn format_analysis_for_layman(result: &AnalysisResult) -> String {
    match result {
        AnalysisResult::Educational(analysis) => format_educational_output(analysis),
        AnalysisResult::Contract(analysis) => format_contract_output(analysis),
    }
}

pub fn format_educational_output(analysis: &EducationalAnalysis) -> String {
    let insights = &analysis.key_insights;
    let mut output = vec![
        "This document appears to be for educational purposes.".to_string(),
        format!("\n**Teaching Objective:** {}", insights.teaching_purpose),
    ];

    if !insights.key_principles.is_empty() {
        output.push("\n**Key Principles of Good Drafting:**".to_string());
        output.extend(insights.key_principles.iter().map(|p| format!("- {}", p)));
    }

    if !insights.anti_patterns.is_empty() {
        output.push("\n**Things to Avoid (Anti-Patterns):**".to_string());
        output.extend(insights.anti_patterns.iter().map(|p| format!("- {}", p)));
    }

    output.join("\n")
}

pub fn format_contract_output(analysis: &ContractAnalysis) -> String {
    let mut output = vec![
        "This document appears to be a contract.".to_string(),
        format!("\nAnalysis performed at: {}", analysis.timestamp),
        format!("\n{}:", analysis.summary),
    ];

    for (i, clause) in analysis.clauses.iter().enumerate() {
        output.push(format!("\n--- Clause {} ---", i + 1));
        output.push(format!("**Original Text:** {}", clause.clause));
        output.push(format!("**Potential Risk:** {}", clause.risk));
        output.push(format!("**Suggested Improvement:** {}", clause.fix));
        output.push(format!("**Severity:** {}", clause.severity));
    }

    output.join("\n")
}
