use serde::{Deserialize, Serialize};

use crate::models::AnalysisResult;

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    pub result_json: AnalysisResult,
    pub result_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub pages: usize,
    pub file_size_bytes: usize,
    pub truncated: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub message: String,
}

impl AnalyzeResponse {
    pub fn success(result_json: AnalysisResult, result_text: String) -> Self {
        Self {
            status: "success".to_string(),
            result_json,
            result_text,
        }
    }
}

impl PdfMetadata {
    pub fn new(file_size_bytes: usize) -> Self {
        Self {
            title: None,
            author: None,
            pages: 0,
            file_size_bytes,
            truncated: false,
        }
    }

    pub fn with_pages(mut self, pages: usize) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }
}
