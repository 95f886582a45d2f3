//! Upload client for a running analysis server.

use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{AnalysisResult, AnalyzeResponse, FeedbackRequest, FeedbackResponse};

pub const DEFAULT_SERVER: &str = "http://localhost:5000";
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

const CLAUSE_PREVIEW_CHARS: usize = 50;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("File size exceeds 10MB. Please upload a smaller file.")]
    FileTooLarge { size: u64 },

    #[error("Only PDF files are supported")]
    NotPdf,

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Error: Could not analyze contract. ({status}: {message})")]
    Server { status: StatusCode, message: String },

    #[error("Error: Could not submit feedback. ({status}: {message})")]
    Feedback { status: StatusCode, message: String },
}

pub struct AnalyzeClient {
    http: Client,
    server: String,
}

impl AnalyzeClient {
    pub fn new(server: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(UPLOAD_TIMEOUT).build()?;
        Ok(Self {
            http,
            server: server.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn analyze(&self, path: &Path) -> Result<AnalyzeResponse, ClientError> {
        let path_label = path.display().to_string();

        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if !is_pdf {
            return Err(ClientError::NotPdf);
        }

        let size = tokio::fs::metadata(path)
            .await
            .map_err(|source| ClientError::Io { path: path_label.clone(), source })?
            .len();
        check_upload_size(size)?;

        let content = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::Io { path: path_label.clone(), source })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "contract.pdf".to_string());

        let part = Part::bytes(content)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        info!(file = %path_label, size, server = %self.server, "Uploading contract");

        let response = self
            .http
            .post(format!("{}/analyze", self.server))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status,
                message: server_error_message(&body),
            });
        }

        let parsed = response.json::<AnalyzeResponse>().await?;
        debug!(document_type = ?parsed.result_json.document_type(), "Analysis received");
        Ok(parsed)
    }

    pub async fn send_feedback(
        &self,
        rating: u8,
        comments: Option<String>,
    ) -> Result<FeedbackResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/feedback", self.server))
            .json(&FeedbackRequest { rating, comments })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Feedback {
                status,
                message: server_error_message(&body),
            });
        }

        Ok(response.json::<FeedbackResponse>().await?)
    }
}

pub fn check_upload_size(size: u64) -> Result<(), ClientError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(ClientError::FileTooLarge { size });
    }
    Ok(())
}

/// File name offered when saving a summary without an explicit path.
pub fn default_output_name(date: NaiveDate) -> String {
    format!("contract-analysis-{}.txt", date.format("%Y-%m-%d"))
}

/// Pulls `error.message` out of the server's error envelope, falling back to
/// the raw body.
pub fn server_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Short per-clause view: a truncated quote heading followed by risk and fix.
pub fn render_clause_view(result: &AnalysisResult) -> String {
    let analysis = match result {
        AnalysisResult::Contract(analysis) => analysis,
        AnalysisResult::Educational(_) => return String::new(),
    };

    let mut out = Vec::with_capacity(analysis.clauses.len() * 3);
    for (i, clause) in analysis.clauses.iter().enumerate() {
        let preview: String = clause.clause.chars().take(CLAUSE_PREVIEW_CHARS).collect();
        out.push(format!("Clause {}: {}...", i + 1, preview));
        out.push(format!("  Risk: {}", clause.risk));
        out.push(format!("  Fix: {}", clause.fix));
    }
    out.join("\n")
}
