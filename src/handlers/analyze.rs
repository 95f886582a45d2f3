use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{HeaderMap, StatusCode},
    response::Json,
};
use bytes::Bytes;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::middleware::current_request_id;
use crate::models::{AnalyzeResponse, ProcessedFile};
use crate::services::{build_prompt, clean_analysis, format_analysis_for_layman};

pub async fn analyze_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<AnalyzeResponse>> {
    let request_id = current_request_id();

    info!(request_id = %request_id, "Starting contract analysis request");

    // Not a multipart form at all (wrong content type, no boundary).
    let mut multipart = multipart.map_err(|rejection| {
        warn!(request_id = %request_id, error = %rejection, "Request is not a multipart form");
        AppError::MissingFile
    })?;

    let file = match extract_file_from_multipart(&mut multipart, state.config.max_file_size_mb).await {
        Ok(file) => {
            info!(
                request_id = %request_id,
                file_name = %file.name,
                file_size = file.size,
                "File extracted from multipart form"
            );
            file
        }
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "Failed to extract file from multipart");
            return Err(e);
        }
    };

    run_analysis(&state, file, &request_id).await.map(Json)
}

/// Accepts the PDF as the raw request body.
pub async fn analyze_binary_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<AnalyzeResponse>> {
    let request_id = current_request_id();

    info!(request_id = %request_id, "Starting binary contract analysis request");

    let content_type = headers
        .get("content-type")
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("");

    if !content_type.contains("application/pdf") {
        warn!(
            request_id = %request_id,
            content_type = content_type,
            "Invalid content type for binary upload"
        );
        return Err(AppError::InvalidContentType);
    }

    if body.is_empty() {
        warn!(request_id = %request_id, "Empty body received");
        return Err(AppError::MissingFile);
    }

    let file = ProcessedFile::new("uploaded.pdf".to_string(), body)
        .with_mime_type("application/pdf".to_string());

    run_analysis(&state, file, &request_id).await.map(Json)
}

/// extract -> prompt -> model -> parse -> format
pub(crate) async fn run_analysis(
    state: &AppState,
    file: ProcessedFile,
    request_id: &str,
) -> AppResult<AnalyzeResponse> {
    let start = Instant::now();

    if !file.has_pdf_extension() {
        warn!(request_id = %request_id, file_name = %file.name, "Invalid file type");
        return Err(AppError::UnsupportedFileType { file_name: file.name });
    }

    let limit_mb = state.config.max_file_size_mb;
    if file.size > state.config.max_file_size_bytes() {
        warn!(
            request_id = %request_id,
            file_size = file.size,
            max_size = state.config.max_file_size_bytes(),
            "File size exceeds limit"
        );
        return Err(AppError::FileTooLarge {
            size: file.size / (1024 * 1024),
            limit: limit_mb,
        });
    }

    if !state.generator.is_configured() {
        return Err(AppError::service_unavailable("model"));
    }

    let file_name = file.name.clone();
    let extraction = match state.pdf_processor.extract_first_page(file).await {
        Ok(result) => {
            info!(
                request_id = %request_id,
                text_length = result.text.len(),
                pages = result.metadata.pages,
                truncated = result.metadata.truncated,
                processing_time_ms = result.processing_time_ms,
                "PDF text extracted"
            );
            result
        }
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "PDF processing failed");
            return Err(e);
        }
    };

    let prompt = build_prompt(&extraction.text);
    debug!(request_id = %request_id, prompt_length = prompt.len(), "Prompt built");

    let timeout = Duration::from_secs(state.config.request_timeout_seconds);
    let raw_output = match tokio::time::timeout(timeout, state.generator.generate(&prompt)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            error!(request_id = %request_id, error = %e, "Model analysis failed");
            return Err(e);
        }
        Err(elapsed) => {
            error!(request_id = %request_id, timeout_secs = timeout.as_secs(), "Model analysis timed out");
            return Err(elapsed.into());
        }
    };

    let cleaned = clean_analysis(&raw_output);
    let layman_output = format_analysis_for_layman(&cleaned);

    info!(
        request_id = %request_id,
        file_name = %file_name,
        document_type = ?cleaned.document_type(),
        total_time_ms = start.elapsed().as_millis() as u64,
        "Successfully analyzed document"
    );

    Ok(AnalyzeResponse::success(cleaned, layman_output))
}

async fn extract_file_from_multipart(multipart: &mut Multipart, limit_mb: usize) -> AppResult<ProcessedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit_mb, "Failed to read multipart field"))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("").to_string();
        let content_type = field.content_type().map(|ct| ct.to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, limit_mb, "Failed to read file data"))?;

        if data.is_empty() {
            return Err(AppError::InvalidFile {
                message: "File is empty".to_string(),
            });
        }

        let mut file = ProcessedFile::new(file_name, data);
        if let Some(mime_type) = content_type {
            file = file.with_mime_type(mime_type);
        }

        debug!(
            "Extracted file: {} ({} bytes, type: {:?}, pdf signature: {})",
            file.name,
            file.size,
            file.mime_type,
            file.has_pdf_signature()
        );

        return Ok(file);
    }

    Err(AppError::MissingFile)
}

// The body limit layer surfaces as a multipart read error.
fn multipart_error(err: MultipartError, limit_mb: usize, context: &str) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::BodyTooLarge { limit: limit_mb }
    } else {
        AppError::InvalidFile {
            message: format!("{}: {}", context, err),
        }
    }
}
