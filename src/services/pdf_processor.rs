use std::time::Instant;
use lopdf::{Document, Object};

use crate::error::{AppError, AppResult};
use crate::models::{PdfMetadata, ProcessedFile};

/// Reads the text of the first page of a PDF, capped at a character budget.
#[derive(Debug, Clone, Copy)]
pub struct PdfProcessor {
    max_text_length: usize,
}

#[derive(Debug)]
pub struct ExtractionResult {
    pub text: String,
    pub metadata: PdfMetadata,
    pub processing_time_ms: u64,
}

impl PdfProcessor {
    pub fn new(max_text_length: usize) -> Self {
        Self { max_text_length }
    }

    /// Runs extraction on the blocking pool; PDF parsing is CPU bound.
    pub async fn extract_first_page(&self, file: ProcessedFile) -> AppResult<ExtractionResult> {
        let processor = *self;
        tokio::task::spawn_blocking(move || processor.extract_first_page_blocking(&file)).await?
    }

    pub fn extract_first_page_blocking(&self, file: &ProcessedFile) -> AppResult<ExtractionResult> {
        let start = Instant::now();

        tracing::info!(
            "Starting PDF text extraction for file: {} ({} bytes)",
            file.name,
            file.size
        );

        let doc = Document::load_mem(&file.content).map_err(|e| {
            tracing::warn!("PDF could not be parsed: {}", e);
            AppError::pdf(e.to_string())
        })?;

        let pages = doc.get_pages();
        let first_page = match pages.keys().next() {
            Some(number) => *number,
            None => {
                tracing::warn!("PDF has no pages");
                return Err(AppError::EmptyDocument);
            }
        };

        // An empty first page is an empty document; later pages are never read.
        let page_text = match doc.extract_text(&[first_page]) {
            Ok(text) => text,
            Err(page_err) => {
                tracing::warn!("Page {} extraction failed: {}, retrying with pdf-extract", first_page, page_err);
                self.fallback_text(&file.content).map_err(|fallback_err| {
                    AppError::pdf(format!("{}; fallback failed: {}", page_err, fallback_err))
                })?
            }
        };

        let (text, truncated) = truncate_chars(&page_text, self.max_text_length);
        if text.trim().is_empty() {
            tracing::warn!("Empty PDF or no text extracted from {}", file.name);
            return Err(AppError::EmptyDocument);
        }

        let processing_time = start.elapsed().as_millis() as u64;
        let metadata = PdfMetadata::new(file.size)
            .with_pages(pages.len())
            .with_title(info_string(&doc, b"Title"))
            .with_author(info_string(&doc, b"Author"))
            .with_truncated(truncated);

        tracing::info!(
            title = metadata.title.as_deref().unwrap_or("-"),
            author = metadata.author.as_deref().unwrap_or("-"),
            pages = metadata.pages,
            "PDF processing completed in {}ms, extracted {} characters (truncated: {})",
            processing_time,
            text.chars().count(),
            truncated
        );

        Ok(ExtractionResult {
            text,
            metadata,
            processing_time_ms: processing_time,
        })
    }

    /// First-page text through pdf-extract's per-page reader.
    fn fallback_text(&self, content: &[u8]) -> Result<String, String> {
        // pdf-extract panics on some malformed font programs
        let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(content))
            .map_err(|_| "pdf-extract panicked while reading the document".to_string())?
            .map_err(|e| e.to_string())?;
        let first_page = pages.into_iter().next().unwrap_or_default();
        tracing::debug!("Fallback extraction produced {} characters", first_page.len());
        Ok(first_page)
    }
}

impl Default for PdfProcessor {
    fn default() -> Self {
        Self::new(3000)
    }
}

/// Cuts `text` to at most `limit` characters, never splitting a code point.
pub fn truncate_chars(text: &str, limit: usize) -> (String, bool) {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => (text[..byte_index].to_string(), true),
        None => (text.to_string(), false),
    }
}

fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info = match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let raw = info.as_dict().ok()?.get(key).ok()?.as_str().ok()?;
    let decoded = decode_pdf_string(raw);
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Info strings are either PDFDocEncoding/UTF-8 or UTF-16 with a BOM.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        decode_utf16(rest, u16::from_be_bytes)
    } else if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        decode_utf16(rest, u16::from_le_bytes)
    } else if looks_like_utf16(bytes) {
        decode_utf16(bytes, u16::from_be_bytes)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

fn looks_like_utf16(bytes: &[u8]) -> bool {
    if bytes.len() < 2 {
        return false;
    }
    let null_count = bytes.iter().filter(|&&b| b == 0).count();
    null_count > bytes.len() / 3
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .filter_map(Result::ok)
        .filter(|c| *c != '\0')
        .collect()
}
