use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub name: String,
    pub size: usize,
    pub content: Bytes,
    pub mime_type: Option<String>,
}

impl ProcessedFile {
    pub fn new(name: String, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        let size = content.len();
        Self {
            name,
            size,
            content,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: String) -> Self {
        self.mime_type = Some(mime_type);
        self
    }

    /// Uploads are accepted by file name alone; the parser rejects anything
    /// that is not really a PDF.
    pub fn has_pdf_extension(&self) -> bool {
        self.name.to_lowercase().ends_with(".pdf")
    }

    pub fn has_pdf_signature(&self) -> bool {
        self.content.starts_with(b"%PDF")
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FeedbackRequest {
    pub rating: u8,
    #[serde(default)]
    pub comments: Option<String>,
}

impl FeedbackRequest {
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 5;
    pub const MAX_COMMENT_CHARS: usize = 2000;

    pub fn validate(&self) -> Result<(), String> {
        if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&self.rating) {
            return Err(format!(
                "rating must be between {} and {}",
                Self::MIN_RATING,
                Self::MAX_RATING
            ));
        }
        if let Some(comments) = &self.comments {
            if comments.chars().count() > Self::MAX_COMMENT_CHARS {
                return Err(format!(
                    "comments must be at most {} characters",
                    Self::MAX_COMMENT_CHARS
                ));
            }
        }
        Ok(())
    }
}
