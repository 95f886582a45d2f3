//! Shared fixtures: in-memory PDFs and a canned model.

#![allow(dead_code)]

use async_trait::async_trait;
use fineprint::{services::ContentGenerator, AppError, AppResult, AppState, Config};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Builds a PDF with one page per entry, each showing its text in Courier.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    pdf_with_pages_and_title(pages, None)
}

pub fn pdf_with_pages_and_title(pages: &[&str], title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

pub enum Reply {
    Text(String),
    Fail(String),
    Slow(Duration, String),
}

/// A model stand-in that returns a fixed reply and records its prompts.
pub struct CannedGenerator {
    reply: Reply,
    configured: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl CannedGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Text(text.to_string()),
            configured: true,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Fail(message.to_string()),
            configured: true,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn slow(delay: Duration, text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Slow(delay, text.to_string()),
            configured: true,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Text(String::new()),
            configured: false,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ContentGenerator for CannedGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(message) => Err(AppError::model(message.clone())),
            Reply::Slow(delay, text) => {
                tokio::time::sleep(*delay).await;
                Ok(text.clone())
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

pub fn test_config() -> Config {
    Config {
        gemini_api_key: Some("test-key".to_string()),
        ..Config::default()
    }
}

pub fn state_with(config: Config, generator: Arc<CannedGenerator>) -> AppState {
    AppState::new(config, generator)
}

pub const CONTRACT_REPLY: &str = "\"The landlord may enter at any time.\"\nTenants lose any expectation of privacy.\nRequire 24 hours written notice before entry.\n\n\"Deposit is non-refundable.\"\nThe tenant forfeits the deposit even without damage.\nMake the deposit refundable minus documented damages.";

pub const EDUCATIONAL_REPLY: &str = "This looks like a satirical teaching example rather than a real agreement.\n\n**Teaching Purpose:** Illustrate one-sided drafting.\n* **Mutuality** keeps obligations balanced\n* Burying fees in fine print";
