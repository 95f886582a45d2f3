//! Client for the hosted generative model.
//!
//! Talks to Google's Generative Language API (`generateContent`). A single
//! request is made per analysis; failures are surfaced to the caller as-is.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Anything that can turn a prompt into a free-text completion.
#[async_trait]
pub trait ContentGenerator: Send + Sync + 'static {
    async fn generate(&self, prompt: &str) -> AppResult<String>;

    /// Whether the generator has what it needs to serve requests.
    fn is_configured(&self) -> bool {
        true
    }
}

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    api_base: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl GeminiClient {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            temperature: config.gemini_temperature,
            api_base: config.gemini_api_base.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::service_unavailable("model (GEMINI_API_KEY not set)"))?;

        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        debug!(model = %self.model, prompt_length = prompt.len(), "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<GenerateResponse>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .map(|err| err.message)
                .unwrap_or(body);
            return Err(AppError::model(format!("model API returned {}: {}", status, detail)));
        }

        let text = completion_text(&body)?;
        info!(model = %self.model, completion_length = text.len(), "Model completion received");
        Ok(text)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Concatenates the text parts of the first candidate in a response body.
fn completion_text(body: &str) -> AppResult<String> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| AppError::model(format!("unreadable model response: {}", e)))?;

    if let Some(err) = parsed.error {
        return Err(AppError::model(err.message));
    }

    let text: String = parsed
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(AppError::model("model returned no text"));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-pro:generateContent";

    fn client_for(server: &MockServer, timeout_secs: u64) -> GeminiClient {
        let config = Config {
            gemini_api_key: Some("test-key".to_string()),
            gemini_api_base: server.uri(),
            request_timeout_seconds: timeout_secs,
            ..Config::default()
        };
        GeminiClient::from_config(&config).unwrap()
    }

    #[test]
    fn joins_parts_of_first_candidate() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "first "}, {"text": "second"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        assert_eq!(completion_text(body).unwrap(), "first second");
    }

    #[test]
    fn api_error_object_becomes_model_error() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid"}}"#;
        match completion_text(body) {
            Err(AppError::ModelError { message }) => assert_eq!(message, "API key not valid"),
            other => panic!("expected ModelError, got {:?}", other),
        }
    }

    #[test]
    fn blocked_reply_without_text_is_an_error() {
        let body = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        assert!(matches!(completion_text(body), Err(AppError::ModelError { .. })));
    }

    #[test]
    fn request_serializes_generation_config() {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hi" }],
            }],
            generation_config: GenerationConfig { temperature: 0.2 },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert!(value["generationConfig"]["temperature"].is_number());
    }

    #[tokio::test]
    async fn missing_api_key_is_service_unavailable() {
        let client = GeminiClient::from_config(&Config::default()).unwrap();
        assert!(!client.is_configured());
        assert!(matches!(
            client.generate("prompt").await,
            Err(AppError::ServiceUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn generate_posts_prompt_with_key_and_temperature() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"parts": [{"text": "analyze this"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "clause\nrisk\nfix"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server, 5).generate("analyze this").await.unwrap();
        assert_eq!(text, "clause\nrisk\nfix");
    }

    #[tokio::test]
    async fn non_success_status_carries_api_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"code": 429, "message": "Resource has been exhausted"}
            })))
            .mount(&server)
            .await;

        match client_for(&server, 5).generate("prompt").await {
            Err(AppError::ModelError { message }) => {
                assert!(message.contains("429"), "message: {}", message);
                assert!(message.contains("Resource has been exhausted"), "message: {}", message);
            }
            other => panic!("expected ModelError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn slow_api_becomes_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"candidates": []}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let result = client_for(&server, 1).generate("prompt").await;
        assert!(matches!(result, Err(AppError::Timeout)), "got {:?}", result);
    }
}
