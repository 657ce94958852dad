//! Gemini generation adapter
//!
//! Implements the `TextGenerator` port against the Gemini `generateContent`
//! API. The credential secret selected by the pool is passed per call as
//! the API key; this adapter holds no credential state.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use roundtable_application::{GenerationRequest, GeneratorError, TextGenerator};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// `TextGenerator` adapter for the Gemini API
pub struct GeminiGenerator {
    http: Client,
    model: String,
    endpoint: String,
}

impl GeminiGenerator {
    pub fn new() -> Result<Self, GeneratorError> {
        Self::with_endpoint(DEFAULT_MODEL, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(
        model: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, GeneratorError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GeneratorError::Failed(format!("Failed to build HTTP client: {e}")))?;
        let model = model.into();
        let model = if model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            model.trim().to_string()
        };
        let endpoint = endpoint.into();
        let endpoint = if endpoint.trim().is_empty() {
            DEFAULT_ENDPOINT.to_string()
        } else {
            endpoint.trim().trim_end_matches('/').to_string()
        };
        Ok(Self {
            http,
            model,
            endpoint,
        })
    }

    fn request_url(&self, secret: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, secret
        )
    }

    async fn send(
        &self,
        request: &GenerationRequest,
        secret: &str,
    ) -> Result<String, GeneratorError> {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.system_profile.clone(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
        };

        let response = self
            .http
            .post(self.request_url(secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| GeneratorError::Failed(format!("Request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let detail = response.text().await.unwrap_or_default();
            return Err(GeneratorError::RateLimited(format!(
                "429 Too Many Requests: {detail}"
            )));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Failed(format!("HTTP {status}: {detail}")));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::Failed(format!("Malformed response: {e}")))?;

        let text = payload
            .candidates
            .iter()
            .flat_map(|c| c.content.parts.iter())
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("");
        if text.trim().is_empty() {
            return Err(GeneratorError::Failed(
                "Response contained no text".to_string(),
            ));
        }
        debug!(chars = text.len(), model = %self.model, "Generation succeeded");
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
        secret: &str,
        cancel: &CancellationToken,
    ) -> Result<String, GeneratorError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GeneratorError::Cancelled),
            result = self.send(request, secret) => result,
        }
    }
}

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    #[serde(rename = "system_instruction")]
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}
