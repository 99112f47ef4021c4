//! Gemini `generateContent` client.
//!
//! The quiz pipeline talks to the model through the [`TextGenerator`] trait so
//! the HTTP client can be swapped for a scripted fake in tests.

use crate::config::GeminiConfig;
use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur when calling the Gemini API
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("No Gemini API key configured. Set GEMINI_API_KEY or gemini.api_key.")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Gemini API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

impl GeminiError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GeminiError::Timeout(_))
    }
}

/// Anything that can turn a prompt into model text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the raw model text
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError>;
}

/// HTTP client for the hosted Gemini API
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Build a client from configuration
    pub fn from_config(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    /// Request body for a single-turn prompt
    fn build_request_body(prompt: &str) -> serde_json::Value {
        json!({
            "contents": [
                { "parts": [{ "text": prompt }] }
            ]
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;

        debug!("Calling Gemini generateContent");

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&Self::build_request_body(prompt))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| self.classify(e))?;
        let text = extract_candidate_text(&body);

        debug!("Gemini returned {} characters", text.len());
        Ok(text)
    }
}

impl GeminiClient {
    fn classify(&self, err: reqwest::Error) -> GeminiError {
        if err.is_timeout() {
            GeminiError::Timeout(self.timeout_secs)
        } else {
            GeminiError::HttpError(err)
        }
    }
}

/// Text of the first candidate's first part, or an empty string when absent
fn extract_candidate_text(body: &serde_json::Value) -> String {
    body.pointer("/candidates/0/content/parts/0/text")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_structure() {
        let body = GeminiClient::build_request_body("Summarize this");
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["parts"][0]["text"], "Summarize this");
    }

    #[test]
    fn test_endpoint_uses_model() {
        let config = GeminiConfig {
            api_base: "http://localhost:9000/v1/".to_string(),
            model: "gemini-test".to_string(),
            ..Default::default()
        };
        let client = GeminiClient::from_config(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1/models/gemini-test:generateContent"
        );
        assert!(!client.has_api_key());
    }

    #[test]
    fn test_extract_candidate_text() {
        let body = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"summary\": \"ok\"}" }] } }
            ]
        });
        assert_eq!(extract_candidate_text(&body), "{\"summary\": \"ok\"}");
    }

    #[test]
    fn test_extract_candidate_text_missing() {
        assert_eq!(extract_candidate_text(&json!({})), "");
        assert_eq!(extract_candidate_text(&json!({ "candidates": [] })), "");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let client = GeminiClient::from_config(&GeminiConfig::default()).unwrap();
        let result = client.generate("hello").await;
        assert!(matches!(result, Err(GeminiError::MissingApiKey)));
    }
}
