//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use crate::config::GenerativeConfig;
use crate::error::{EngineError, EngineResult};

use super::TextGenerator;

/// A [`TextGenerator`] calling the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Creates a client for `model` at `endpoint`.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> EngineResult<Self> {
        let api_key = api_key
            .into()
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'')
            .to_string();
        if api_key.is_empty() {
            return Err(EngineError::TextGeneration {
                message: "API key is empty".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| EngineError::TextGeneration {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    /// Creates a client from configuration, reading the key from the
    /// environment variable named there.
    pub fn from_config(config: &GenerativeConfig) -> EngineResult<Self> {
        let api_key =
            std::env::var(&config.api_key_env).map_err(|_| EngineError::ConfigNotFound {
                path: format!("${}", config.api_key_env),
            })?;
        Self::new(config.endpoint.clone(), config.model.clone(), api_key)
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

/// Pulls the first candidate's text out of a response, dropping code fences.
fn extract_text(body: &Value) -> Option<String> {
    let text = body["candidates"][0]["content"]["parts"][0]["text"].as_str()?;
    let cleaned = text
        .trim()
        .trim_start_matches("```markdown")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    Some(cleaned.to_string())
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> EngineResult<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::TextGeneration {
                message: format!("request to {} failed: {}", self.model, e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(model = %self.model, status = %status, "Generation request rejected");
            let message = if status == StatusCode::TOO_MANY_REQUESTS {
                format!("rate limited by {}", self.model)
            } else {
                format!("{} returned {}: {}", self.model, status, detail)
            };
            return Err(EngineError::TextGeneration { message });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| EngineError::TextGeneration {
                message: e.to_string(),
            })?;
        extract_text(&json).ok_or_else(|| EngineError::TextGeneration {
            message: format!("empty response from {}", self.model),
        })
    }
}
