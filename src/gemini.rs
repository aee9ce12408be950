//! Gemini text-completion client.
//!
//! One [`TextModel`] implementation backed by the `generateContent` REST
//! endpoint. The trait is the seam the classifier and synthesizer are
//! generic over, so tests script replies without a network.
//!
//! Safety filters are explicitly disabled for every request: headlines
//! routinely describe violence and the pipeline does its own content
//! filtering upstream. Replies are trimmed and stripped of any markdown
//! code fence before use.

use crate::config::Config;
use crate::utils::{strip_code_fences, truncate_for_log};
use serde_json::{Value, json};
use std::time::Duration;
use thiserror::Error;

/// Fixed pause after every model call, classification or otherwise.
pub const MODEL_CALL_DELAY: Duration = Duration::from_secs(1);

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("transport error talking to the model: {0}")]
    Transport(String),
    #[error("model API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("model response missing {0}")]
    Shape(&'static str),
}

/// A single-prompt, single-reply text completion.
pub trait TextModel {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(client: &reqwest::Client, config: &Config) -> Self {
        Self {
            client: client.clone(),
            api_key: config.gemini_api_key.clone(),
            base_url: GEMINI_API_BASE.to_string(),
            model: config.gemini_model.clone(),
        }
    }
}

fn request_body(prompt: &str) -> Value {
    let safety: Vec<Value> = SAFETY_CATEGORIES
        .iter()
        .map(|category| json!({ "category": category, "threshold": "BLOCK_NONE" }))
        .collect();
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "safetySettings": safety,
    })
}

impl TextModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt))
            .send()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                body: truncate_for_log(&body, 300),
            });
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;
        let text = value
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .ok_or(ModelError::Shape("candidate text"))?;
        Ok(strip_code_fences(text))
    }
}
