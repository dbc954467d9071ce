//! Client for the Google Generative Language `generateContent` endpoint.

use std::time::Duration;

use crate::LlmError;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for one Gemini model.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run `input` through the model and return the generated text.
    pub async fn generate(&self, input: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": input }] }]
        });

        tracing::debug!(model = %self.model, chars = input.len(), "sending prompt to LLM");
        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, "LLM API returned an error status");
            return Err(LlmError::Api { status, body });
        }

        let data: serde_json::Value = resp.json().await?;
        response_text(&data)
    }
}

/// Pull the generated text out of a `generateContent` response body.
fn response_text(data: &serde_json::Value) -> Result<String, LlmError> {
    let text = data["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if !text.is_empty() {
        return Ok(text);
    }

    if let Some(reason) = data["promptFeedback"]["blockReason"].as_str() {
        return Err(LlmError::Blocked(reason.to_string()));
    }
    Err(LlmError::EmptyResponse)
}
