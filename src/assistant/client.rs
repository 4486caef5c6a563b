/// Anthropic messages API client
///
/// Thin reqwest wrapper around the text-completion provider. The request
/// carries the assembled system prompt plus the restated latest user
/// message; the free-form reply text goes to the extractor. A wall-clock
/// timeout wraps the whole call and aborts the in-flight request on trip.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Value};
use std::time::Duration;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MODEL: &str = "claude-3-5-haiku-latest";
const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f64 = 0.2;

/// Client for the conversational workflow assistant
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    api_key: String,
    api_url: String,
    timeout: Duration,
}

impl ChatClient {
    /// Create a client with the given API key and request timeout
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            api_url: ANTHROPIC_API_URL.to_string(),
            timeout,
        }
    }

    /// Point the client at a different endpoint (test servers)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Send one completion request and return the reply text
    ///
    /// Cancellation is cooperative: when the timeout trips, the future is
    /// dropped, reqwest aborts the connection, and a timeout error
    /// surfaces to the caller.
    pub async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            bail!("Assistant API key not set");
        }

        let body = json!({
            "model": MODEL,
            "max_tokens": MAX_TOKENS,
            "system": system_prompt,
            "messages": [{"role": "user", "content": user_prompt}],
            "temperature": TEMPERATURE,
        });

        tracing::debug!("🤖 Calling assistant API ({} byte prompt)", system_prompt.len());

        let request = self
            .http
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| anyhow!("Assistant request timed out after {:?}", self.timeout))?
            .context("Assistant API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("Assistant API error: {status} {detail}");
        }

        let data: Value = response
            .json()
            .await
            .context("Assistant API returned invalid JSON")?;

        data.get("content")
            .and_then(Value::as_array)
            .and_then(|blocks| blocks.first())
            .and_then(|block| block.get("text"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Assistant did not return a valid response"))
    }
}
