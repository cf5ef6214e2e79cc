//! Anthropic client — the real-mode backend for suggestions.
//!
//! One POST to the Messages endpoint per call. Endpoint, key, version, model and
//! sampling parameters come from the [`ApiConfig`] passed per call, so a key
//! saved through the developer panel applies to the next request.

use std::time::Duration;

use super::types::{ChatResponse, ContentBlock, LlmChat, LlmError, Message};
use crate::config::ApiConfig;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// CLIENT
// =============================================================================

pub struct AnthropicClient {
    http: reqwest::Client,
}

impl AnthropicClient {
    /// Build a client. Request timeouts are applied per call from the config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }

    async fn post_messages(&self, config: &ApiConfig, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        if !config.is_configured() {
            return Err(LlmError::MissingApiKey);
        }

        let body = MessagesRequest {
            model: &config.model,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            messages,
        };

        let response = self
            .http
            .post(&config.endpoint)
            .timeout(config.timeout())
            .header("content-type", "application/json")
            .header("x-api-key", &config.api_key)
            .header("anthropic-version", &config.api_version)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        if !status.is_success() {
            return Err(LlmError::ApiResponse { status: status.as_u16(), body: text });
        }

        parse_response(&text)
    }
}

#[async_trait::async_trait]
impl LlmChat for AnthropicClient {
    async fn chat(&self, config: &ApiConfig, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        self.post_messages(config, messages).await
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: &'a [Message],
}

#[derive(serde::Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Default, serde::Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<ChatResponse, LlmError> {
    let api: MessagesResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let mut content = api.content;
    content.retain(|block| matches!(block, ContentBlock::Text { .. }));

    Ok(ChatResponse {
        content,
        model: api.model,
        stop_reason: api.stop_reason,
        input_tokens: api.usage.input_tokens,
        output_tokens: api.usage.output_tokens,
    })
}

#[cfg(test)]
#[path = "anthropic_test.rs"]
mod tests;
