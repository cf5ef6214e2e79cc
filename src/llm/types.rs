//! LLM types — message shapes, errors, and the chat seam.

use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::error::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

/// Failures talking to the suggestion provider.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Real mode is on but no API key is configured.
    #[error("missing API key")]
    MissingApiKey,

    /// Transport failure: connect, timeout, or body read.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// Provider answered with a non-2xx status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// Body was not a Messages API response.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// reqwest refused the client settings.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// CONTENT BLOCKS
// =============================================================================

/// One block of a Messages API reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// A text block with no `text` reads as empty.
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        text: String,
    },

    /// Anything else the provider sends; dropped during parsing.
    #[serde(other)]
    Unknown,
}

// =============================================================================
// MESSAGES
// =============================================================================

/// One turn sent to the provider. Suggestions only ever send a user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

/// Parsed provider reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: Option<String>,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl ChatResponse {
    /// Text of the first text block, if any.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Unknown => None,
        })
    }
}

// =============================================================================
// CHAT SEAM
// =============================================================================

/// The call the suggestion adapter makes against a provider.
///
/// The config is passed per call because the key and mode can change at
/// runtime through the developer toggle.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// Send `messages` and return the parsed reply.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, the response is malformed,
    /// or the API key is absent.
    async fn chat(&self, config: &ApiConfig, messages: &[Message]) -> Result<ChatResponse, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
