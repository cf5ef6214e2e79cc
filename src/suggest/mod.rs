//! Suggestion adapter — text + field type → a short list of suggestions.
//!
//! DESIGN
//! ======
//! `SuggestionService::generate` never fails: provider errors of every kind
//! (transport, status, malformed payload) are folded into
//! `SuggestionResponse::error` at this boundary. The mode is read from the
//! shared `ApiSettings` on every call, so a developer toggle applies to the
//! next request without rebuilding anything.
//!
//! Real mode asks the model for a bare JSON array of strings and parses the
//! first text block. Simulation mode sleeps for a fixed delay and then runs
//! the rule-based `simulate` function.

pub mod field;
pub mod simulate;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{ApiConfig, ApiMode, ApiSettings, DEFAULT_MAX_SUGGESTIONS};
use crate::error::ErrorCode;
use crate::llm::{LlmChat, Message};
pub use field::FieldType;
pub use simulate::simulate;

/// Error text when the provider call fails outright.
pub const GENERATION_FAILED: &str = "Failed to generate suggestions. Please try again.";

/// Error text when the provider answered but the payload was unusable.
pub const UNPARSEABLE_RESPONSE: &str = "Unable to process the AI response";

/// Single suggestion returned alongside [`UNPARSEABLE_RESPONSE`].
pub const FALLBACK_SUGGESTION: &str = "Please try again with more specific details";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("input must not be empty")]
    EmptyInput,
    #[error("max_suggestions must be at least 1")]
    InvalidMax,
    #[error("suggestion source failed: {0}")]
    Source(String),
}

impl ErrorCode for SuggestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "E_EMPTY_INPUT",
            Self::InvalidMax => "E_INVALID_MAX",
            Self::Source(_) => "E_SUGGESTION_SOURCE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Source(_))
    }
}

fn default_max() -> usize {
    DEFAULT_MAX_SUGGESTIONS
}

/// One suggestion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub input: String,
    pub field_type: FieldType,
    #[serde(default = "default_max")]
    pub max_suggestions: usize,
}

impl SuggestionRequest {
    pub fn new(input: impl Into<String>, field_type: FieldType) -> Self {
        Self { input: input.into(), field_type, max_suggestions: DEFAULT_MAX_SUGGESTIONS }
    }

    #[must_use]
    pub fn with_max(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    /// # Errors
    ///
    /// Returns an error for blank input or a zero suggestion count.
    pub fn validate(&self) -> Result<(), SuggestError> {
        if self.input.trim().is_empty() {
            return Err(SuggestError::EmptyInput);
        }
        if self.max_suggestions == 0 {
            return Err(SuggestError::InvalidMax);
        }
        Ok(())
    }
}

/// Outcome of one adapter call. Suggestions are in relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub suggestions: Vec<String>,
    pub error: Option<String>,
    pub mode: ApiMode,
}

impl SuggestionResponse {
    fn ok(suggestions: Vec<String>, mode: ApiMode) -> Self {
        Self { suggestions, error: None, mode }
    }

    fn failed(message: impl Into<String>, mode: ApiMode) -> Self {
        Self { suggestions: Vec::new(), error: Some(message.into()), mode }
    }

    fn unparseable(mode: ApiMode) -> Self {
        Self { suggestions: vec![FALLBACK_SUGGESTION.to_string()], error: Some(UNPARSEABLE_RESPONSE.to_string()), mode }
    }
}

// =============================================================================
// SOURCE TRAIT
// =============================================================================

/// Anything that can answer suggestion requests. Enables mocking in the
/// watcher tests.
#[async_trait::async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Produce suggestions for `request`.
    ///
    /// # Errors
    ///
    /// Implementations may fail; the watcher maps any error to a generic
    /// retry message.
    async fn generate(&self, request: &SuggestionRequest) -> Result<SuggestionResponse, SuggestError>;

    /// Mode the next request would run in.
    fn mode(&self) -> ApiMode;
}

// =============================================================================
// SERVICE
// =============================================================================

/// The suggestion adapter over the real provider and the simulator.
pub struct SuggestionService {
    settings: ApiSettings,
    llm: Arc<dyn LlmChat>,
    simulated_delay: Duration,
}

impl SuggestionService {
    pub fn new(settings: ApiSettings, llm: Arc<dyn LlmChat>, simulated_delay: Duration) -> Self {
        Self { settings, llm, simulated_delay }
    }

    #[must_use]
    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// Generate suggestions. Never fails; see module docs.
    pub async fn generate(&self, request: &SuggestionRequest) -> SuggestionResponse {
        let config = self.settings.snapshot();
        let mode = config.mode();

        if let Err(e) = request.validate() {
            debug!(code = e.error_code(), field_type = %request.field_type, "suggest: request rejected");
            return SuggestionResponse::failed(e.to_string(), mode);
        }

        let response = if mode.is_real() {
            self.generate_real(&config, request).await
        } else {
            self.generate_simulated(request).await
        };

        info!(
            field_type = %request.field_type,
            ?mode,
            count = response.suggestions.len(),
            error = response.error.as_deref().unwrap_or(""),
            "suggest: generated"
        );
        response
    }

    async fn generate_real(&self, config: &ApiConfig, request: &SuggestionRequest) -> SuggestionResponse {
        let prompt = build_prompt(request);
        let response = match self.llm.chat(config, &[Message::user(prompt)]).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, code = e.error_code(), field_type = %request.field_type, "suggest: provider call failed");
                return SuggestionResponse::failed(GENERATION_FAILED, ApiMode::RealApi);
            }
        };
        info!(
            model = %response.model,
            stop_reason = response.stop_reason.as_deref().unwrap_or(""),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "suggest: provider replied"
        );

        match response.first_text().and_then(parse_suggestions) {
            Some(mut suggestions) => {
                suggestions.truncate(request.max_suggestions);
                SuggestionResponse::ok(suggestions, ApiMode::RealApi)
            }
            None => {
                warn!(field_type = %request.field_type, "suggest: provider payload not a JSON string array");
                SuggestionResponse::unparseable(ApiMode::RealApi)
            }
        }
    }

    async fn generate_simulated(&self, request: &SuggestionRequest) -> SuggestionResponse {
        if !self.simulated_delay.is_zero() {
            tokio::time::sleep(self.simulated_delay).await;
        }
        let suggestions = simulate(&request.field_type, &request.input, request.max_suggestions);
        debug!(field_type = %request.field_type, count = suggestions.len(), "suggest: simulated");
        SuggestionResponse::ok(suggestions, ApiMode::Simulation)
    }
}

#[async_trait::async_trait]
impl SuggestionSource for SuggestionService {
    async fn generate(&self, request: &SuggestionRequest) -> Result<SuggestionResponse, SuggestError> {
        Ok(SuggestionService::generate(self, request).await)
    }

    fn mode(&self) -> ApiMode {
        self.settings.mode()
    }
}

// =============================================================================
// PROMPT + PARSING
// =============================================================================

fn build_prompt(request: &SuggestionRequest) -> String {
    format!(
        "Generate {count} helpful suggestions for a user filling out a \"{field}\" field in a \
         trademark/patent application form. They've entered: \"{input}\".\n\
         Provide suggestions that would help them improve their entry.\n\
         Return ONLY the suggestions as a JSON array of strings without any explanation or context.",
        count = request.max_suggestions,
        field = request.field_type,
        input = request.input,
    )
}

/// Parse model text as a bare JSON array of strings.
fn parse_suggestions(text: &str) -> Option<Vec<String>> {
    serde_json::from_str::<Vec<String>>(text.trim()).ok()
}

#[cfg(test)]
#[path = "suggest_test.rs"]
mod tests;
