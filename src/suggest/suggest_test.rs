use std::sync::Mutex;

use super::*;
use crate::config::MemoryModeStore;
use crate::llm::{AnthropicClient, ChatResponse, ContentBlock, LlmError};
use crate::test_helpers::{provider_body, spawn_fake_provider};

// =========================================================================
// MockLlm
// =========================================================================

enum Reply {
    Text(&'static str),
    Empty,
    Fail(u16),
}

struct MockLlm {
    reply: Reply,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    fn new(reply: Reply) -> Self {
        Self { reply, prompts: Mutex::new(Vec::new()) }
    }
}

#[async_trait::async_trait]
impl LlmChat for MockLlm {
    async fn chat(&self, _config: &ApiConfig, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        self.prompts
            .lock()
            .unwrap()
            .push(messages[0].content.clone());
        let content = match &self.reply {
            Reply::Text(text) => vec![ContentBlock::Text { text: (*text).to_string() }],
            Reply::Empty => Vec::new(),
            Reply::Fail(status) => return Err(LlmError::ApiResponse { status: *status, body: String::new() }),
        };
        Ok(ChatResponse { content, model: "mock".into(), stop_reason: None, input_tokens: 0, output_tokens: 0 })
    }
}

fn real_settings() -> ApiSettings {
    let config = ApiConfig { use_real_api: true, api_key: "sk-test".into(), ..ApiConfig::default() };
    ApiSettings::new(config, Arc::new(MemoryModeStore::new()))
}

fn sim_settings() -> ApiSettings {
    ApiSettings::new(ApiConfig::default(), Arc::new(MemoryModeStore::new()))
}

// =========================================================================
// real mode
// =========================================================================

#[tokio::test]
async fn real_mode_parses_json_array_and_truncates() {
    let llm = Arc::new(MockLlm::new(Reply::Text(r#"["one", "two", "three", "four", "five"]"#)));
    let service = SuggestionService::new(real_settings(), llm.clone(), Duration::ZERO);

    let resp = service
        .generate(&SuggestionRequest::new("My App", FieldType::TrademarkName).with_max(3))
        .await;
    assert_eq!(resp.suggestions, vec!["one", "two", "three"]);
    assert_eq!(resp.error, None);
    assert_eq!(resp.mode, ApiMode::RealApi);

    let prompts = llm.prompts.lock().unwrap();
    assert!(prompts[0].contains("Generate 3 helpful suggestions"));
    assert!(prompts[0].contains("\"trademark-name\""));
    assert!(prompts[0].contains("They've entered: \"My App\""));
    assert!(prompts[0].contains("JSON array of strings"));
}

#[tokio::test]
async fn real_mode_unparseable_text_falls_back() {
    let llm = Arc::new(MockLlm::new(Reply::Text("Here are some ideas: be specific")));
    let service = SuggestionService::new(real_settings(), llm, Duration::ZERO);

    let resp = service
        .generate(&SuggestionRequest::new("My App", FieldType::TrademarkName))
        .await;
    assert_eq!(resp.suggestions, vec![FALLBACK_SUGGESTION]);
    assert_eq!(resp.error.as_deref(), Some(UNPARSEABLE_RESPONSE));
}

#[tokio::test]
async fn real_mode_non_string_array_falls_back() {
    let llm = Arc::new(MockLlm::new(Reply::Text("[1, 2, 3]")));
    let service = SuggestionService::new(real_settings(), llm, Duration::ZERO);

    let resp = service
        .generate(&SuggestionRequest::new("widget", FieldType::PatentTitle))
        .await;
    assert_eq!(resp.error.as_deref(), Some(UNPARSEABLE_RESPONSE));
}

#[tokio::test]
async fn real_mode_empty_content_falls_back() {
    let llm = Arc::new(MockLlm::new(Reply::Empty));
    let service = SuggestionService::new(real_settings(), llm, Duration::ZERO);

    let resp = service
        .generate(&SuggestionRequest::new("widget", FieldType::PatentTitle))
        .await;
    assert_eq!(resp.suggestions, vec![FALLBACK_SUGGESTION]);
}

#[tokio::test]
async fn real_mode_provider_failure_is_folded_into_error() {
    let llm = Arc::new(MockLlm::new(Reply::Fail(500)));
    let service = SuggestionService::new(real_settings(), llm, Duration::ZERO);

    let resp = service
        .generate(&SuggestionRequest::new("widget", FieldType::PatentTitle))
        .await;
    assert!(resp.suggestions.is_empty());
    assert_eq!(resp.error.as_deref(), Some(GENERATION_FAILED));
}

#[tokio::test]
async fn real_mode_over_http_with_malformed_text() {
    let fake = spawn_fake_provider(200, provider_body("not json at all")).await;
    let settings = ApiSettings::new(fake.api_config(), Arc::new(MemoryModeStore::new()));
    let service = SuggestionService::new(settings, Arc::new(AnthropicClient::new().unwrap()), Duration::ZERO);

    let resp = service
        .generate(&SuggestionRequest::new("My App", FieldType::TrademarkName))
        .await;
    assert_eq!(resp.suggestions, vec!["Please try again with more specific details"]);
    assert_eq!(resp.error.as_deref(), Some("Unable to process the AI response"));
    assert_eq!(fake.captured().len(), 1);
}

#[tokio::test]
async fn real_mode_over_http_without_content_falls_back() {
    let fake = spawn_fake_provider(200, r#"{"id":"msg","type":"message","model":"m"}"#).await;
    let settings = ApiSettings::new(fake.api_config(), Arc::new(MemoryModeStore::new()));
    let service = SuggestionService::new(settings, Arc::new(AnthropicClient::new().unwrap()), Duration::ZERO);

    let resp = service
        .generate(&SuggestionRequest::new("My App", FieldType::TrademarkName))
        .await;
    assert_eq!(resp.suggestions, vec![FALLBACK_SUGGESTION]);
    assert_eq!(resp.error.as_deref(), Some(UNPARSEABLE_RESPONSE));
    assert_eq!(resp.mode, ApiMode::RealApi);
}

#[tokio::test]
async fn real_mode_over_http_text_block_without_text_falls_back() {
    let fake = spawn_fake_provider(200, r#"{"content":[{"type":"text"}]}"#).await;
    let settings = ApiSettings::new(fake.api_config(), Arc::new(MemoryModeStore::new()));
    let service = SuggestionService::new(settings, Arc::new(AnthropicClient::new().unwrap()), Duration::ZERO);

    let resp = service
        .generate(&SuggestionRequest::new("My App", FieldType::TrademarkName))
        .await;
    assert_eq!(resp.suggestions, vec![FALLBACK_SUGGESTION]);
    assert_eq!(resp.error.as_deref(), Some(UNPARSEABLE_RESPONSE));
}

#[tokio::test]
async fn real_mode_over_http_with_non_json_body_is_generation_failure() {
    let fake = spawn_fake_provider(200, "<html>gateway</html>").await;
    let settings = ApiSettings::new(fake.api_config(), Arc::new(MemoryModeStore::new()));
    let service = SuggestionService::new(settings, Arc::new(AnthropicClient::new().unwrap()), Duration::ZERO);

    let resp = service
        .generate(&SuggestionRequest::new("My App", FieldType::TrademarkName))
        .await;
    assert!(resp.suggestions.is_empty());
    assert_eq!(resp.error.as_deref(), Some(GENERATION_FAILED));
}

#[tokio::test]
async fn real_mode_over_http_with_error_status() {
    let fake = spawn_fake_provider(401, r#"{"error":"bad key"}"#).await;
    let settings = ApiSettings::new(fake.api_config(), Arc::new(MemoryModeStore::new()));
    let service = SuggestionService::new(settings, Arc::new(AnthropicClient::new().unwrap()), Duration::ZERO);

    let resp = service
        .generate(&SuggestionRequest::new("My App", FieldType::TrademarkName))
        .await;
    assert!(resp.suggestions.is_empty());
    assert_eq!(resp.error.as_deref(), Some(GENERATION_FAILED));
}

// =========================================================================
// simulation mode
// =========================================================================

#[tokio::test(start_paused = true)]
async fn simulation_mode_waits_then_simulates() {
    let llm = Arc::new(MockLlm::new(Reply::Fail(500)));
    let service = SuggestionService::new(sim_settings(), llm.clone(), Duration::from_millis(800));

    let started = tokio::time::Instant::now();
    let resp = service
        .generate(&SuggestionRequest::new("My App", FieldType::TrademarkName))
        .await;
    assert!(started.elapsed() >= Duration::from_millis(800));
    assert_eq!(resp.mode, ApiMode::Simulation);
    assert_eq!(resp.suggestions.len(), 4);
    assert!(resp.suggestions[0].starts_with("Your multi-word mark"));
    assert!(llm.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn toggle_takes_effect_on_next_call() {
    let llm = Arc::new(MockLlm::new(Reply::Text(r#"["from the model"]"#)));
    let settings = sim_settings();
    settings.set_api_key("sk-test");
    let service = SuggestionService::new(settings.clone(), llm, Duration::ZERO);
    let request = SuggestionRequest::new("My App", FieldType::TrademarkName);

    assert_eq!(service.generate(&request).await.mode, ApiMode::Simulation);
    settings.set_real_api(true).unwrap();
    let resp = service.generate(&request).await;
    assert_eq!(resp.mode, ApiMode::RealApi);
    assert_eq!(resp.suggestions, vec!["from the model"]);
}

// =========================================================================
// validation
// =========================================================================

#[tokio::test]
async fn blank_input_is_rejected_without_calling_provider() {
    let llm = Arc::new(MockLlm::new(Reply::Text("[]")));
    let service = SuggestionService::new(real_settings(), llm.clone(), Duration::ZERO);

    let resp = service
        .generate(&SuggestionRequest::new("   ", FieldType::TrademarkName))
        .await;
    assert!(resp.suggestions.is_empty());
    assert_eq!(resp.error.as_deref(), Some("input must not be empty"));
    assert!(llm.prompts.lock().unwrap().is_empty());
}

#[test]
fn validate_rejects_zero_max() {
    let err = SuggestionRequest::new("abc", FieldType::PatentTitle)
        .with_max(0)
        .validate()
        .unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID_MAX");
}

#[test]
fn request_deserializes_with_default_max() {
    let req: SuggestionRequest =
        serde_json::from_str(r#"{"input":"My App","field_type":"trademark-name"}"#).unwrap();
    assert_eq!(req.max_suggestions, 4);
    assert_eq!(req.field_type, FieldType::TrademarkName);
}

#[test]
fn parse_suggestions_accepts_surrounding_whitespace() {
    assert_eq!(parse_suggestions("\n [\"a\", \"b\"] \n"), Some(vec!["a".to_string(), "b".to_string()]));
    assert_eq!(parse_suggestions("{\"a\": 1}"), None);
}
