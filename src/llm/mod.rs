//! LLM — provider adapter for the AI suggestion feature.
//!
//! DESIGN
//! ======
//! Only the Anthropic Messages API is spoken. Callers depend on the
//! [`LlmChat`] trait so the suggestion adapter can be exercised with a mock.

pub mod anthropic;
pub mod types;

pub use anthropic::AnthropicClient;
pub use types::{ChatResponse, ContentBlock, LlmChat, LlmError, Message};
