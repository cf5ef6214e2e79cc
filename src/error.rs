//! Error codes — grepable identifiers shared by every module error type.
//!
//! DESIGN
//! ======
//! Each module owns a `thiserror` enum. Anything that can reach the HTTP
//! surface also implements [`ErrorCode`], so the route layer renders every
//! failure the same way: `{ "code": "E_…", "message": "…", "retryable": … }`.

use serde_json::{Value, json};

// =============================================================================
// FIELD CONSTANTS
// =============================================================================

/// Error body key for the human-readable message.
pub const ERROR_MESSAGE: &str = "message";

/// Error body key for the grepable error code.
pub const ERROR_CODE: &str = "code";

/// Error body key for the retryable flag.
pub const ERROR_RETRYABLE: &str = "retryable";

// =============================================================================
// ERROR CODES
// =============================================================================

/// Grepable error code and retryable flag for structured error bodies.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Render an error as the JSON body used by every route.
pub fn error_body(err: &dyn ErrorCode) -> Value {
    json!({
        ERROR_CODE: err.error_code(),
        ERROR_MESSAGE: err.to_string(),
        ERROR_RETRYABLE: err.retryable(),
    })
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
