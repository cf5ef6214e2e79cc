//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the wizard, suggestion and developer endpoints under a
//! single Axum router. Handlers return `ApiError` on failure, which renders
//! every module error as `{ code, message, retryable }` with a mapped status.
//! Developer routes answer 404 outside development.

pub mod dev;
pub mod suggestions;
pub mod wizard;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post, put};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{ErrorCode, error_body};
use crate::form::FormError;
use crate::state::AppState;
use crate::toggle::ToggleError;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/wizard", get(wizard::snapshot))
        .route("/api/wizard/filing-type", put(wizard::set_filing_type))
        .route("/api/wizard/step", put(wizard::set_step))
        .route("/api/wizard/answers", patch(wizard::update_answers))
        .route("/api/wizard/compliance-score", put(wizard::set_compliance_score))
        .route("/api/wizard/fields", get(wizard::fields))
        .route("/api/wizard/fields/{name}", put(wizard::edit_field))
        .route("/api/wizard/panels/{field_type}", get(wizard::panel))
        .route("/api/wizard/panels/{field_type}/apply", post(wizard::apply))
        .route("/api/wizard/files", post(wizard::upload_file))
        .route("/api/wizard/files/{id}", delete(wizard::remove_file))
        .route("/api/suggestions", post(suggestions::generate))
        .route("/api/dev/api-mode", get(dev::api_mode))
        .route("/api/dev/api-mode/toggle", post(dev::toggle))
        .route("/api/dev/api-key", post(dev::save_api_key))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// ERRORS
// =============================================================================

/// Error response: status plus the structured error body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    fn new(status: StatusCode, err: &dyn ErrorCode) -> Self {
        if status.is_server_error() {
            tracing::error!(code = err.error_code(), error = %err, "request failed");
        }
        Self { status, body: error_body(err) }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub(crate) fn form_error_to_status(err: &FormError) -> StatusCode {
    match err {
        FormError::OutsideProvider => StatusCode::INTERNAL_SERVER_ERROR,
        FormError::NoFilingType | FormError::FilingTypeMismatch { .. } | FormError::DuplicateFile(_) => {
            StatusCode::CONFLICT
        }
        FormError::StepOutOfRange { .. } | FormError::ScoreOutOfRange(_) | FormError::InvalidOption { .. } => {
            StatusCode::BAD_REQUEST
        }
        FormError::UnknownField(_) | FormError::UnknownPanel(_) | FormError::FileNotFound(_) => {
            StatusCode::NOT_FOUND
        }
    }
}

pub(crate) fn toggle_error_to_status(err: &ToggleError) -> StatusCode {
    match err {
        ToggleError::MissingApiKey => StatusCode::BAD_REQUEST,
        ToggleError::Busy => StatusCode::CONFLICT,
        ToggleError::Hidden => StatusCode::NOT_FOUND,
        ToggleError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        Self::new(form_error_to_status(&err), &err)
    }
}

impl From<ToggleError> for ApiError {
    fn from(err: ToggleError) -> Self {
        Self::new(toggle_error_to_status(&err), &err)
    }
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
