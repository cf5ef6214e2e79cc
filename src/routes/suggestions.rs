//! One-shot suggestion route.

use axum::extract::State;
use axum::response::Json;

use crate::state::AppState;
use crate::suggest::{SuggestionRequest, SuggestionResponse};

/// `POST /api/suggestions` — call the adapter directly, bypassing the
/// debounce. Provider failures come back in the response's `error` field.
pub async fn generate(State(state): State<AppState>, Json(request): Json<SuggestionRequest>) -> Json<SuggestionResponse> {
    Json(state.service.generate(&request).await)
}
