//! Developer routes — API mode switch and key entry. 404 outside development.

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::config::ApiMode;
use crate::state::AppState;
use crate::toggle::{PanelState, ToggleError};

#[derive(Serialize)]
pub struct ApiModeView {
    pub mode: ApiMode,
    pub badge: &'static str,
    pub label: &'static str,
    pub switch_disabled: bool,
    pub panel: PanelState,
}

fn require_dev(state: &AppState) -> Result<(), ToggleError> {
    if state.dev.is_development() { Ok(()) } else { Err(ToggleError::Hidden) }
}

fn view(state: &AppState) -> ApiModeView {
    let mode = state.settings.mode();
    ApiModeView {
        mode,
        badge: mode.badge(),
        label: state.switch.label(),
        switch_disabled: state.switch.is_disabled(),
        panel: state.panel.state(),
    }
}

/// `GET /api/dev/api-mode`
pub async fn api_mode(State(state): State<AppState>) -> Result<Json<ApiModeView>, ApiError> {
    require_dev(&state)?;
    Ok(Json(view(&state)))
}

/// `POST /api/dev/api-mode/toggle` — flip the mode through the switch.
pub async fn toggle(State(state): State<AppState>) -> Result<Json<ApiModeView>, ApiError> {
    state.switch.toggle()?;
    Ok(Json(view(&state)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyBody {
    pub api_key: String,
}

/// `POST /api/dev/api-key` — in-memory only; waits out the panel's save.
pub async fn save_api_key(
    State(state): State<AppState>,
    Json(body): Json<ApiKeyBody>,
) -> Result<Json<ApiModeView>, ApiError> {
    state.panel.save_api_key(&body.api_key).await?;
    Ok(Json(view(&state)))
}
