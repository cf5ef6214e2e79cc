//! Wizard routes — form state, field edits, suggestion panels, uploads.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ApiError;
use crate::form::{Answers, AnswersPatch, FilingType, FormError, FormStore, UploadedFile};
use crate::state::AppState;
use crate::wizard::panels::{ConsiderationsPreview, considerations_preview, logo_notice, numbered_improvements};
use crate::wizard::{FieldDescriptor, Notice, PanelView, WizardStep, fields_for};

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

// =============================================================================
// SNAPSHOT
// =============================================================================

#[derive(Serialize)]
pub struct WizardView {
    #[serde(flatten)]
    pub form: FormStore,
    pub step: Option<WizardStep>,
    pub step_title: Option<&'static str>,
    pub panels: Vec<&'static str>,
}

/// `GET /api/wizard` — full form snapshot plus page info.
pub async fn snapshot(State(state): State<AppState>) -> Result<Json<WizardView>, ApiError> {
    let form = state.session.form().snapshot()?;
    let step = WizardStep::from_index(form.current_step());
    Ok(Json(WizardView { step, step_title: step.map(WizardStep::title), panels: state.session.mounted_panels(), form }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingTypeBody {
    pub filing_type: Option<FilingType>,
}

/// `PUT /api/wizard/filing-type`
pub async fn set_filing_type(
    State(state): State<AppState>,
    Json(body): Json<FilingTypeBody>,
) -> Result<StatusCode, ApiError> {
    state.session.set_filing_type(body.filing_type)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct StepBody {
    pub step: usize,
}

/// `PUT /api/wizard/step`
pub async fn set_step(State(state): State<AppState>, Json(body): Json<StepBody>) -> Result<StatusCode, ApiError> {
    state.session.form().set_current_step(body.step)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /api/wizard/answers` — shallow merge of a tagged patch.
pub async fn update_answers(
    State(state): State<AppState>,
    Json(patch): Json<AnswersPatch>,
) -> Result<StatusCode, ApiError> {
    state.session.update_answers(patch)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct ScoreBody {
    pub score: u8,
}

/// `PUT /api/wizard/compliance-score`
pub async fn set_compliance_score(
    State(state): State<AppState>,
    Json(body): Json<ScoreBody>,
) -> Result<StatusCode, ApiError> {
    state.session.form().set_compliance_score(body.score)?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// FIELDS
// =============================================================================

#[derive(Serialize)]
pub struct FieldsView {
    pub filing_type: FilingType,
    pub fields: &'static [FieldDescriptor],
    pub notices: Vec<Notice>,
    pub considerations: Option<ConsiderationsPreview>,
    pub description_improvements: Vec<String>,
}

/// `GET /api/wizard/fields` — basic-info page for the active filing type.
pub async fn fields(State(state): State<AppState>) -> Result<Json<FieldsView>, ApiError> {
    let form = state.session.form().snapshot()?;
    let filing_type = form.filing_type().ok_or(FormError::NoFilingType)?;

    let mut view = FieldsView {
        filing_type,
        fields: fields_for(filing_type),
        notices: Vec::new(),
        considerations: None,
        description_improvements: Vec::new(),
    };
    match form.answers() {
        Some(Answers::Trademark(a)) => {
            view.notices.extend(logo_notice(a));
            view.considerations = considerations_preview(&a.considerations);
        }
        Some(Answers::Patent(a)) => view.description_improvements = numbered_improvements(&a.description_improvements),
        None => {}
    }
    Ok(Json(view))
}

#[derive(Deserialize)]
pub struct FieldBody {
    pub value: String,
}

/// `PUT /api/wizard/fields/{name}` — set one field and feed its panel.
pub async fn edit_field(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<FieldBody>,
) -> Result<StatusCode, ApiError> {
    state.session.edit_field(&name, &body.value)?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// PANELS
// =============================================================================

/// `GET /api/wizard/panels/{field_type}`
pub async fn panel(
    State(state): State<AppState>,
    Path(field_type): Path<String>,
) -> Result<Json<PanelView>, ApiError> {
    Ok(Json(state.session.panel(&field_type, state.dev.is_development())?))
}

#[derive(Deserialize)]
pub struct ApplyBody {
    pub suggestion: String,
}

/// `POST /api/wizard/panels/{field_type}/apply` — returns the toast to show.
pub async fn apply(
    State(state): State<AppState>,
    Path(field_type): Path<String>,
    Json(body): Json<ApplyBody>,
) -> Result<Json<Notice>, ApiError> {
    Ok(Json(state.session.apply(&field_type, &body.suggestion)?))
}

// =============================================================================
// FILES
// =============================================================================

#[derive(Deserialize)]
pub struct UploadParams {
    pub name: String,
    #[serde(default)]
    pub category: String,
}

/// `POST /api/wizard/files?name=..&category=..` — raw body is the file.
pub async fn upload_file(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_MIME_TYPE);
    let file = UploadedFile::new(params.name, mime_type, params.category, body.to_vec());
    state.session.form().add_file(file.clone())?;
    Ok((StatusCode::CREATED, Json(file)))
}

/// `DELETE /api/wizard/files/{id}`
pub async fn remove_file(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    state
        .session
        .form()
        .remove_file(id)?
        .ok_or(FormError::FileNotFound(id))?;
    Ok(StatusCode::NO_CONTENT)
}
