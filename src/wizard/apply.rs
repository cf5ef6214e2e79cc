//! Apply handlers — what happens when the user accepts a suggestion.
//!
//! DESIGN
//! ======
//! Every handler logs the suggestion under a field key, may append a typed
//! annotation, and returns the toast to show. Log and annotation are written
//! in one `FormContext::update`, so a failed append never leaves a dangling
//! log entry.
//!
//! Keyword checks match on substrings, as typed by the model; "verify" is
//! matched case-sensitively, everything else ignores case.

use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;

use crate::form::{Answers, FilingType, FormContext, FormError, FormStore};
use crate::suggest::FieldType;

/// Toast or alert text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
}

const TASK_CREATED: Notice =
    Notice { title: "Task Created", description: "Added a verification task based on AI suggestion" };
const CONSIDERATION_ADDED: Notice =
    Notice { title: "Consideration Added", description: "This insight has been saved to your application notes" };
const SUGGESTION_APPLIED: Notice =
    Notice { title: "Suggestion Applied", description: "The AI recommendation has been noted in your application" };
const TITLE_IMPROVEMENT: Notice =
    Notice { title: "Title Improvement", description: "Consider using more technical terminology in your title" };
const TITLE_FORMAT: Notice =
    Notice { title: "Title Format", description: "Consider making your title more concise and focused" };
const TITLE_NOTED: Notice =
    Notice { title: "AI Suggestion Applied", description: "This recommendation has been noted in your application" };
const DESCRIPTION_NOTED: Notice = Notice {
    title: "Description Improvement Noted",
    description: "The suggestion has been added to your improvement list",
};

/// Apply `suggestion` from the panel tagged `field_type`.
///
/// # Errors
///
/// Returns an error if there is no panel for `field_type`, the active filing
/// type does not match it, or the context has no provider.
pub fn apply_suggestion(
    form: &FormContext,
    field_type: &FieldType,
    suggestion: &str,
    now: OffsetDateTime,
) -> Result<Notice, FormError> {
    let notice = form.update(|store| match field_type {
        FieldType::TrademarkName | FieldType::OwnerInfo => apply_trademark(store, suggestion, now),
        FieldType::PatentTitle => Ok(apply_patent_title(store, suggestion, now)),
        FieldType::PatentDescription => apply_patent_description(store, suggestion, now),
        other => Err(FormError::UnknownPanel(other.to_string())),
    })?;
    info!(field_type = %field_type, toast = notice.title, "wizard: suggestion applied");
    Ok(notice)
}

fn apply_trademark(store: &mut FormStore, suggestion: &str, now: OffsetDateTime) -> Result<Notice, FormError> {
    let mark_name = match store.answers() {
        Some(Answers::Trademark(a)) => a.mark_name.clone().filter(|name| !name.is_empty()),
        _ => return Err(not_trademark(store)),
    };
    let key = format!("trademark-{}", mark_name.as_deref().unwrap_or("application"));

    let lower = suggestion.to_lowercase();
    let notice = if lower.contains("check") || suggestion.contains("verify") {
        store.add_verification_task(suggestion, now)?;
        TASK_CREATED
    } else if lower.contains("consider") {
        store.add_consideration(suggestion, now)?;
        CONSIDERATION_ADDED
    } else {
        SUGGESTION_APPLIED
    };
    store.add_suggestion(&key, suggestion);
    Ok(notice)
}

fn apply_patent_title(store: &mut FormStore, suggestion: &str, now: OffsetDateTime) -> Notice {
    store.add_suggestion(&format!("patent-title-{}", unix_millis(now)), suggestion);

    let lower = suggestion.to_lowercase();
    if lower.contains("technical") || lower.contains("terminology") {
        TITLE_IMPROVEMENT
    } else if lower.contains("concise") || lower.contains("shorter") {
        TITLE_FORMAT
    } else {
        TITLE_NOTED
    }
}

fn apply_patent_description(
    store: &mut FormStore,
    suggestion: &str,
    now: OffsetDateTime,
) -> Result<Notice, FormError> {
    store.add_description_improvement(suggestion, now)?;
    store.add_suggestion(&format!("patent-description-{}", unix_millis(now)), suggestion);
    Ok(DESCRIPTION_NOTED)
}

fn not_trademark(store: &FormStore) -> FormError {
    match store.filing_type() {
        None => FormError::NoFilingType,
        Some(ft) => FormError::FilingTypeMismatch { expected: Some(ft), got: FilingType::Trademark },
    }
}

fn unix_millis(at: OffsetDateTime) -> i128 {
    at.unix_timestamp_nanos() / 1_000_000
}

#[cfg(test)]
#[path = "apply_test.rs"]
mod tests;
