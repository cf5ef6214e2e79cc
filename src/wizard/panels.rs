//! Suggestion panels — which field feeds which panel, and what a panel shows.

use serde::Serialize;

use crate::form::{Annotation, FilingType, TrademarkAnswers};
use crate::suggest::FieldType;
use crate::watcher::SuggestionState;

use super::Notice;

/// Default panel title when none is given.
pub const DEFAULT_TITLE: &str = "AI Suggestion";

/// Shown in place of suggestions while a request is in flight.
pub const LOADING_TEXT: &str = "Generating intelligent suggestions...";

/// Shown when the bound field is empty.
pub const EMPTY_HINT: &str = "Enter information to receive AI-powered suggestions";

/// How many saved considerations the basic-info page lists in full.
pub const CONSIDERATIONS_SHOWN: usize = 3;

/// Static binding of a suggestion panel to its input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelSpec {
    /// Field type tag sent to the suggestion adapter.
    pub tag: &'static str,
    /// Answer key whose text drives the panel.
    pub source_field: &'static str,
    pub filing_type: FilingType,
    pub title: &'static str,
    pub description: &'static str,
}

impl PanelSpec {
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        FieldType::parse(self.tag)
    }
}

const PANELS: &[PanelSpec] = &[
    PanelSpec {
        tag: "trademark-name",
        source_field: "markName",
        filing_type: FilingType::Trademark,
        title: DEFAULT_TITLE,
        description: "Based on your trademark name, our AI suggests:",
    },
    PanelSpec {
        tag: "owner-info",
        source_field: "ownerName",
        filing_type: FilingType::Trademark,
        title: DEFAULT_TITLE,
        description: "AI recommendations for owner information:",
    },
    PanelSpec {
        tag: "patent-title",
        source_field: "inventionTitle",
        filing_type: FilingType::Patent,
        title: "Title Optimization",
        description: "AI suggestions for your patent title:",
    },
    PanelSpec {
        tag: "patent-description",
        source_field: "briefSummary",
        filing_type: FilingType::Patent,
        title: DEFAULT_TITLE,
        description: "AI recommendations for your description:",
    },
];

pub fn panels_for(filing_type: FilingType) -> impl Iterator<Item = &'static PanelSpec> {
    PANELS.iter().filter(move |p| p.filing_type == filing_type)
}

#[must_use]
pub fn panel_spec(tag: &str) -> Option<&'static PanelSpec> {
    PANELS.iter().find(|p| p.tag == tag)
}

// =============================================================================
// VIEW
// =============================================================================

/// Hint shown when a panel has nothing else to display.
#[must_use]
pub fn panel_hint(input: &str, state: &SuggestionState, min_length: usize) -> Option<String> {
    if state.is_loading || state.error.is_some() || !state.suggestions.is_empty() {
        return None;
    }
    if input.is_empty() {
        Some(EMPTY_HINT.to_string())
    } else {
        Some(format!("Add more details (at least {min_length} characters) to receive AI suggestions"))
    }
}

/// Everything a client needs to render one panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub field_type: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// "API" / "Sim"; only present in development.
    pub badge: Option<&'static str>,
    pub loading_text: Option<&'static str>,
    pub hint: Option<String>,
    #[serde(flatten)]
    pub state: SuggestionState,
}

impl PanelView {
    #[must_use]
    pub fn new(spec: &PanelSpec, input: &str, state: SuggestionState, min_length: usize, show_badge: bool) -> Self {
        let badge = show_badge.then(|| if state.is_using_real_api { "API" } else { "Sim" });
        Self {
            field_type: spec.tag,
            title: spec.title,
            description: spec.description,
            badge,
            loading_text: state.is_loading.then_some(LOADING_TEXT),
            hint: panel_hint(input, &state, min_length),
            state,
        }
    }
}

// =============================================================================
// PAGE EXTRAS
// =============================================================================

/// First few considerations plus a "+ N more" line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsiderationsPreview {
    pub shown: Vec<String>,
    pub more: Option<String>,
}

#[must_use]
pub fn considerations_preview(items: &[Annotation]) -> Option<ConsiderationsPreview> {
    if items.is_empty() {
        return None;
    }
    let shown = items
        .iter()
        .take(CONSIDERATIONS_SHOWN)
        .map(|a| a.text.clone())
        .collect();
    let hidden = items.len().saturating_sub(CONSIDERATIONS_SHOWN);
    let more = (hidden > 0).then(|| format!("+ {hidden} more consideration(s)"));
    Some(ConsiderationsPreview { shown, more })
}

/// Description improvement notes, numbered from 1.
#[must_use]
pub fn numbered_improvements(items: &[Annotation]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, a)| format!("{}. {}", i + 1, a.text))
        .collect()
}

/// Alert shown on the trademark page when a logo will be needed.
#[must_use]
pub fn logo_notice(answers: &TrademarkAnswers) -> Option<Notice> {
    answers.requires_logo().then_some(Notice {
        title: "Logo Upload Required",
        description: "You've selected a Design Mark. Please upload your logo in the Upload Manager section after \
                      completing this form.",
    })
}

#[cfg(test)]
#[path = "panels_test.rs"]
mod tests;
