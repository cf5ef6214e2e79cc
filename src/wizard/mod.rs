//! Wizard layer — pages, field descriptors, suggestion panels, apply handlers.
//!
//! DESIGN
//! ======
//! The wizard is data: `fields` describes what each basic-info page asks,
//! `panels` binds suggestion panels to the fields that feed them, and
//! `apply` turns an accepted suggestion into log entries and annotations.
//! `WizardSession` ties these to one `FormContext` and owns the watchers.

pub mod apply;
pub mod fields;
pub mod panels;
pub mod session;

use serde::Serialize;

pub use apply::{Notice, apply_suggestion};
pub use fields::{FieldDescriptor, FieldKind, FieldOption, fields_for};
pub use panels::{PanelSpec, PanelView, panel_spec, panels_for};
pub use session::WizardSession;

/// Wizard pages in order. `FormStore::current_step` indexes this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    BasicInfo,
    Documents,
    Uploads,
    Compliance,
    Filing,
}

impl WizardStep {
    pub const ALL: [Self; 5] = [Self::BasicInfo, Self::Documents, Self::Uploads, Self::Compliance, Self::Filing];

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Information",
            Self::Documents => "Documents",
            Self::Uploads => "Uploads",
            Self::Compliance => "Compliance Check",
            Self::Filing => "Filing",
        }
    }
}
