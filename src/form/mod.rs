//! Form state store — the wizard's single source of truth.
//!
//! DESIGN
//! ======
//! `FormStore` holds everything the wizard collects: filing type, current
//! page, typed answers, uploaded files, compliance score and the log of
//! applied suggestions. Every mutator validates before it writes, so a
//! rejected call leaves the store untouched.
//!
//! `FormProvider` owns the store; `FormContext` handles are weak, which is
//! how "used outside a provider" is detected after the provider is gone.

pub mod answers;
pub mod context;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::wizard::WizardStep;
pub use answers::{
    Annotation, AnnotationSource, Answers, AnswersPatch, FilingBasis, FilingType, MarkType, OwnerType, PatentAnswers,
    PatentPatch, PatentType, TrademarkAnswers, TrademarkPatch, VerificationTask,
};
pub use context::{FormContext, FormProvider};

/// Highest compliance score the checker can award.
pub const MAX_COMPLIANCE_SCORE: u8 = 100;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("form context used outside provider")]
    OutsideProvider,

    #[error("no filing type selected")]
    NoFilingType,

    #[error("answers are for {expected:?} but update targets {got:?}")]
    FilingTypeMismatch { expected: Option<FilingType>, got: FilingType },

    #[error("step {step} is out of range (wizard has {steps} steps)")]
    StepOutOfRange { step: usize, steps: usize },

    #[error("compliance score {0} exceeds 100")]
    ScoreOutOfRange(u8),

    #[error("file {0} already uploaded")]
    DuplicateFile(Uuid),

    #[error("file {0} not found")]
    FileNotFound(Uuid),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid value {value:?} for field {field}")]
    InvalidOption { field: String, value: String },

    #[error("no suggestion panel for {0}")]
    UnknownPanel(String),
}

impl ErrorCode for FormError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::OutsideProvider => "E_OUTSIDE_PROVIDER",
            Self::NoFilingType => "E_NO_FILING_TYPE",
            Self::FilingTypeMismatch { .. } => "E_FILING_TYPE_MISMATCH",
            Self::StepOutOfRange { .. } => "E_STEP_OUT_OF_RANGE",
            Self::ScoreOutOfRange(_) => "E_SCORE_OUT_OF_RANGE",
            Self::DuplicateFile(_) => "E_DUPLICATE_FILE",
            Self::FileNotFound(_) => "E_FILE_NOT_FOUND",
            Self::UnknownField(_) => "E_UNKNOWN_FIELD",
            Self::InvalidOption { .. } => "E_INVALID_OPTION",
            Self::UnknownPanel(_) => "E_UNKNOWN_PANEL",
        }
    }
}

// =============================================================================
// UPLOADED FILES
// =============================================================================

/// File bytes, shared and never serialized.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Payload(Arc<[u8]>);

impl Payload {
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload({} bytes)", self.0.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: Uuid,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    #[serde(skip)]
    pub payload: Payload,
    pub category: String,
}

impl UploadedFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        category: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            payload: Payload::from(bytes),
            category: category.into(),
        }
    }
}

// =============================================================================
// SUGGESTION LOG
// =============================================================================

/// Applied suggestions by field key; no key ever holds a string twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionLog(BTreeMap<String, Vec<String>>);

impl SuggestionLog {
    /// Append `text` under `key`. Returns false if it was already logged.
    pub fn add(&mut self, key: &str, text: &str) -> bool {
        let entries = self.0.entry(key.to_string()).or_default();
        if entries.iter().any(|existing| existing == text) {
            return false;
        }
        entries.push(text.to_string());
        true
    }

    #[must_use]
    pub fn get(&self, key: &str) -> &[String] {
        self.0.get(key).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for SuggestionLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStore {
    filing_type: Option<FilingType>,
    current_step: usize,
    answers: Option<Answers>,
    uploaded_files: Vec<UploadedFile>,
    compliance_score: u8,
    ai_suggestions: SuggestionLog,
}

impl FormStore {
    #[must_use]
    pub fn filing_type(&self) -> Option<FilingType> {
        self.filing_type
    }

    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    #[must_use]
    pub fn answers(&self) -> Option<&Answers> {
        self.answers.as_ref()
    }

    #[must_use]
    pub fn uploaded_files(&self) -> &[UploadedFile] {
        &self.uploaded_files
    }

    #[must_use]
    pub fn compliance_score(&self) -> u8 {
        self.compliance_score
    }

    #[must_use]
    pub fn suggestions(&self) -> &SuggestionLog {
        &self.ai_suggestions
    }

    /// Choose the filing type. Switching types starts a fresh answer record;
    /// re-selecting the current type keeps what was entered.
    pub fn set_filing_type(&mut self, filing_type: Option<FilingType>) {
        if let Some(ft) = filing_type {
            if self.answers.as_ref().map(Answers::filing_type) != Some(ft) {
                self.answers = Some(Answers::empty(ft));
            }
        }
        self.filing_type = filing_type;
    }

    /// # Errors
    ///
    /// Returns an error if `step` is past the last wizard page.
    pub fn set_current_step(&mut self, step: usize) -> Result<(), FormError> {
        let steps = WizardStep::ALL.len();
        if step >= steps {
            return Err(FormError::StepOutOfRange { step, steps });
        }
        self.current_step = step;
        Ok(())
    }

    /// Shallow-merge a patch into the active answers.
    ///
    /// # Errors
    ///
    /// Returns an error if no filing type is selected or the patch is for
    /// the other filing type.
    pub fn update_answers(&mut self, patch: AnswersPatch) -> Result<(), FormError> {
        let answers = self.active_answers()?;
        answers.apply(patch)
    }

    /// # Errors
    ///
    /// Returns an error if a file with the same id is already present.
    pub fn add_file(&mut self, file: UploadedFile) -> Result<(), FormError> {
        if self.uploaded_files.iter().any(|f| f.id == file.id) {
            return Err(FormError::DuplicateFile(file.id));
        }
        self.uploaded_files.push(file);
        Ok(())
    }

    /// Remove a file by id, returning it if it was present.
    pub fn remove_file(&mut self, id: Uuid) -> Option<UploadedFile> {
        let index = self.uploaded_files.iter().position(|f| f.id == id)?;
        Some(self.uploaded_files.remove(index))
    }

    /// # Errors
    ///
    /// Returns an error for scores above [`MAX_COMPLIANCE_SCORE`].
    pub fn set_compliance_score(&mut self, score: u8) -> Result<(), FormError> {
        if score > MAX_COMPLIANCE_SCORE {
            return Err(FormError::ScoreOutOfRange(score));
        }
        self.compliance_score = score;
        Ok(())
    }

    pub fn add_suggestion(&mut self, key: &str, text: &str) -> bool {
        self.ai_suggestions.add(key, text)
    }

    // -------------------------------------------------------------------------
    // annotation appends
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns an error unless trademark answers are active.
    pub fn add_verification_task(&mut self, description: &str, at: OffsetDateTime) -> Result<(), FormError> {
        match self.active_answers()? {
            Answers::Trademark(a) => {
                a.verification_tasks.push(VerificationTask::from_ai(description, at));
                Ok(())
            }
            Answers::Patent(_) => Err(mismatch(FilingType::Patent, FilingType::Trademark)),
        }
    }

    /// # Errors
    ///
    /// Returns an error unless trademark answers are active.
    pub fn add_consideration(&mut self, text: &str, at: OffsetDateTime) -> Result<(), FormError> {
        match self.active_answers()? {
            Answers::Trademark(a) => {
                a.considerations.push(Annotation::from_ai(text, at));
                Ok(())
            }
            Answers::Patent(_) => Err(mismatch(FilingType::Patent, FilingType::Trademark)),
        }
    }

    /// # Errors
    ///
    /// Returns an error unless patent answers are active.
    pub fn add_description_improvement(&mut self, text: &str, at: OffsetDateTime) -> Result<(), FormError> {
        match self.active_answers()? {
            Answers::Patent(a) => {
                a.description_improvements.push(Annotation::from_ai(text, at));
                Ok(())
            }
            Answers::Trademark(_) => Err(mismatch(FilingType::Trademark, FilingType::Patent)),
        }
    }

    fn active_answers(&mut self) -> Result<&mut Answers, FormError> {
        if self.filing_type.is_none() {
            return Err(FormError::NoFilingType);
        }
        self.answers.as_mut().ok_or(FormError::NoFilingType)
    }
}

fn mismatch(expected: FilingType, got: FilingType) -> FormError {
    FormError::FilingTypeMismatch { expected: Some(expected), got }
}

#[cfg(test)]
#[path = "form_test.rs"]
mod tests;
