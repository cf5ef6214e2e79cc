//! Wizard answers — one typed record per filing type.
//!
//! DESIGN
//! ======
//! Scalars are optional and replaced by shallow patches; fields missing from
//! a patch keep their value. The AI annotation lists are append-only and
//! are never touched by a patch; `FormStore` appends to them.
//!
//! JSON uses the wizard's camelCase field names (`markName`, `briefSummary`)
//! so a field descriptor's `name` is also its answer key.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use super::FormError;
use crate::wizard::fields::descriptor;

// =============================================================================
// FILING TYPE + OPTION ENUMS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilingType {
    Patent,
    Trademark,
}

impl FilingType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patent => "patent",
            Self::Trademark => "trademark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatentType {
    Utility,
    Design,
    Plant,
    Provisional,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    #[default]
    Standard,
    Design,
    Sound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerType {
    Individual,
    Corporation,
    Llc,
    Partnership,
    Association,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilingBasis {
    Use,
    Intent,
    Foreign,
    Treaty,
}

// =============================================================================
// ANNOTATIONS
// =============================================================================

/// Where an annotation came from. Only AI-applied suggestions create them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationSource {
    #[default]
    Ai,
}

fn rfc3339(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_default()
}

/// A saved note (consideration or description improvement).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: Uuid,
    pub text: String,
    pub source: AnnotationSource,
    pub timestamp: String,
}

impl Annotation {
    pub fn from_ai(text: impl Into<String>, at: OffsetDateTime) -> Self {
        Self { id: Uuid::new_v4(), text: text.into(), source: AnnotationSource::Ai, timestamp: rfc3339(at) }
    }
}

/// A to-do created from a "check"/"verify" suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationTask {
    pub id: Uuid,
    pub description: String,
    pub completed: bool,
    pub source: AnnotationSource,
    pub timestamp: String,
}

impl VerificationTask {
    pub fn from_ai(description: impl Into<String>, at: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            completed: false,
            source: AnnotationSource::Ai,
            timestamp: rfc3339(at),
        }
    }
}

// =============================================================================
// ANSWERS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatentAnswers {
    pub invention_title: Option<String>,
    pub inventor_names: Option<String>,
    pub invention_type: Option<PatentType>,
    pub brief_summary: Option<String>,
    pub description_improvements: Vec<Annotation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrademarkAnswers {
    pub mark_name: Option<String>,
    pub mark_type: MarkType,
    pub owner_name: Option<String>,
    pub owner_type: Option<OwnerType>,
    pub owner_address: Option<String>,
    pub filing_basis: Option<FilingBasis>,
    pub verification_tasks: Vec<VerificationTask>,
    pub considerations: Vec<Annotation>,
}

impl TrademarkAnswers {
    /// A design mark needs a logo in the upload step.
    #[must_use]
    pub fn requires_logo(&self) -> bool {
        self.mark_type == MarkType::Design
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filingType", rename_all = "lowercase")]
pub enum Answers {
    Patent(PatentAnswers),
    Trademark(TrademarkAnswers),
}

impl Answers {
    #[must_use]
    pub fn empty(filing_type: FilingType) -> Self {
        match filing_type {
            FilingType::Patent => Self::Patent(PatentAnswers::default()),
            FilingType::Trademark => Self::Trademark(TrademarkAnswers::default()),
        }
    }

    #[must_use]
    pub fn filing_type(&self) -> FilingType {
        match self {
            Self::Patent(_) => FilingType::Patent,
            Self::Trademark(_) => FilingType::Trademark,
        }
    }

    /// Shallow-merge `patch` into these answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch targets the other filing type.
    pub fn apply(&mut self, patch: AnswersPatch) -> Result<(), FormError> {
        match (self, patch) {
            (Self::Patent(answers), AnswersPatch::Patent(p)) => {
                merge(&mut answers.invention_title, p.invention_title);
                merge(&mut answers.inventor_names, p.inventor_names);
                merge(&mut answers.invention_type, p.invention_type);
                merge(&mut answers.brief_summary, p.brief_summary);
                Ok(())
            }
            (Self::Trademark(answers), AnswersPatch::Trademark(p)) => {
                merge(&mut answers.mark_name, p.mark_name);
                if let Some(mark_type) = p.mark_type {
                    answers.mark_type = mark_type;
                }
                merge(&mut answers.owner_name, p.owner_name);
                merge(&mut answers.owner_type, p.owner_type);
                merge(&mut answers.owner_address, p.owner_address);
                merge(&mut answers.filing_basis, p.filing_basis);
                Ok(())
            }
            (current, patch) => {
                Err(FormError::FilingTypeMismatch { expected: Some(current.filing_type()), got: patch.filing_type() })
            }
        }
    }

    /// Current text of a free-text field, by wizard field name.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        let value = match (self, field) {
            (Self::Patent(a), "inventionTitle") => &a.invention_title,
            (Self::Patent(a), "inventorNames") => &a.inventor_names,
            (Self::Patent(a), "briefSummary") => &a.brief_summary,
            (Self::Trademark(a), "markName") => &a.mark_name,
            (Self::Trademark(a), "ownerName") => &a.owner_name,
            (Self::Trademark(a), "ownerAddress") => &a.owner_address,
            _ => return None,
        };
        value.as_deref()
    }
}

fn merge<T>(slot: &mut Option<T>, update: Option<T>) {
    if update.is_some() {
        *slot = update;
    }
}

// =============================================================================
// PATCHES
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PatentPatch {
    pub invention_title: Option<String>,
    pub inventor_names: Option<String>,
    pub invention_type: Option<PatentType>,
    pub brief_summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TrademarkPatch {
    pub mark_name: Option<String>,
    pub mark_type: Option<MarkType>,
    pub owner_name: Option<String>,
    pub owner_type: Option<OwnerType>,
    pub owner_address: Option<String>,
    pub filing_basis: Option<FilingBasis>,
}

/// Partial update for one filing type's answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filingType", rename_all = "lowercase")]
pub enum AnswersPatch {
    Patent(PatentPatch),
    Trademark(TrademarkPatch),
}

impl AnswersPatch {
    #[must_use]
    pub fn filing_type(&self) -> FilingType {
        match self {
            Self::Patent(_) => FilingType::Patent,
            Self::Trademark(_) => FilingType::Trademark,
        }
    }

    /// Patch setting one wizard field. The field table decides which names
    /// exist and which values a select or radio accepts.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown field names or values outside a select's
    /// options.
    pub fn single(filing_type: FilingType, field: &str, value: &str) -> Result<Self, FormError> {
        let descriptor = descriptor(filing_type, field).ok_or_else(|| FormError::UnknownField(field.to_string()))?;
        if !descriptor.accepts(value) {
            return Err(invalid_option(field, value));
        }
        let text = Some(value.to_string());
        match filing_type {
            FilingType::Patent => {
                let mut p = PatentPatch::default();
                match field {
                    "inventionTitle" => p.invention_title = text,
                    "inventorNames" => p.inventor_names = text,
                    "inventionType" => p.invention_type = Some(parse_option(field, value)?),
                    "briefSummary" => p.brief_summary = text,
                    _ => return Err(FormError::UnknownField(field.to_string())),
                }
                Ok(Self::Patent(p))
            }
            FilingType::Trademark => {
                let mut p = TrademarkPatch::default();
                match field {
                    "markName" => p.mark_name = text,
                    "markType" => p.mark_type = Some(parse_option(field, value)?),
                    "ownerName" => p.owner_name = text,
                    "ownerType" => p.owner_type = Some(parse_option(field, value)?),
                    "ownerAddress" => p.owner_address = text,
                    "filingBasis" => p.filing_basis = Some(parse_option(field, value)?),
                    _ => return Err(FormError::UnknownField(field.to_string())),
                }
                Ok(Self::Trademark(p))
            }
        }
    }
}

fn invalid_option(field: &str, value: &str) -> FormError {
    FormError::InvalidOption { field: field.to_string(), value: value.to_string() }
}

fn parse_option<T: DeserializeOwned>(field: &str, value: &str) -> Result<T, FormError> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).map_err(|_| invalid_option(field, value))
}

#[cfg(test)]
#[path = "answers_test.rs"]
mod tests;
