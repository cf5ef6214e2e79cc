//! Field descriptors for the basic-info page of each filing type.

use serde::Serialize;

use crate::form::FilingType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Select,
    Radio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// One input on a wizard page. `name` doubles as the answer key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub placeholder: Option<&'static str>,
    pub options: &'static [FieldOption],
    pub rows: Option<u8>,
}

impl FieldDescriptor {
    const fn text(name: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self { name, label, kind: FieldKind::Text, placeholder: Some(placeholder), options: &[], rows: None }
    }

    const fn textarea(name: &'static str, label: &'static str, placeholder: &'static str, rows: u8) -> Self {
        Self { name, label, kind: FieldKind::Textarea, placeholder: Some(placeholder), options: &[], rows: Some(rows) }
    }

    const fn select(
        name: &'static str,
        label: &'static str,
        placeholder: &'static str,
        options: &'static [FieldOption],
    ) -> Self {
        Self { name, label, kind: FieldKind::Select, placeholder: Some(placeholder), options, rows: None }
    }

    /// Whether `value` is acceptable for this field.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        self.options.is_empty() || self.options.iter().any(|o| o.value == value)
    }
}

const fn opt(value: &'static str, label: &'static str) -> FieldOption {
    FieldOption { value, label }
}

// =============================================================================
// PATENT
// =============================================================================

const PATENT_TYPES: &[FieldOption] = &[
    opt("utility", "Utility Patent"),
    opt("design", "Design Patent"),
    opt("plant", "Plant Patent"),
    opt("provisional", "Provisional Patent Application"),
];

const PATENT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("inventionTitle", "Invention Title", "Enter a clear, concise title for your invention"),
    FieldDescriptor::text("inventorNames", "Inventor Name(s)", "Full names of all inventors, separated by commas"),
    FieldDescriptor::select("inventionType", "Type of Patent", "Select patent type", PATENT_TYPES),
    FieldDescriptor::textarea(
        "briefSummary",
        "Brief Summary",
        "Provide a brief summary of your invention (1-2 paragraphs)",
        5,
    ),
];

// =============================================================================
// TRADEMARK
// =============================================================================

const MARK_TYPES: &[FieldOption] = &[
    opt("standard", "Standard Character Mark (text only)"),
    opt("design", "Design Mark (logo or stylized text)"),
    opt("sound", "Sound Mark"),
];

const OWNER_TYPES: &[FieldOption] = &[
    opt("individual", "Individual"),
    opt("corporation", "Corporation"),
    opt("llc", "Limited Liability Company"),
    opt("partnership", "Partnership"),
    opt("association", "Association"),
];

const FILING_BASES: &[FieldOption] = &[
    opt("use", "Use in Commerce (already using the mark)"),
    opt("intent", "Intent to Use (plan to use in the future)"),
    opt("foreign", "Foreign Registration"),
    opt("treaty", "International Treaty"),
];

const TRADEMARK_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("markName", "Trademark Name", "Enter the exact text of your trademark"),
    FieldDescriptor {
        name: "markType",
        label: "Mark Type",
        kind: FieldKind::Radio,
        placeholder: None,
        options: MARK_TYPES,
        rows: None,
    },
    FieldDescriptor::text("ownerName", "Owner Name", "Full legal name of the trademark owner (person or entity)"),
    FieldDescriptor::select("ownerType", "Owner Type", "Select owner type", OWNER_TYPES),
    FieldDescriptor::textarea("ownerAddress", "Owner Address", "Full mailing address of the trademark owner", 3),
    FieldDescriptor::select("filingBasis", "Filing Basis", "Select filing basis", FILING_BASES),
];

#[must_use]
pub fn fields_for(filing_type: FilingType) -> &'static [FieldDescriptor] {
    match filing_type {
        FilingType::Patent => PATENT_FIELDS,
        FilingType::Trademark => TRADEMARK_FIELDS,
    }
}

#[must_use]
pub fn descriptor(filing_type: FilingType, name: &str) -> Option<&'static FieldDescriptor> {
    fields_for(filing_type).iter().find(|f| f.name == name)
}

#[cfg(test)]
#[path = "fields_test.rs"]
mod tests;
