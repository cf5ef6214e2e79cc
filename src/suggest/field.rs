//! Field type tags — which wizard input a suggestion request concerns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Field type tag. Unknown tags are kept verbatim and get the generic
/// suggestion vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    TrademarkName,
    OwnerInfo,
    BusinessDescription,
    GoodsServices,
    UsageEvidence,
    PatentTitle,
    PatentDescription,
    PatentClaims,
    Other(String),
}

impl FieldType {
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag {
            "trademark-name" => Self::TrademarkName,
            "owner-info" => Self::OwnerInfo,
            "business-description" => Self::BusinessDescription,
            "goods-services" => Self::GoodsServices,
            "usage-evidence" => Self::UsageEvidence,
            "patent-title" => Self::PatentTitle,
            "patent-description" => Self::PatentDescription,
            "patent-claims" => Self::PatentClaims,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::TrademarkName => "trademark-name",
            Self::OwnerInfo => "owner-info",
            Self::BusinessDescription => "business-description",
            Self::GoodsServices => "goods-services",
            Self::UsageEvidence => "usage-evidence",
            Self::PatentTitle => "patent-title",
            Self::PatentDescription => "patent-description",
            Self::PatentClaims => "patent-claims",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<FieldType> for String {
    fn from(field: FieldType) -> Self {
        field.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
