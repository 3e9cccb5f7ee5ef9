// 🏷️ Enumerated text fields with open extension
//
// Known values are closed variants; anything else is kept verbatim in `Other`
// so the validators can flag it as a warning without losing the original text.
// All three serialize as their plain label (stored as TEXT in SQLite).

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// DATA QUALITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataQuality {
    /// Measured, metered or invoiced data
    High,

    /// Partially measured, partially calculated
    Medium,

    /// Calculated from proxies or spend data
    Low,

    /// Management estimate
    Estimated,

    /// Non-standard label, kept as entered
    Other(String),
}

impl DataQuality {
    pub const KNOWN: [DataQuality; 4] = [
        DataQuality::High,
        DataQuality::Medium,
        DataQuality::Low,
        DataQuality::Estimated,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            DataQuality::High => "High",
            DataQuality::Medium => "Medium",
            DataQuality::Low => "Low",
            DataQuality::Estimated => "Estimated",
            DataQuality::Other(label) => label,
        }
    }

    /// Parse a label, matching known values case-insensitively.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" => DataQuality::High,
            "medium" => DataQuality::Medium,
            "low" => DataQuality::Low,
            "estimated" => DataQuality::Estimated,
            _ => DataQuality::Other(label.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, DataQuality::Other(_))
    }
}

impl From<String> for DataQuality {
    fn from(label: String) -> Self {
        DataQuality::from_label(&label)
    }
}

impl From<DataQuality> for String {
    fn from(value: DataQuality) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// VERIFICATION STATUS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VerificationStatus {
    #[default]
    Unverified,

    /// Reviewed by internal audit, no external assurance
    InternallyReviewed,

    /// External limited assurance engagement
    LimitedAssurance,

    /// External reasonable assurance engagement
    ReasonableAssurance,

    /// Non-standard label, kept as entered
    Other(String),
}

impl VerificationStatus {
    pub const KNOWN: [VerificationStatus; 4] = [
        VerificationStatus::Unverified,
        VerificationStatus::InternallyReviewed,
        VerificationStatus::LimitedAssurance,
        VerificationStatus::ReasonableAssurance,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            VerificationStatus::Unverified => "Unverified",
            VerificationStatus::InternallyReviewed => "Internally Reviewed",
            VerificationStatus::LimitedAssurance => "Limited Assurance",
            VerificationStatus::ReasonableAssurance => "Reasonable Assurance",
            VerificationStatus::Other(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "unverified" => VerificationStatus::Unverified,
            "internally reviewed" => VerificationStatus::InternallyReviewed,
            "limited assurance" => VerificationStatus::LimitedAssurance,
            "reasonable assurance" => VerificationStatus::ReasonableAssurance,
            _ => VerificationStatus::Other(label.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, VerificationStatus::Other(_))
    }

    /// True when the label carries no text at all (an empty `Other`).
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }

    /// Any status other than `Unverified` or a blank label counts as verification evidence.
    pub fn is_verified(&self) -> bool {
        !matches!(self, VerificationStatus::Unverified) && !self.is_blank()
    }
}

impl From<String> for VerificationStatus {
    fn from(label: String) -> Self {
        VerificationStatus::from_label(&label)
    }
}

impl From<VerificationStatus> for String {
    fn from(value: VerificationStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// REVIEW STATUS (materiality assessments)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReviewStatus {
    #[default]
    Draft,
    UnderReview,
    Approved,
    Other(String),
}

impl ReviewStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ReviewStatus::Draft => "Draft",
            ReviewStatus::UnderReview => "Under Review",
            ReviewStatus::Approved => "Approved",
            ReviewStatus::Other(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "draft" => ReviewStatus::Draft,
            "under review" => ReviewStatus::UnderReview,
            "approved" => ReviewStatus::Approved,
            _ => ReviewStatus::Other(label.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ReviewStatus::Other(_))
    }
}

impl From<String> for ReviewStatus {
    fn from(label: String) -> Self {
        ReviewStatus::from_label(&label)
    }
}

impl From<ReviewStatus> for String {
    fn from(value: ReviewStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================
