// ⚖️ Materiality Assessment - double materiality for one sustainability topic
//
// A topic is material when either its impact score or its financial score
// reaches 3 on the 1-5 scale.

use super::{impl_disclosure, Audit, ReviewStatus};
use serde::{Deserialize, Serialize};

/// Scores at or above this threshold make a topic material.
pub const MATERIALITY_THRESHOLD: i32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialityAssessment {
    #[serde(default)]
    pub id: Option<i64>,

    pub reporting_year: i32,

    /// e.g. "Climate change mitigation"
    pub topic: String,

    /// e.g. "ESRS E1"
    #[serde(default)]
    pub linked_standard: Option<String>,

    /// Impact materiality (inside-out), 1-5
    pub impact_score: i32,

    /// Financial materiality (outside-in), 1-5
    pub financial_score: i32,

    #[serde(default)]
    pub time_horizon: String,

    #[serde(default)]
    pub stakeholder_groups: String,

    #[serde(default)]
    pub methodology: String,

    #[serde(default)]
    pub risks: String,

    #[serde(default)]
    pub opportunities: String,

    #[serde(default)]
    pub evidence: String,

    #[serde(default)]
    pub management_response: String,

    #[serde(default)]
    pub review_status: ReviewStatus,

    #[serde(default)]
    pub audit: Audit,
}

impl_disclosure!(MaterialityAssessment, "MaterialityAssessment");

impl MaterialityAssessment {
    pub fn new(reporting_year: i32, topic: impl Into<String>, impact_score: i32, financial_score: i32) -> Self {
        MaterialityAssessment {
            id: None,
            reporting_year,
            topic: topic.into(),
            linked_standard: None,
            impact_score,
            financial_score,
            time_horizon: String::new(),
            stakeholder_groups: String::new(),
            methodology: String::new(),
            risks: String::new(),
            opportunities: String::new(),
            evidence: String::new(),
            management_response: String::new(),
            review_status: ReviewStatus::default(),
            audit: Audit::default(),
        }
    }

    pub fn with_standard(mut self, standard: impl Into<String>) -> Self {
        self.linked_standard = Some(standard.into());
        self
    }

    pub fn is_material(&self) -> bool {
        self.impact_score >= MATERIALITY_THRESHOLD || self.financial_score >= MATERIALITY_THRESHOLD
    }

    pub fn materiality_score(&self) -> i32 {
        self.impact_score.max(self.financial_score)
    }

    /// Governance topics: linked to an ESRS G standard or named after governance/business conduct.
    pub fn is_governance_topic(&self) -> bool {
        let standard_is_governance = self
            .linked_standard
            .as_deref()
            .map(|s| s.trim().to_uppercase().starts_with("ESRS G"))
            .unwrap_or(false);

        let topic = self.topic.to_lowercase();
        standard_is_governance || topic.contains("governance") || topic.contains("business conduct")
    }
}
