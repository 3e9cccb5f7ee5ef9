// 📊 Completeness Assessors - how much of a disclosure is present
//
// Facts are a fixed set of named categories, each present or absent.
// The percentage is recomputed from the raw counts on every call and the tier
// is chosen by integer cross-multiplication, so a score like 1/3 can never
// drift across a threshold through rounding.

use crate::entities::{EmissionRecord, EnergyConsumption, MaterialityAssessment, WorkforceDiversity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// TIERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletenessTier {
    #[serde(rename = "Complete")]
    Complete,
    #[serde(rename = "Mostly Complete")]
    MostlyComplete,
    #[serde(rename = "Partially Complete")]
    PartiallyComplete,
    #[serde(rename = "Limited Data")]
    LimitedData,
    #[serde(rename = "Insufficient Data")]
    InsufficientData,
}

impl CompletenessTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletenessTier::Complete => "Complete",
            CompletenessTier::MostlyComplete => "Mostly Complete",
            CompletenessTier::PartiallyComplete => "Partially Complete",
            CompletenessTier::LimitedData => "Limited Data",
            CompletenessTier::InsufficientData => "Insufficient Data",
        }
    }
}

impl std::fmt::Display for CompletenessTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered highest first: the first threshold the score reaches wins.
const TIER_THRESHOLDS: [(u64, CompletenessTier); 5] = [
    (100, CompletenessTier::Complete),
    (75, CompletenessTier::MostlyComplete),
    (50, CompletenessTier::PartiallyComplete),
    (25, CompletenessTier::LimitedData),
    (0, CompletenessTier::InsufficientData),
];

fn tier_for(present: usize, total: usize) -> CompletenessTier {
    if total == 0 {
        return CompletenessTier::InsufficientData;
    }

    let present = present as u64;
    let total = total as u64;
    TIER_THRESHOLDS
        .iter()
        .find(|(threshold, _)| present * 100 >= threshold * total)
        .map(|(_, tier)| *tier)
        .unwrap_or(CompletenessTier::InsufficientData)
}

// ============================================================================
// FACTS
// ============================================================================

/// A fixed, ordered set of required categories and whether each is present.
pub trait CompletenessFacts {
    fn categories(&self) -> Vec<(&'static str, bool)>;
}

/// Overall ESRS disclosure: environmental, social, governance, materiality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsrsFacts {
    pub environmental: bool,
    pub social: bool,
    pub governance: bool,
    pub materiality: bool,
}

impl CompletenessFacts for EsrsFacts {
    fn categories(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("Environmental data (ESRS E)", self.environmental),
            ("Social data (ESRS S)", self.social),
            ("Governance data (ESRS G)", self.governance),
            ("Double materiality assessment", self.materiality),
        ]
    }
}

impl EsrsFacts {
    /// Derive the facts for one year from already-loaded records.
    ///
    /// Governance has no entity of its own; it counts as present when a
    /// governance topic (ESRS G standard or governance/business conduct topic)
    /// was assessed for the year.
    pub fn from_records(
        year: i32,
        emissions: &[EmissionRecord],
        energy: &[EnergyConsumption],
        workforce: &[WorkforceDiversity],
        materiality: &[MaterialityAssessment],
    ) -> Self {
        let assessed: Vec<&MaterialityAssessment> = materiality
            .iter()
            .filter(|a| a.reporting_year == year)
            .collect();

        EsrsFacts {
            environmental: emissions.iter().any(|e| e.reporting_year == year)
                || energy.iter().any(|e| e.reporting_year == year),
            social: workforce.iter().any(|w| w.reporting_year == year),
            governance: assessed.iter().any(|a| a.is_governance_topic()),
            materiality: !assessed.is_empty(),
        }
    }
}

/// Emissions disclosure for a single year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionFacts {
    pub scope1: bool,
    pub scope2: bool,
    pub scope3: bool,
    pub verification: bool,
    pub data_quality: bool,
}

impl CompletenessFacts for EmissionFacts {
    fn categories(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("Scope 1 emissions", self.scope1),
            ("Scope 2 emissions", self.scope2),
            ("Scope 3 emissions", self.scope3),
            ("Third-party verification", self.verification),
            ("Data quality rating", self.data_quality),
        ]
    }
}

impl EmissionFacts {
    pub fn from_records(year: i32, emissions: &[EmissionRecord]) -> Self {
        let rows: Vec<&EmissionRecord> = emissions
            .iter()
            .filter(|e| e.reporting_year == year)
            .collect();

        EmissionFacts {
            scope1: rows.iter().any(|e| e.scope1 > Decimal::ZERO),
            scope2: rows.iter().any(|e| e.has_scope2()),
            scope3: rows.iter().any(|e| e.scope3 > Decimal::ZERO),
            verification: rows.iter().any(|e| e.verification_status.is_verified()),
            data_quality: rows.iter().any(|e| e.data_quality.is_some()),
        }
    }
}

// ============================================================================
// ASSESSMENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessAssessment {
    pub present: usize,
    pub total: usize,
    /// 100 * present / total, exact to the decimal type's precision
    pub percentage: Decimal,
    /// Missing category names in declaration order
    pub missing: Vec<String>,
    pub tier: CompletenessTier,
}

impl CompletenessAssessment {
    /// Percentage rounded for display; the tier never depends on this value.
    pub fn display_percentage(&self) -> Decimal {
        self.percentage.round_dp(2)
    }

    pub fn is_complete(&self) -> bool {
        self.tier == CompletenessTier::Complete
    }

    pub fn summary(&self) -> String {
        format!(
            "{}% ({}/{}) - {}",
            self.display_percentage(),
            self.present,
            self.total,
            self.tier
        )
    }
}

pub fn assess_completeness<F: CompletenessFacts + ?Sized>(facts: &F) -> CompletenessAssessment {
    let categories = facts.categories();
    let total = categories.len();
    let present = categories.iter().filter(|(_, present)| *present).count();

    let missing = categories
        .iter()
        .filter(|(_, present)| !*present)
        .map(|(name, _)| name.to_string())
        .collect();

    let percentage = if total == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(present as u64 * 100) / Decimal::from(total as u64)
    };

    CompletenessAssessment {
        present,
        total,
        percentage,
        missing,
        tier: tier_for(present, total),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct ThreeFacts(bool, bool, bool);

    impl CompletenessFacts for ThreeFacts {
        fn categories(&self) -> Vec<(&'static str, bool)> {
            vec![("A", self.0), ("B", self.1), ("C", self.2)]
        }
    }

    #[test]
    fn test_half_complete_esrs() {
        let facts = EsrsFacts {
            environmental: true,
            social: true,
            governance: false,
            materiality: false,
        };
        let result = assess_completeness(&facts);

        assert_eq!(result.percentage, Decimal::from(50));
        assert_eq!(
            result.missing,
            vec![
                "Governance data (ESRS G)".to_string(),
                "Double materiality assessment".to_string()
            ]
        );
        assert_eq!(result.tier, CompletenessTier::PartiallyComplete);
        assert_eq!(result.tier.as_str(), "Partially Complete");
    }

    #[test]
    fn test_esrs_tiers() {
        let cases = [
            (0, CompletenessTier::InsufficientData),
            (1, CompletenessTier::LimitedData),
            (2, CompletenessTier::PartiallyComplete),
            (3, CompletenessTier::MostlyComplete),
            (4, CompletenessTier::Complete),
        ];

        for (present, tier) in cases {
            let facts = EsrsFacts {
                environmental: present >= 1,
                social: present >= 2,
                governance: present >= 3,
                materiality: present >= 4,
            };
            let result = assess_completeness(&facts);
            assert_eq!(result.tier, tier, "present={}", present);
            assert_eq!(result.percentage, Decimal::from(present * 25));
        }
    }

    #[test]
    fn test_emission_tiers() {
        let facts = EmissionFacts {
            scope1: true,
            scope2: true,
            scope3: true,
            verification: true,
            data_quality: false,
        };
        let result = assess_completeness(&facts);
        assert_eq!(result.percentage, Decimal::from(80));
        assert_eq!(result.tier, CompletenessTier::MostlyComplete);
        assert_eq!(result.missing, vec!["Data quality rating".to_string()]);

        let result = assess_completeness(&EmissionFacts::default());
        assert_eq!(result.tier, CompletenessTier::InsufficientData);
        assert_eq!(result.missing.len(), 5);
    }

    #[test]
    fn test_thirds_do_not_drift() {
        let one = assess_completeness(&ThreeFacts(true, false, false));
        let two = assess_completeness(&ThreeFacts(true, true, false));

        assert_eq!(one.tier, CompletenessTier::LimitedData);
        assert_eq!(two.tier, CompletenessTier::PartiallyComplete);
        assert_eq!(one.display_percentage().to_string(), "33.33");
        assert_eq!(two.display_percentage().to_string(), "66.67");
    }

    #[test]
    fn test_assessment_is_idempotent() {
        let facts = ThreeFacts(true, false, true);
        let first = assess_completeness(&facts);
        let second = assess_completeness(&facts);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_preserves_declaration_order() {
        let facts = EsrsFacts {
            environmental: false,
            social: true,
            governance: false,
            materiality: false,
        };
        let result = assess_completeness(&facts);
        assert_eq!(
            result.missing,
            vec![
                "Environmental data (ESRS E)".to_string(),
                "Governance data (ESRS G)".to_string(),
                "Double materiality assessment".to_string(),
            ]
        );
    }

    #[test]
    fn test_facts_from_records() {
        let emissions = vec![EmissionRecord::new(
            2024,
            Decimal::from(10),
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::from(5),
        )];
        let workforce = vec![WorkforceDiversity::new(2023, "All", 10)];
        let materiality = vec![
            MaterialityAssessment::new(2024, "Climate change", 5, 4).with_standard("ESRS E1"),
            MaterialityAssessment::new(2024, "Business conduct", 2, 3).with_standard("ESRS G1"),
        ];

        let esrs = EsrsFacts::from_records(2024, &emissions, &[], &workforce, &materiality);
        assert_eq!(
            esrs,
            EsrsFacts {
                environmental: true,
                social: false,
                governance: true,
                materiality: true,
            }
        );

        let scopes = EmissionFacts::from_records(2024, &emissions);
        assert!(scopes.scope1);
        assert!(!scopes.scope2);
        assert!(scopes.scope3);
        assert!(!scopes.verification);
        assert!(!scopes.data_quality);
    }
}
