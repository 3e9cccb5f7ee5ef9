// 📈 Aggregators - trends, intensities and target checks over stored records
//
// Pure folds over already-loaded slices. Undefined results (non-positive
// denominators, zero baselines, missing years, overflow) are None/false, never
// errors. Sums saturate at the decimal range; ratios use checked arithmetic.
// Safe to call from many threads against the same snapshot.

use crate::entities::{EmissionRecord, EnergyConsumption, MaterialityAssessment};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// EMISSION TREND
// ============================================================================

/// Total emissions per reporting year, ordered by year.
///
/// Years without records are absent, not zero-filled.
pub fn emission_trend(records: &[EmissionRecord]) -> BTreeMap<i32, Decimal> {
    let mut trend = BTreeMap::new();
    for record in records {
        let total = trend.entry(record.reporting_year).or_insert(Decimal::ZERO);
        *total = total.saturating_add(record.total_emissions());
    }
    trend
}

pub fn total_emissions_for_year(records: &[EmissionRecord], year: i32) -> Decimal {
    records
        .iter()
        .filter(|r| r.reporting_year == year)
        .fold(Decimal::ZERO, |sum, r| sum.saturating_add(r.total_emissions()))
}

// ============================================================================
// INTENSITY
// ============================================================================

/// total / base; None when the base is zero or negative.
pub fn emission_intensity(total_emissions: Decimal, intensity_base: Decimal) -> Option<Decimal> {
    if intensity_base <= Decimal::ZERO {
        return None;
    }
    total_emissions.checked_div(intensity_base)
}

/// Intensity of one year's summed emissions against a base such as revenue or headcount.
pub fn calculate_emission_intensity(
    records: &[EmissionRecord],
    year: i32,
    intensity_base: Decimal,
) -> Option<Decimal> {
    emission_intensity(total_emissions_for_year(records, year), intensity_base)
}

// ============================================================================
// VERIFICATION STATISTICS
// ============================================================================

/// Record count per verification status label; blank labels are not counted.
pub fn verification_statistics(records: &[EmissionRecord]) -> BTreeMap<String, usize> {
    let mut stats = BTreeMap::new();
    for record in records {
        let label = record.verification_status.as_str().trim();
        if label.is_empty() {
            continue;
        }
        *stats.entry(label.to_string()).or_insert(0) += 1;
    }
    stats
}

// ============================================================================
// TARGETS
// ============================================================================

/// (baseline - current) / baseline * 100; None for a zero baseline.
pub fn reduction_percentage(baseline_total: Decimal, current_total: Decimal) -> Option<Decimal> {
    if baseline_total.is_zero() {
        return None;
    }
    baseline_total
        .checked_sub(current_total)?
        .checked_div(baseline_total)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// False when the baseline is zero, since the reduction is undefined.
pub fn target_achieved(
    baseline_total: Decimal,
    current_total: Decimal,
    target_reduction_percentage: Decimal,
) -> bool {
    reduction_percentage(baseline_total, current_total)
        .map(|actual| actual >= target_reduction_percentage)
        .unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCheck {
    pub baseline_year: i32,
    pub current_year: i32,
    pub baseline_total: Option<Decimal>,
    pub current_total: Option<Decimal>,
    pub target_reduction_percentage: Decimal,
    pub actual_reduction_percentage: Option<Decimal>,
    pub achieved: bool,
}

impl TargetCheck {
    pub fn summary(&self) -> String {
        match self.actual_reduction_percentage {
            Some(actual) => format!(
                "{} -> {}: {}% reduction vs {}% target ({})",
                self.baseline_year,
                self.current_year,
                actual.round_dp(2),
                self.target_reduction_percentage,
                if self.achieved { "met" } else { "not met" }
            ),
            None => format!(
                "{} -> {}: reduction undefined (missing year or zero baseline)",
                self.baseline_year, self.current_year
            ),
        }
    }
}

/// Target check between two years of a trend series.
///
/// A year missing from the trend leaves the reduction undefined and the
/// target not achieved.
pub fn check_target(
    trend: &BTreeMap<i32, Decimal>,
    baseline_year: i32,
    current_year: i32,
    target_reduction_percentage: Decimal,
) -> TargetCheck {
    let baseline_total = trend.get(&baseline_year).copied();
    let current_total = trend.get(&current_year).copied();

    let actual_reduction_percentage = match (baseline_total, current_total) {
        (Some(baseline), Some(current)) => reduction_percentage(baseline, current),
        _ => None,
    };

    TargetCheck {
        baseline_year,
        current_year,
        baseline_total,
        current_total,
        target_reduction_percentage,
        actual_reduction_percentage,
        achieved: actual_reduction_percentage
            .map(|actual| actual >= target_reduction_percentage)
            .unwrap_or(false),
    }
}

// ============================================================================
// YEAR-OVER-YEAR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearOverYear {
    pub year: i32,
    pub total: Decimal,
    /// Change vs the previous year present in the series
    pub previous_year: Option<i32>,
    /// Positive = increase; None for the first year or a zero previous total
    pub change_percentage: Option<Decimal>,
}

pub fn year_over_year(trend: &BTreeMap<i32, Decimal>) -> Vec<YearOverYear> {
    let mut rows = Vec::with_capacity(trend.len());
    let mut previous: Option<(i32, Decimal)> = None;

    for (&year, &total) in trend {
        let change_percentage = previous.and_then(|(_, prev_total)| {
            reduction_percentage(prev_total, total).map(|reduction| -reduction)
        });

        rows.push(YearOverYear {
            year,
            total,
            previous_year: previous.map(|(y, _)| y),
            change_percentage,
        });
        previous = Some((year, total));
    }

    rows
}

// ============================================================================
// ENERGY & MATERIALITY
// ============================================================================

/// Renewable share of consumption in percent; None when nothing was consumed.
pub fn renewable_share(records: &[EnergyConsumption], year: i32) -> Option<Decimal> {
    let (renewable, total) = records
        .iter()
        .filter(|r| r.reporting_year == year)
        .try_fold((Decimal::ZERO, Decimal::ZERO), |(renewable, total), r| {
            let renewable = if r.is_renewable {
                renewable.checked_add(r.consumption_mwh)?
            } else {
                renewable
            };
            Some((renewable, total.checked_add(r.consumption_mwh)?))
        })?;

    if total <= Decimal::ZERO {
        return None;
    }
    renewable
        .checked_div(total)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Material topics for a year, highest materiality score first.
pub fn material_topics(assessments: &[MaterialityAssessment], year: i32) -> Vec<MaterialityAssessment> {
    let mut topics: Vec<MaterialityAssessment> = assessments
        .iter()
        .filter(|a| a.reporting_year == year && a.is_material())
        .cloned()
        .collect();

    topics.sort_by(|a, b| {
        b.materiality_score()
            .cmp(&a.materiality_score())
            .then_with(|| a.topic.cmp(&b.topic))
    });
    topics
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::VerificationStatus;
    use std::str::FromStr;

    fn emission(year: i32, s1: i64, s2m: i64, s3: i64) -> EmissionRecord {
        EmissionRecord::new(
            year,
            Decimal::from(s1),
            Decimal::from(s2m),
            Decimal::from(s2m),
            Decimal::from(s3),
        )
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_trend_groups_and_orders_by_year() {
        let records = vec![
            emission(2024, 50, 20, 10),
            emission(2022, 100, 0, 0),
            emission(2024, 0, 0, 0),
            emission(2024, 0, 0, 0),
        ];

        let trend = emission_trend(&records);
        let years: Vec<i32> = trend.keys().copied().collect();

        assert_eq!(years, vec![2022, 2024]);
        assert_eq!(trend[&2022], Decimal::from(100));
        assert_eq!(trend[&2024], Decimal::from(80));
        assert!(!trend.contains_key(&2023));
    }

    #[test]
    fn test_intensity_undefined_for_non_positive_base() {
        let total = Decimal::from(150);
        assert_eq!(emission_intensity(total, Decimal::ZERO), None);
        assert_eq!(emission_intensity(total, Decimal::from(-10)), None);
        assert_eq!(emission_intensity(total, Decimal::from(3)), Some(Decimal::from(50)));
    }

    #[test]
    fn test_intensity_for_year_sums_records() {
        let records = vec![emission(2024, 100, 0, 0), emission(2024, 50, 0, 0), emission(2023, 999, 0, 0)];
        assert_eq!(
            calculate_emission_intensity(&records, 2024, dec("1.5")),
            Some(Decimal::from(100))
        );
        assert_eq!(calculate_emission_intensity(&records, 2024, Decimal::ZERO), None);
    }

    #[test]
    fn test_verification_statistics_skip_blank_labels() {
        let records = vec![
            emission(2024, 1, 1, 1),
            emission(2024, 1, 1, 1).with_verification(VerificationStatus::LimitedAssurance),
            emission(2023, 1, 1, 1).with_verification(VerificationStatus::LimitedAssurance),
            emission(2023, 1, 1, 1).with_verification(VerificationStatus::Other("  ".to_string())),
        ];

        let stats = verification_statistics(&records);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats["Unverified"], 1);
        assert_eq!(stats["Limited Assurance"], 2);
    }

    #[test]
    fn test_target_met_with_twenty_percent_reduction() {
        let records = vec![emission(2023, 100, 0, 0), emission(2024, 80, 0, 0)];
        let trend = emission_trend(&records);

        let check = check_target(&trend, 2023, 2024, Decimal::from(15));
        assert_eq!(check.actual_reduction_percentage, Some(Decimal::from(20)));
        assert!(check.achieved);

        let check = check_target(&trend, 2023, 2024, Decimal::from(25));
        assert!(!check.achieved);
        assert!(check.summary().contains("not met"));
    }

    #[test]
    fn test_zero_baseline_is_not_achieved() {
        assert!(!target_achieved(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
        assert_eq!(reduction_percentage(Decimal::ZERO, Decimal::from(5)), None);
    }

    #[test]
    fn test_missing_year_is_not_achieved() {
        let trend = emission_trend(&[emission(2023, 100, 0, 0)]);
        let check = check_target(&trend, 2023, 2024, Decimal::from(10));
        assert_eq!(check.current_total, None);
        assert_eq!(check.actual_reduction_percentage, None);
        assert!(!check.achieved);
    }

    #[test]
    fn test_year_over_year() {
        let trend = emission_trend(&[
            emission(2021, 200, 0, 0),
            emission(2022, 150, 0, 0),
            emission(2024, 165, 0, 0),
        ]);

        let rows = year_over_year(&trend);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].change_percentage, None);
        assert_eq!(rows[1].change_percentage, Some(Decimal::from(-25)));
        assert_eq!(rows[2].previous_year, Some(2022));
        assert_eq!(rows[2].change_percentage, Some(Decimal::from(10)));
    }

    #[test]
    fn test_renewable_share() {
        let records = vec![
            EnergyConsumption::new(2024, "Solar", Decimal::from(25), true),
            EnergyConsumption::new(2024, "Natural gas", Decimal::from(75), false),
            EnergyConsumption::new(2023, "Wind", Decimal::from(10), true),
        ];

        assert_eq!(renewable_share(&records, 2024), Some(Decimal::from(25)));
        assert_eq!(renewable_share(&records, 2023), Some(Decimal::from(100)));
        assert_eq!(renewable_share(&records, 2022), None);
    }

    #[test]
    fn test_out_of_range_totals_do_not_panic() {
        let mut huge = EmissionRecord::new(2024, Decimal::MAX, Decimal::ZERO, Decimal::ZERO, Decimal::ONE);
        huge.scope2_market = Decimal::MAX;
        let records = vec![huge, emission(2023, 10, 0, 0)];

        let trend = emission_trend(&records);
        assert_eq!(trend[&2024], Decimal::MAX);
        assert_eq!(total_emissions_for_year(&records, 2024), Decimal::MAX);

        let check = check_target(&trend, 2023, 2024, Decimal::from(10));
        assert!(!check.achieved);
        assert_eq!(year_over_year(&trend).len(), 2);
    }

    #[test]
    fn test_reduction_overflow_is_undefined() {
        assert_eq!(reduction_percentage(dec("0.001"), dec("1000000000000000000000000")), None);
        assert!(!target_achieved(dec("0.001"), dec("1000000000000000000000000"), Decimal::from(5)));
        assert_eq!(reduction_percentage(Decimal::MIN, Decimal::MAX), None);
    }

    #[test]
    fn test_renewable_share_overflow_is_undefined() {
        let records = vec![
            EnergyConsumption::new(2024, "Solar", Decimal::MAX, true),
            EnergyConsumption::new(2024, "Wind", Decimal::MAX, true),
        ];
        assert_eq!(renewable_share(&records, 2024), None);
    }

    #[test]
    fn test_material_topics_ordered_by_score() {
        let assessments = vec![
            MaterialityAssessment::new(2024, "Water", 3, 1),
            MaterialityAssessment::new(2024, "Climate change", 5, 4),
            MaterialityAssessment::new(2024, "Biodiversity", 2, 2),
            MaterialityAssessment::new(2023, "Pollution", 5, 5),
        ];

        let topics: Vec<String> = material_topics(&assessments, 2024)
            .into_iter()
            .map(|a| a.topic)
            .collect();
        assert_eq!(topics, vec!["Climate change".to_string(), "Water".to_string()]);
    }
}
