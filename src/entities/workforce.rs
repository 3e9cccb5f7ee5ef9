// 👥 Workforce Diversity - headcount breakdown for one employee category and year
//
// Counts are signed so that bad input reaches the validators instead of
// failing at deserialization; the validators reject anything negative.

use super::{impl_disclosure, Audit};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkforceDiversity {
    #[serde(default)]
    pub id: Option<i64>,

    pub reporting_year: i32,

    /// e.g. "All employees", "Management", "Production"
    pub employee_category: String,

    pub total_employees: i64,

    // ========================================================================
    // GENDER BREAKDOWN (must sum to total when total > 0)
    // ========================================================================
    #[serde(default)]
    pub female_employees: i64,

    #[serde(default)]
    pub male_employees: i64,

    #[serde(default)]
    pub non_binary_employees: i64,

    // ========================================================================
    // AGE BANDS
    // ========================================================================
    #[serde(default)]
    pub employees_under_30: i64,

    #[serde(default)]
    pub employees_30_to_50: i64,

    #[serde(default)]
    pub employees_over_50: i64,

    #[serde(default)]
    pub employees_with_disability: i64,

    #[serde(default)]
    pub ethnic_minority_employees: i64,

    #[serde(default)]
    pub average_training_hours: Decimal,

    /// Percentage, 0-100
    #[serde(default)]
    pub turnover_rate: Decimal,

    /// Percentage difference between average male and female pay
    #[serde(default)]
    pub gender_pay_gap: Option<Decimal>,

    #[serde(default)]
    pub audit: Audit,
}

impl_disclosure!(WorkforceDiversity, "WorkforceDiversity");

impl WorkforceDiversity {
    pub fn new(reporting_year: i32, employee_category: impl Into<String>, total_employees: i64) -> Self {
        WorkforceDiversity {
            id: None,
            reporting_year,
            employee_category: employee_category.into(),
            total_employees,
            female_employees: 0,
            male_employees: 0,
            non_binary_employees: 0,
            employees_under_30: 0,
            employees_30_to_50: 0,
            employees_over_50: 0,
            employees_with_disability: 0,
            ethnic_minority_employees: 0,
            average_training_hours: Decimal::ZERO,
            turnover_rate: Decimal::ZERO,
            gender_pay_gap: None,
            audit: Audit::default(),
        }
    }

    /// Builder: gender breakdown (female, male, non-binary)
    pub fn with_gender(mut self, female: i64, male: i64, non_binary: i64) -> Self {
        self.female_employees = female;
        self.male_employees = male;
        self.non_binary_employees = non_binary;
        self
    }

    /// Builder: age bands (under 30, 30-50, over 50)
    pub fn with_age_bands(mut self, under_30: i64, between_30_and_50: i64, over_50: i64) -> Self {
        self.employees_under_30 = under_30;
        self.employees_30_to_50 = between_30_and_50;
        self.employees_over_50 = over_50;
        self
    }

    /// None when the counts overflow i64.
    pub fn gender_sum(&self) -> Option<i64> {
        self.female_employees
            .checked_add(self.male_employees)?
            .checked_add(self.non_binary_employees)
    }

    pub fn age_band_sum(&self) -> Option<i64> {
        self.employees_under_30
            .checked_add(self.employees_30_to_50)?
            .checked_add(self.employees_over_50)
    }

    /// Share of female employees in percent, None when there is no headcount
    pub fn female_percentage(&self) -> Option<Decimal> {
        share_of_total(self.female_employees, self.total_employees)
    }

    pub fn disability_percentage(&self) -> Option<Decimal> {
        share_of_total(self.employees_with_disability, self.total_employees)
    }
}

fn share_of_total(count: i64, total: i64) -> Option<Decimal> {
    if total <= 0 {
        return None;
    }
    Decimal::from(count)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .checked_div(Decimal::from(total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_percentages() {
        let mut w = WorkforceDiversity::new(2024, "All employees", 200).with_gender(90, 108, 2);
        w.employees_with_disability = 10;

        assert_eq!(w.gender_sum(), Some(200));
        assert_eq!(w.female_percentage(), Some(Decimal::from(45)));
        assert_eq!(w.disability_percentage(), Some(Decimal::from(5)));
    }

    #[test]
    fn test_percentages_undefined_without_headcount() {
        let w = WorkforceDiversity::new(2024, "Contractors", 0);
        assert_eq!(w.female_percentage(), None);
        assert_eq!(w.disability_percentage(), None);
    }

    #[test]
    fn test_sums_report_overflow() {
        let w = WorkforceDiversity::new(2024, "All", 1)
            .with_gender(i64::MAX, i64::MAX, 3)
            .with_age_bands(i64::MAX, 1, 0);

        assert_eq!(w.gender_sum(), None);
        assert_eq!(w.age_band_sum(), None);
    }

    #[test]
    fn test_extreme_headcount_percentage() {
        let mut w = WorkforceDiversity::new(2024, "All", i64::MAX);
        w.female_employees = i64::MAX;
        assert_eq!(w.female_percentage(), Some(Decimal::ONE_HUNDRED));
    }
}
