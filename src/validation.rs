// ✅ Rule Validators - structural and business rules per disclosure entity
//
// Every validator is a pure function: entity in, findings out.
// No storage access, no logging, no wall clock (the current year comes from
// the ValidationContext). Findings are never dropped; the caller decides
// what blocks persistence (any Error rejects the write, Warnings never do).

use crate::entities::{
    DataQuality, EmissionRecord, EnergyConsumption, MaterialityAssessment, VerificationStatus,
    WorkforceDiversity,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// FINDINGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Blocks persistence
    Error,
    /// Surfaced for operator awareness only
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub field: String,
    pub message: String,
}

impl Finding {
    pub fn error(field: &str, message: impl Into<String>) -> Self {
        Finding {
            severity: Severity::Error,
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn warning(field: &str, message: impl Into<String>) -> Self {
        Finding {
            severity: Severity::Warning,
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}: {}", self.severity, self.field, self.message)
    }
}

/// Findings for one entity, with the write-blocking policy attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn new(findings: Vec<Finding>) -> Self {
        ValidationReport { findings }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_error())
    }

    /// At least one Error rejects the write.
    pub fn blocks_persistence(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} error(s), {} warning(s)",
            self.errors().count(),
            self.warnings().count()
        )
    }
}

// ============================================================================
// CONTEXT
// ============================================================================

/// Inputs the rules need that do not live on the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationContext {
    /// First reporting year accepted by the regulator
    pub min_reporting_year: i32,

    /// Supplied by the caller so the rules stay clock-free
    pub current_year: i32,
}

impl ValidationContext {
    pub fn new(min_reporting_year: i32, current_year: i32) -> Self {
        ValidationContext {
            min_reporting_year,
            current_year,
        }
    }

    /// Upper bound allows next year's figures to be prepared in advance.
    pub fn max_reporting_year(&self) -> i32 {
        self.current_year + 1
    }

    pub fn accepts_year(&self, year: i32) -> bool {
        year >= self.min_reporting_year && year <= self.max_reporting_year()
    }
}

/// Implemented by every entity kind that goes through the write path.
pub trait Validate {
    fn validate(&self, ctx: &ValidationContext) -> Vec<Finding>;

    fn validation_report(&self, ctx: &ValidationContext) -> ValidationReport {
        ValidationReport::new(self.validate(ctx))
    }
}

impl Validate for EmissionRecord {
    fn validate(&self, ctx: &ValidationContext) -> Vec<Finding> {
        validate_emission(self, ctx)
    }
}

impl Validate for EnergyConsumption {
    fn validate(&self, ctx: &ValidationContext) -> Vec<Finding> {
        validate_energy(self, ctx)
    }
}

impl Validate for WorkforceDiversity {
    fn validate(&self, ctx: &ValidationContext) -> Vec<Finding> {
        validate_workforce(self, ctx)
    }
}

impl Validate for MaterialityAssessment {
    fn validate(&self, ctx: &ValidationContext) -> Vec<Finding> {
        validate_materiality(self, ctx)
    }
}

// ============================================================================
// SHARED RULES
// ============================================================================

fn check_reporting_year(year: i32, ctx: &ValidationContext, findings: &mut Vec<Finding>) {
    if !ctx.accepts_year(year) {
        findings.push(Finding::error(
            "reporting_year",
            format!(
                "Reporting year {} is outside the accepted range {}-{}",
                year,
                ctx.min_reporting_year,
                ctx.max_reporting_year()
            ),
        ));
    }
}

/// Largest accepted quantity (tCO2e, MWh, hours): 10^12.
///
/// Keeps sums of stored records far inside the decimal range.
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

fn check_quantity(field: &str, label: &str, value: Decimal, findings: &mut Vec<Finding>) {
    if value < Decimal::ZERO {
        findings.push(Finding::error(
            field,
            format!("{} cannot be negative (got {})", label, value),
        ));
    } else if value > MAX_QUANTITY {
        findings.push(Finding::error(
            field,
            format!("{} exceeds the maximum of {} (got {})", label, MAX_QUANTITY, value),
        ));
    }
}

fn check_non_negative_count(field: &str, label: &str, value: i64, findings: &mut Vec<Finding>) {
    if value < 0 {
        findings.push(Finding::error(
            field,
            format!("{} cannot be negative (got {})", label, value),
        ));
    }
}

/// High-confidence data is expected to carry some verification evidence.
fn check_data_quality(
    data_quality: Option<&DataQuality>,
    verification: &VerificationStatus,
    findings: &mut Vec<Finding>,
) {
    if let Some(quality) = data_quality {
        if !quality.is_known() {
            findings.push(Finding::warning(
                "data_quality",
                format!(
                    "Non-standard data quality '{}' (expected one of: {})",
                    quality,
                    join_labels(DataQuality::KNOWN.iter().map(|q| q.as_str()))
                ),
            ));
        }
    }

    if !verification.is_known() {
        let message = if verification.is_blank() {
            "Verification status is empty".to_string()
        } else {
            format!(
                "Non-standard verification status '{}' (expected one of: {})",
                verification,
                join_labels(VerificationStatus::KNOWN.iter().map(|v| v.as_str()))
            )
        };
        findings.push(Finding::warning("verification_status", message));
    }

    if data_quality == Some(&DataQuality::High) && *verification == VerificationStatus::Unverified {
        findings.push(Finding::warning(
            "verification_status",
            "High data quality is claimed but the data is unverified",
        ));
    }
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}

// ============================================================================
// EMISSIONS
// ============================================================================

pub fn validate_emission(record: &EmissionRecord, ctx: &ValidationContext) -> Vec<Finding> {
    let mut findings = Vec::new();

    check_reporting_year(record.reporting_year, ctx, &mut findings);

    check_quantity("scope1", "Scope 1 emissions", record.scope1, &mut findings);
    check_quantity(
        "scope2_location",
        "Scope 2 location-based emissions",
        record.scope2_location,
        &mut findings,
    );
    check_quantity(
        "scope2_market",
        "Scope 2 market-based emissions",
        record.scope2_market,
        &mut findings,
    );
    check_quantity("scope3", "Scope 3 emissions", record.scope3, &mut findings);

    // Legitimate when renewable certificates are cancelled, but unusual.
    if record.scope2_location > Decimal::ZERO && record.scope2_market > record.scope2_location {
        findings.push(Finding::warning(
            "scope2_market",
            format!(
                "Market-based Scope 2 ({}) exceeds location-based Scope 2 ({})",
                record.scope2_market, record.scope2_location
            ),
        ));
    }

    if record.all_scopes_zero() {
        findings.push(Finding::warning(
            "scopes",
            "All scopes are zero - possible missing data",
        ));
    }

    check_data_quality(
        record.data_quality.as_ref(),
        &record.verification_status,
        &mut findings,
    );

    findings
}

// ============================================================================
// ENERGY
// ============================================================================

const RENEWABLE_KEYWORDS: [&str; 5] = ["solar", "wind", "hydro", "geothermal", "biomass"];
const NON_RENEWABLE_KEYWORDS: [&str; 4] = ["coal", "natural gas", "oil", "nuclear"];

/// Heuristic classification of a free-text energy source label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceClass {
    Renewable,
    NonRenewable,
    /// Matches neither keyword set, or both
    Unclassified,
}

/// Keywords match at word starts, so "hydroelectric" is renewable and "boiler" is not oil.
pub fn classify_energy_source(label: &str) -> SourceClass {
    let lower = label.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let renewable = RENEWABLE_KEYWORDS.iter().any(|k| label_has_keyword(&words, k));
    let non_renewable = NON_RENEWABLE_KEYWORDS
        .iter()
        .any(|k| label_has_keyword(&words, k));

    match (renewable, non_renewable) {
        (true, false) => SourceClass::Renewable,
        (false, true) => SourceClass::NonRenewable,
        _ => SourceClass::Unclassified,
    }
}

fn label_has_keyword(words: &[&str], keyword: &str) -> bool {
    let keyword_words: Vec<&str> = keyword.split_whitespace().collect();
    if keyword_words.is_empty() || words.len() < keyword_words.len() {
        return false;
    }

    words.windows(keyword_words.len()).any(|window| {
        window
            .iter()
            .zip(&keyword_words)
            .all(|(word, kw)| word.starts_with(kw))
    })
}

pub fn validate_energy(record: &EnergyConsumption, ctx: &ValidationContext) -> Vec<Finding> {
    let mut findings = Vec::new();

    check_reporting_year(record.reporting_year, ctx, &mut findings);

    check_quantity(
        "consumption_mwh",
        "Energy consumption",
        record.consumption_mwh,
        &mut findings,
    );
    check_quantity(
        "grid_electricity_mwh",
        "Grid electricity",
        record.grid_electricity_mwh,
        &mut findings,
    );
    check_quantity(
        "self_generated_renewable_mwh",
        "Self-generated renewable energy",
        record.self_generated_renewable_mwh,
        &mut findings,
    );
    check_quantity(
        "renewable_certificates_mwh",
        "Purchased renewable certificates",
        record.renewable_certificates_mwh,
        &mut findings,
    );
    if let Some(ratio) = record.intensity_ratio {
        check_quantity("intensity_ratio", "Energy intensity ratio", ratio, &mut findings);
    }

    if record.energy_source.trim().is_empty() {
        findings.push(Finding::error("energy_source", "Energy source is required"));
        return findings;
    }

    // Labels are free text, so a mismatch is only ever a warning.
    match (classify_energy_source(&record.energy_source), record.is_renewable) {
        (SourceClass::NonRenewable, true) => findings.push(Finding::warning(
            "is_renewable",
            format!(
                "'{}' looks like a non-renewable source but is flagged renewable",
                record.energy_source
            ),
        )),
        (SourceClass::Renewable, false) => findings.push(Finding::warning(
            "is_renewable",
            format!(
                "'{}' looks like a renewable source but is flagged non-renewable",
                record.energy_source
            ),
        )),
        _ => {}
    }

    findings
}

// ============================================================================
// WORKFORCE
// ============================================================================

pub fn validate_workforce(record: &WorkforceDiversity, ctx: &ValidationContext) -> Vec<Finding> {
    let mut findings = Vec::new();

    check_reporting_year(record.reporting_year, ctx, &mut findings);

    let counts = [
        ("total_employees", "Total employees", record.total_employees),
        ("female_employees", "Female employees", record.female_employees),
        ("male_employees", "Male employees", record.male_employees),
        ("non_binary_employees", "Non-binary employees", record.non_binary_employees),
        ("employees_under_30", "Employees under 30", record.employees_under_30),
        ("employees_30_to_50", "Employees aged 30-50", record.employees_30_to_50),
        ("employees_over_50", "Employees over 50", record.employees_over_50),
        (
            "employees_with_disability",
            "Employees with disability",
            record.employees_with_disability,
        ),
        (
            "ethnic_minority_employees",
            "Ethnic minority employees",
            record.ethnic_minority_employees,
        ),
    ];
    for (field, label, value) in counts {
        check_non_negative_count(field, label, value, &mut findings);
    }

    check_quantity(
        "average_training_hours",
        "Average training hours",
        record.average_training_hours,
        &mut findings,
    );

    if record.turnover_rate < Decimal::ZERO || record.turnover_rate > Decimal::ONE_HUNDRED {
        findings.push(Finding::error(
            "turnover_rate",
            format!(
                "Turnover rate must be between 0 and 100% (got {})",
                record.turnover_rate
            ),
        ));
    }

    let total = record.total_employees;
    if total > 0 {
        match record.gender_sum() {
            Some(gender_sum) if gender_sum == total => {}
            Some(gender_sum) => findings.push(Finding::error(
                "gender_breakdown",
                format!(
                    "Gender breakdown sums to {} but total employees is {}",
                    gender_sum, total
                ),
            )),
            None => findings.push(Finding::error(
                "gender_breakdown",
                format!(
                    "Gender breakdown overflows and cannot match total employees ({})",
                    total
                ),
            )),
        }

        // Age bands are often reported for a subset, so only warn.
        match record.age_band_sum() {
            Some(age_sum) if age_sum <= 0 || age_sum == total => {}
            Some(age_sum) => findings.push(Finding::warning(
                "age_bands",
                format!(
                    "Age bands sum to {} but total employees is {}",
                    age_sum, total
                ),
            )),
            None => findings.push(Finding::warning(
                "age_bands",
                format!(
                    "Age bands overflow and cannot match total employees ({})",
                    total
                ),
            )),
        }

        if record.employees_with_disability > total {
            findings.push(Finding::warning(
                "employees_with_disability",
                format!(
                    "Employees with disability ({}) exceed total employees ({})",
                    record.employees_with_disability, total
                ),
            ));
        }

        if record.ethnic_minority_employees > total {
            findings.push(Finding::warning(
                "ethnic_minority_employees",
                format!(
                    "Ethnic minority employees ({}) exceed total employees ({})",
                    record.ethnic_minority_employees, total
                ),
            ));
        }
    }

    findings
}

// ============================================================================
// MATERIALITY
// ============================================================================

const MIN_SCORE: i32 = 1;
const MAX_SCORE: i32 = 5;

pub fn validate_materiality(
    assessment: &MaterialityAssessment,
    ctx: &ValidationContext,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    check_reporting_year(assessment.reporting_year, ctx, &mut findings);

    if assessment.topic.trim().is_empty() {
        findings.push(Finding::error("topic", "Sustainability topic is required"));
    }

    for (field, label, score) in [
        ("impact_score", "Impact materiality score", assessment.impact_score),
        ("financial_score", "Financial materiality score", assessment.financial_score),
    ] {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            findings.push(Finding::error(
                field,
                format!(
                    "{} must be between {} and {} (got {})",
                    label, MIN_SCORE, MAX_SCORE, score
                ),
            ));
        }
    }

    if !assessment.review_status.is_known() {
        findings.push(Finding::warning(
            "review_status",
            format!(
                "Non-standard review status '{}' (expected Draft, Under Review or Approved)",
                assessment.review_status
            ),
        ));
    }

    findings
}

// ============================================================================
// TESTS
// ============================================================================
