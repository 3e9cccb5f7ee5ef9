// 🧭 Disclosure Service - what the presentation layer talks to
//
// Submit: validate -> reject on any Error -> add (new) or full replace (has id).
// Assess/report: load from the stores, hand the snapshot to the pure core.

use crate::aggregation::{self, TargetCheck, YearOverYear};
use crate::completeness::{assess_completeness, CompletenessAssessment, EmissionFacts, EsrsFacts};
use crate::db::SqliteStore;
use crate::entities::{
    Disclosure, EmissionRecord, EnergyConsumption, MaterialityAssessment, WorkforceDiversity,
};
use crate::error::{DisclosureError, DisclosureResult};
use crate::store::{InMemoryStore, RecordStore};
use crate::validation::{Finding, Validate, ValidationContext};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

pub type SharedStore<T> = Arc<dyn RecordStore<T> + Send + Sync>;

/// A saved record plus the non-blocking warnings raised on the way in.
#[derive(Debug, Clone, Serialize)]
pub struct Submission<T> {
    pub record: T,
    pub warnings: Vec<Finding>,
}

/// Completeness for one year, both fact sets.
#[derive(Debug, Clone, Serialize)]
pub struct YearAssessment {
    pub year: i32,
    pub esrs: CompletenessAssessment,
    pub emissions: CompletenessAssessment,
}

pub struct DisclosureService {
    emissions: SharedStore<EmissionRecord>,
    energy: SharedStore<EnergyConsumption>,
    workforce: SharedStore<WorkforceDiversity>,
    materiality: SharedStore<MaterialityAssessment>,
    context: ValidationContext,
    created_by: String,
}

impl DisclosureService {
    pub fn new(
        emissions: SharedStore<EmissionRecord>,
        energy: SharedStore<EnergyConsumption>,
        workforce: SharedStore<WorkforceDiversity>,
        materiality: SharedStore<MaterialityAssessment>,
        context: ValidationContext,
    ) -> Self {
        DisclosureService {
            emissions,
            energy,
            workforce,
            materiality,
            context,
            created_by: String::new(),
        }
    }

    /// All four stores over one shared SQLite connection.
    pub fn sqlite(conn: Arc<Mutex<Connection>>, context: ValidationContext) -> Self {
        Self::new(
            Arc::new(SqliteStore::new(conn.clone())),
            Arc::new(SqliteStore::new(conn.clone())),
            Arc::new(SqliteStore::new(conn.clone())),
            Arc::new(SqliteStore::new(conn)),
            context,
        )
    }

    pub fn in_memory(context: ValidationContext) -> Self {
        Self::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryStore::new()),
            context,
        )
    }

    /// Default `created_by` for new records that arrive without one.
    pub fn with_created_by(mut self, creator: impl Into<String>) -> Self {
        self.created_by = creator.into();
        self
    }

    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    pub fn emissions(&self) -> &SharedStore<EmissionRecord> {
        &self.emissions
    }

    pub fn energy(&self) -> &SharedStore<EnergyConsumption> {
        &self.energy
    }

    pub fn workforce(&self) -> &SharedStore<WorkforceDiversity> {
        &self.workforce
    }

    pub fn materiality(&self) -> &SharedStore<MaterialityAssessment> {
        &self.materiality
    }

    // ========================================================================
    // WRITE PATH
    // ========================================================================

    fn submit<T>(&self, store: &SharedStore<T>, mut entity: T) -> DisclosureResult<Submission<T>>
    where
        T: Disclosure + Validate,
    {
        let report = entity.validation_report(&self.context);

        if report.blocks_persistence() {
            warn!(
                kind = T::KIND,
                year = entity.reporting_year(),
                summary = %report.summary(),
                "submission rejected"
            );
            return Err(DisclosureError::validation(T::KIND, report.findings));
        }

        // Only warnings remain.
        let warnings: Vec<Finding> = report.findings;
        for finding in &warnings {
            debug!(kind = T::KIND, field = %finding.field, "{}", finding.message);
        }

        let record = match entity.id() {
            Some(_) => store.update(entity)?,
            None => {
                if entity.audit().created_by.is_empty() {
                    entity.audit_mut().created_by = self.created_by.clone();
                }
                store.add(entity)?
            }
        };

        info!(
            kind = T::KIND,
            id = record.id(),
            year = record.reporting_year(),
            warnings = warnings.len(),
            "submission saved"
        );

        Ok(Submission { record, warnings })
    }

    fn remove<T: Disclosure>(&self, store: &SharedStore<T>, id: i64) -> DisclosureResult<()> {
        if id <= 0 {
            return Err(DisclosureError::InvalidId {
                entity: T::KIND,
                reason: format!("ids are positive, got {}", id),
            });
        }

        if store.delete(id)? {
            info!(kind = T::KIND, id, "record deleted");
            Ok(())
        } else {
            Err(DisclosureError::NotFound {
                entity: T::KIND,
                id,
            })
        }
    }

    pub fn submit_emission(&self, record: EmissionRecord) -> DisclosureResult<Submission<EmissionRecord>> {
        self.submit(&self.emissions, record)
    }

    pub fn submit_energy(
        &self,
        record: EnergyConsumption,
    ) -> DisclosureResult<Submission<EnergyConsumption>> {
        self.submit(&self.energy, record)
    }

    pub fn submit_workforce(
        &self,
        record: WorkforceDiversity,
    ) -> DisclosureResult<Submission<WorkforceDiversity>> {
        self.submit(&self.workforce, record)
    }

    pub fn submit_materiality(
        &self,
        assessment: MaterialityAssessment,
    ) -> DisclosureResult<Submission<MaterialityAssessment>> {
        self.submit(&self.materiality, assessment)
    }

    pub fn delete_emission(&self, id: i64) -> DisclosureResult<()> {
        self.remove(&self.emissions, id)
    }

    pub fn delete_energy(&self, id: i64) -> DisclosureResult<()> {
        self.remove(&self.energy, id)
    }

    pub fn delete_workforce(&self, id: i64) -> DisclosureResult<()> {
        self.remove(&self.workforce, id)
    }

    pub fn delete_materiality(&self, id: i64) -> DisclosureResult<()> {
        self.remove(&self.materiality, id)
    }

    // ========================================================================
    // ASSESSMENTS
    // ========================================================================

    pub fn assess_esrs_completeness(&self, year: i32) -> DisclosureResult<CompletenessAssessment> {
        let facts = EsrsFacts::from_records(
            year,
            &self.emissions.get_by_year(year)?,
            &self.energy.get_by_year(year)?,
            &self.workforce.get_by_year(year)?,
            &self.materiality.get_by_year(year)?,
        );
        debug!(year, ?facts, "esrs facts");
        Ok(assess_completeness(&facts))
    }

    pub fn assess_emissions_completeness(&self, year: i32) -> DisclosureResult<CompletenessAssessment> {
        let facts = EmissionFacts::from_records(year, &self.emissions.get_by_year(year)?);
        debug!(year, ?facts, "emission facts");
        Ok(assess_completeness(&facts))
    }

    pub fn assess_year(&self, year: i32) -> DisclosureResult<YearAssessment> {
        Ok(YearAssessment {
            year,
            esrs: self.assess_esrs_completeness(year)?,
            emissions: self.assess_emissions_completeness(year)?,
        })
    }

    // ========================================================================
    // REPORTS
    // ========================================================================

    pub fn emission_trend(&self) -> DisclosureResult<BTreeMap<i32, Decimal>> {
        Ok(aggregation::emission_trend(&self.emissions.get_all()?))
    }

    /// Year-over-year rows within an optional inclusive year range.
    ///
    /// Changes are computed over the full series first, so the first row in
    /// range still compares against the year before it.
    pub fn year_over_year_between(
        &self,
        from_year: Option<i32>,
        to_year: Option<i32>,
    ) -> DisclosureResult<Vec<YearOverYear>> {
        Ok(self
            .year_over_year()?
            .into_iter()
            .filter(|row| from_year.map_or(true, |from| row.year >= from))
            .filter(|row| to_year.map_or(true, |to| row.year <= to))
            .collect())
    }

    pub fn emission_intensity(&self, year: i32, intensity_base: Decimal) -> DisclosureResult<Option<Decimal>> {
        Ok(aggregation::calculate_emission_intensity(
            &self.emissions.get_by_year(year)?,
            year,
            intensity_base,
        ))
    }

    pub fn verification_statistics(&self) -> DisclosureResult<BTreeMap<String, usize>> {
        Ok(aggregation::verification_statistics(&self.emissions.get_all()?))
    }

    pub fn check_target(
        &self,
        baseline_year: i32,
        current_year: i32,
        target_reduction_percentage: Decimal,
    ) -> DisclosureResult<TargetCheck> {
        let trend = self.emission_trend()?;
        Ok(aggregation::check_target(
            &trend,
            baseline_year,
            current_year,
            target_reduction_percentage,
        ))
    }

    pub fn year_over_year(&self) -> DisclosureResult<Vec<YearOverYear>> {
        Ok(aggregation::year_over_year(&self.emission_trend()?))
    }

    pub fn renewable_share(&self, year: i32) -> DisclosureResult<Option<Decimal>> {
        Ok(aggregation::renewable_share(&self.energy.get_by_year(year)?, year))
    }

    pub fn material_topics(&self, year: i32) -> DisclosureResult<Vec<MaterialityAssessment>> {
        Ok(aggregation::material_topics(&self.materiality.get_by_year(year)?, year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completeness::CompletenessTier;
    use crate::entities::{DataQuality, VerificationStatus};

    fn service() -> DisclosureService {
        DisclosureService::in_memory(ValidationContext::new(2020, 2025)).with_created_by("tester")
    }

    fn emission(year: i32, s1: i64, s2l: i64, s2m: i64, s3: i64) -> EmissionRecord {
        EmissionRecord::new(
            year,
            Decimal::from(s1),
            Decimal::from(s2l),
            Decimal::from(s2m),
            Decimal::from(s3),
        )
    }

    #[test]
    fn test_submit_assigns_id_and_creator() {
        let svc = service();
        let saved = svc.submit_emission(emission(2024, 100, 50, 30, 20)).unwrap();

        assert_eq!(saved.record.id, Some(1));
        assert_eq!(saved.record.audit.created_by, "tester");
        assert!(saved.warnings.is_empty());
    }

    #[test]
    fn test_errors_block_the_write() {
        let svc = service();
        let err = svc.submit_emission(emission(2024, -1, 0, 0, 0)).unwrap_err();

        assert!(matches!(err, DisclosureError::Validation { .. }));
        assert!(err.findings().iter().any(|f| f.field == "scope1"));
        assert!(svc.emissions().get_all().unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_quantity_is_rejected_and_reports_stay_usable() {
        let svc = service();
        let huge = EmissionRecord::new(2024, Decimal::MAX, Decimal::ZERO, Decimal::ZERO, Decimal::ONE);

        let err = svc.submit_emission(huge).unwrap_err();
        assert!(err.findings().iter().any(|f| f.field == "scope1" && f.is_error()));

        svc.submit_emission(emission(2024, 10, 0, 0, 0)).unwrap();
        assert_eq!(svc.emission_trend().unwrap()[&2024], Decimal::from(10));
    }

    #[test]
    fn test_warnings_do_not_block() {
        let svc = service();
        let saved = svc.submit_emission(emission(2024, 0, 0, 0, 0)).unwrap();
        assert_eq!(saved.warnings.len(), 1);
        assert_eq!(svc.emissions().get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_resubmit_with_id_replaces() {
        let svc = service();
        let saved = svc.submit_emission(emission(2024, 10, 10, 10, 10)).unwrap().record;

        let mut edited = saved.clone();
        edited.scope3 = Decimal::from(90);
        let replaced = svc.submit_emission(edited).unwrap().record;

        assert_eq!(replaced.id, saved.id);
        assert_eq!(svc.emissions().get_all().unwrap().len(), 1);
        assert_eq!(svc.emission_trend().unwrap()[&2024], Decimal::from(110));
    }

    #[test]
    fn test_delete_unknown_id_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.delete_energy(3),
            Err(DisclosureError::NotFound { id: 3, .. })
        ));
        assert!(matches!(
            svc.delete_energy(0),
            Err(DisclosureError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_year_assessment() {
        let svc = service();
        svc.submit_emission(
            emission(2024, 100, 50, 30, 20)
                .with_data_quality(DataQuality::Medium)
                .with_verification(VerificationStatus::LimitedAssurance),
        )
        .unwrap();
        svc.submit_workforce(WorkforceDiversity::new(2024, "All", 10).with_gender(5, 5, 0))
            .unwrap();

        let assessment = svc.assess_year(2024).unwrap();
        assert_eq!(assessment.esrs.tier, CompletenessTier::PartiallyComplete);
        assert_eq!(assessment.emissions.tier, CompletenessTier::Complete);

        let empty = svc.assess_year(2023).unwrap();
        assert_eq!(empty.esrs.tier, CompletenessTier::InsufficientData);
        assert_eq!(empty.emissions.percentage, Decimal::ZERO);
    }

    #[test]
    fn test_reports() {
        let svc = service();
        svc.submit_emission(emission(2022, 120, 0, 0, 0)).unwrap();
        svc.submit_emission(emission(2023, 100, 0, 0, 0)).unwrap();
        svc.submit_emission(emission(2024, 80, 0, 0, 0)).unwrap();

        let rows = svc.year_over_year_between(Some(2023), None).unwrap();
        assert_eq!(rows.iter().map(|r| r.year).collect::<Vec<_>>(), vec![2023, 2024]);
        assert_eq!(rows[0].previous_year, Some(2022));
        assert!(rows[0].change_percentage.is_some());
        assert_eq!(svc.year_over_year_between(None, Some(2022)).unwrap().len(), 1);

        assert!(svc.check_target(2023, 2024, Decimal::from(15)).unwrap().achieved);
        assert_eq!(
            svc.emission_intensity(2024, Decimal::from(4)).unwrap(),
            Some(Decimal::from(20))
        );
        assert_eq!(svc.emission_intensity(2024, Decimal::ZERO).unwrap(), None);
        assert_eq!(svc.verification_statistics().unwrap()["Unverified"], 3);
        assert_eq!(svc.year_over_year().unwrap().len(), 3);
    }
}
