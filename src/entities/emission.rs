// 🏭 Emission Record - GHG Protocol scope 1/2/3 for one reporting year
//
// All quantities are tCO2e held as fixed-precision decimals.
// Total emissions use the market-based scope 2 figure and are always recomputed.

use super::{impl_disclosure, Audit, DataQuality, VerificationStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    /// Assigned by the record store on first write
    #[serde(default)]
    pub id: Option<i64>,

    pub reporting_year: i32,

    /// Direct emissions (tCO2e)
    pub scope1: Decimal,

    /// Indirect energy emissions, grid-average method (tCO2e)
    pub scope2_location: Decimal,

    /// Indirect energy emissions, contractual-instrument method (tCO2e)
    pub scope2_market: Decimal,

    /// Other indirect emissions (tCO2e)
    pub scope3: Decimal,

    /// None = no rating supplied
    #[serde(default)]
    pub data_quality: Option<DataQuality>,

    #[serde(default)]
    pub verification_status: VerificationStatus,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub audit: Audit,
}

impl_disclosure!(EmissionRecord, "EmissionRecord");

impl EmissionRecord {
    pub fn new(
        reporting_year: i32,
        scope1: Decimal,
        scope2_location: Decimal,
        scope2_market: Decimal,
        scope3: Decimal,
    ) -> Self {
        EmissionRecord {
            id: None,
            reporting_year,
            scope1,
            scope2_location,
            scope2_market,
            scope3,
            data_quality: None,
            verification_status: VerificationStatus::default(),
            notes: String::new(),
            audit: Audit::default(),
        }
    }

    pub fn with_data_quality(mut self, data_quality: DataQuality) -> Self {
        self.data_quality = Some(data_quality);
        self
    }

    pub fn with_verification(mut self, status: VerificationStatus) -> Self {
        self.verification_status = status;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// scope1 + scope2 (market-based) + scope3, saturating at the decimal range.
    pub fn total_emissions(&self) -> Decimal {
        self.scope1
            .saturating_add(self.scope2_market)
            .saturating_add(self.scope3)
    }

    /// Same total using the location-based scope 2 figure, for dual reporting.
    pub fn total_emissions_location_based(&self) -> Decimal {
        self.scope1
            .saturating_add(self.scope2_location)
            .saturating_add(self.scope3)
    }

    pub fn has_scope2(&self) -> bool {
        self.scope2_location > Decimal::ZERO || self.scope2_market > Decimal::ZERO
    }

    pub fn all_scopes_zero(&self) -> bool {
        self.scope1.is_zero()
            && self.scope2_location.is_zero()
            && self.scope2_market.is_zero()
            && self.scope3.is_zero()
    }
}
