// ⚡ Energy Consumption - one energy source for one reporting year (MWh)

use super::{impl_disclosure, Audit};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyConsumption {
    #[serde(default)]
    pub id: Option<i64>,

    pub reporting_year: i32,

    /// Free-text label, e.g. "Solar PV (rooftop)" or "Natural gas"
    pub energy_source: String,

    pub consumption_mwh: Decimal,

    pub is_renewable: bool,

    #[serde(default)]
    pub grid_electricity_mwh: Decimal,

    #[serde(default)]
    pub self_generated_renewable_mwh: Decimal,

    /// Purchased renewable energy certificates (guarantees of origin)
    #[serde(default)]
    pub renewable_certificates_mwh: Decimal,

    /// MWh per unit of activity, when the reporter supplies one
    #[serde(default)]
    pub intensity_ratio: Option<Decimal>,

    #[serde(default)]
    pub methodology: String,

    #[serde(default)]
    pub audit: Audit,
}

impl_disclosure!(EnergyConsumption, "EnergyConsumption");

impl EnergyConsumption {
    pub fn new(
        reporting_year: i32,
        energy_source: impl Into<String>,
        consumption_mwh: Decimal,
        is_renewable: bool,
    ) -> Self {
        EnergyConsumption {
            id: None,
            reporting_year,
            energy_source: energy_source.into(),
            consumption_mwh,
            is_renewable,
            grid_electricity_mwh: Decimal::ZERO,
            self_generated_renewable_mwh: Decimal::ZERO,
            renewable_certificates_mwh: Decimal::ZERO,
            intensity_ratio: None,
            methodology: String::new(),
            audit: Audit::default(),
        }
    }
}
