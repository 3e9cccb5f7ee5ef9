// ESG Disclosure - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod entities;       // Disclosure records and status vocabularies
pub mod validation;     // Field and business-rule checks
pub mod completeness;   // Category coverage and tiers
pub mod aggregation;    // Trend, intensity, targets
pub mod error;
pub mod config;
pub mod logging;
pub mod store;          // Record store contract + in-memory store
pub mod db;             // SQLite record store
pub mod service;        // Validate-then-save and reporting entry points
pub mod import;         // CSV import

// Re-export commonly used types
pub use entities::{
    Audit, DataQuality, Disclosure, EmissionRecord, EnergyConsumption, MaterialityAssessment,
    ReviewStatus, VerificationStatus, WorkforceDiversity,
};
pub use entities::materiality::MATERIALITY_THRESHOLD;
pub use validation::MAX_QUANTITY;
pub use validation::{
    classify_energy_source, validate_emission, validate_energy, validate_materiality,
    validate_workforce, Finding, Severity, SourceClass, Validate, ValidationContext,
    ValidationReport,
};
pub use completeness::{
    assess_completeness, CompletenessAssessment, CompletenessFacts, CompletenessTier,
    EmissionFacts, EsrsFacts,
};
pub use aggregation::{
    calculate_emission_intensity, check_target, emission_intensity, emission_trend,
    reduction_percentage, target_achieved, verification_statistics, TargetCheck, YearOverYear,
};
pub use error::{DisclosureError, DisclosureResult};
pub use config::AppConfig;
pub use store::{Clock, InMemoryStore, RecordStore};
pub use db::{open_database, setup_database, SqliteStore};
pub use service::{DisclosureService, Submission, YearAssessment};
pub use import::{import_emissions, import_emissions_from_path, ImportSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
