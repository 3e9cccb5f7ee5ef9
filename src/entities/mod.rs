// Disclosure Entities - one typed record per disclosure category
//
// Each entity has:
// - Integer identity assigned by the record store on first write (None until then)
// - A reporting year (every store can be queried by year)
// - Audit fields owned by the store's write path
// - Derived values (totals, percentages, materiality) computed on demand, never stored

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// AUDIT FIELDS
// ============================================================================

/// Audit trail carried by every entity.
///
/// Timestamps stay `None` on a detached value until the record store writes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Audit {
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub created_by: String,
}

impl Audit {
    pub fn created_by(creator: impl Into<String>) -> Self {
        Audit {
            created_at: None,
            modified_at: None,
            created_by: creator.into(),
        }
    }
}

// ============================================================================
// DISCLOSURE TRAIT
// ============================================================================

/// Common surface the record stores and the service need from every entity kind.
pub trait Disclosure: Clone {
    /// Human-readable entity kind, used in errors and log lines.
    const KIND: &'static str;

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    fn reporting_year(&self) -> i32;

    fn audit(&self) -> &Audit;

    fn audit_mut(&mut self) -> &mut Audit;
}

/// Implements `Disclosure` for a struct with `id`, `reporting_year` and `audit` fields.
macro_rules! impl_disclosure {
    ($ty:ty, $kind:expr) => {
        impl $crate::entities::Disclosure for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> Option<i64> {
                self.id
            }

            fn set_id(&mut self, id: i64) {
                self.id = Some(id);
            }

            fn reporting_year(&self) -> i32 {
                self.reporting_year
            }

            fn audit(&self) -> &$crate::entities::Audit {
                &self.audit
            }

            fn audit_mut(&mut self) -> &mut $crate::entities::Audit {
                &mut self.audit
            }
        }
    };
}

pub(crate) use impl_disclosure;

pub mod emission;
pub mod energy;
pub mod materiality;
pub mod status;
pub mod workforce;

pub use emission::EmissionRecord;
pub use energy::EnergyConsumption;
pub use materiality::MaterialityAssessment;
pub use status::{DataQuality, ReviewStatus, VerificationStatus};
pub use workforce::WorkforceDiversity;
