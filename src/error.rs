// Error taxonomy for the disclosure library
//
// Expected domain conditions (zero baselines, zero denominators, missing
// categories) are result values, never errors. Only rejected writes,
// unknown ids and store failures surface here.

use crate::validation::Finding;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DisclosureError {
    /// At least one Error-severity finding; the write was not attempted
    #[error("{entity} failed validation: {message}")]
    Validation {
        entity: &'static str,
        message: String,
        findings: Vec<Finding>,
    },

    #[error("{entity} not found: id={id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Invalid {entity} id: {reason}")]
    InvalidId { entity: &'static str, reason: String },

    /// The store could not be opened or initialised
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Import error: {0}")]
    Import(String),
}

impl DisclosureError {
    /// Build a validation error from a full finding list (warnings included).
    pub fn validation(entity: &'static str, findings: Vec<Finding>) -> Self {
        let message = findings
            .iter()
            .filter(|f| f.is_error())
            .map(|f| f.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        DisclosureError::Validation {
            entity,
            message,
            findings,
        }
    }

    /// Findings attached to a validation error, empty for every other kind.
    pub fn findings(&self) -> &[Finding] {
        match self {
            DisclosureError::Validation { findings, .. } => findings,
            _ => &[],
        }
    }
}

impl From<rusqlite::Error> for DisclosureError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, _)
                if matches!(
                    failure.code,
                    rusqlite::ErrorCode::CannotOpen
                        | rusqlite::ErrorCode::NotADatabase
                        | rusqlite::ErrorCode::PermissionDenied
                ) =>
            {
                DisclosureError::StoreUnavailable(err.to_string())
            }
            _ => DisclosureError::Storage(err.to_string()),
        }
    }
}

impl From<csv::Error> for DisclosureError {
    fn from(err: csv::Error) -> Self {
        DisclosureError::Import(err.to_string())
    }
}

pub type DisclosureResult<T> = Result<T, DisclosureError>;
