// ⚙️ Application configuration
//
// Layering: built-in defaults < optional JSON file < environment variables.

use crate::error::{DisclosureError, DisclosureResult};
use crate::validation::ValidationContext;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "ESG_DB_PATH";
pub const ENV_MIN_REPORTING_YEAR: &str = "ESG_MIN_REPORTING_YEAR";
pub const ENV_CREATED_BY: &str = "ESG_CREATED_BY";
pub const ENV_LOG: &str = "ESG_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// First reporting year the regulator accepts
    #[serde(default = "default_min_reporting_year")]
    pub min_reporting_year: i32,

    /// Written to `created_by` on new records
    #[serde(default = "default_created_by")]
    pub created_by: String,

    /// Fallback tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("esg_disclosure.db")
}

fn default_min_reporting_year() -> i32 {
    2020
}

fn default_created_by() -> String {
    "system".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: default_database_path(),
            min_reporting_year: default_min_reporting_year(),
            created_by: default_created_by(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file; missing keys fall back to defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> DisclosureResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            DisclosureError::Config(format!(
                "Failed to read config file {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| DisclosureError::Config(format!("Failed to parse config JSON: {}", e)))
    }

    /// Defaults, then the file (if given), then the process environment.
    pub fn load(path: Option<&Path>) -> DisclosureResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key/value lookup (the environment in production).
    pub fn with_overrides<F>(mut self, lookup: F) -> DisclosureResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.database_path = PathBuf::from(path);
        }

        if let Some(year) = lookup(ENV_MIN_REPORTING_YEAR) {
            self.min_reporting_year = year.trim().parse().map_err(|_| {
                DisclosureError::Config(format!(
                    "{} must be a year, got '{}'",
                    ENV_MIN_REPORTING_YEAR, year
                ))
            })?;
        }

        if let Some(creator) = lookup(ENV_CREATED_BY) {
            self.created_by = creator;
        }

        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = filter;
        }

        Ok(self)
    }

    pub fn validation_context(&self, current_year: i32) -> ValidationContext {
        ValidationContext::new(self.min_reporting_year, current_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database_path, PathBuf::from("esg_disclosure.db"));
        assert_eq!(config.min_reporting_year, 2020);
        assert_eq!(config.created_by, "system");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "min_reporting_year": 2024, "created_by": "sustainability-team" }}"#).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.min_reporting_year, 2024);
        assert_eq!(config.created_by, "sustainability-team");
        assert_eq!(config.database_path, PathBuf::from("esg_disclosure.db"));
    }

    #[test]
    fn test_overrides_win() {
        let env: HashMap<&str, &str> = [
            (ENV_DB_PATH, "/tmp/esg.db"),
            (ENV_MIN_REPORTING_YEAR, "2022"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::default()
            .with_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/esg.db"));
        assert_eq!(config.min_reporting_year, 2022);
        assert_eq!(config.created_by, "system");
    }

    #[test]
    fn test_bad_year_override_is_config_error() {
        let result = AppConfig::default().with_overrides(|k| {
            (k == ENV_MIN_REPORTING_YEAR).then(|| "twenty".to_string())
        });
        assert!(matches!(result, Err(DisclosureError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = AppConfig::from_file("/nonexistent/esg-config.json");
        assert!(matches!(result, Err(DisclosureError::Config(_))));
    }

    #[test]
    fn test_validation_context() {
        let ctx = AppConfig::default().validation_context(2025);
        assert_eq!(ctx.min_reporting_year, 2020);
        assert_eq!(ctx.max_reporting_year(), 2026);
    }
}
