// 📥 CSV import of emission records
//
// Header names match the EmissionRecord field names:
//   reporting_year,scope1,scope2_location,scope2_market,scope3,data_quality,verification_status,notes
// Every row goes through the normal validate-then-save path; a rejected row
// is reported and the import continues with the next one.

use crate::entities::{DataQuality, EmissionRecord, VerificationStatus};
use crate::error::{DisclosureError, DisclosureResult};
use crate::service::DisclosureService;
use crate::validation::Finding;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// One CSV line before parsing; quantities stay text until checked.
#[derive(Debug, Deserialize)]
struct EmissionRow {
    reporting_year: i32,
    scope1: String,
    scope2_location: String,
    scope2_market: String,
    scope3: String,
    #[serde(default)]
    data_quality: Option<String>,
    #[serde(default)]
    verification_status: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

fn parse_quantity(field: &str, raw: &str) -> DisclosureResult<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|e| {
        DisclosureError::Import(format!("{} is not a decimal ('{}'): {}", field, raw, e))
    })
}

impl EmissionRow {
    fn into_record(self) -> DisclosureResult<EmissionRecord> {
        let mut record = EmissionRecord::new(
            self.reporting_year,
            parse_quantity("scope1", &self.scope1)?,
            parse_quantity("scope2_location", &self.scope2_location)?,
            parse_quantity("scope2_market", &self.scope2_market)?,
            parse_quantity("scope3", &self.scope3)?,
        );

        if let Some(quality) = self.data_quality.filter(|q| !q.trim().is_empty()) {
            record = record.with_data_quality(DataQuality::from_label(&quality));
        }
        if let Some(status) = self.verification_status.filter(|s| !s.trim().is_empty()) {
            record = record.with_verification(VerificationStatus::from_label(&status));
        }
        if let Some(notes) = self.notes {
            record = record.with_notes(notes);
        }

        Ok(record)
    }
}

/// A CSV line that did not make it into the store.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRow {
    /// 1-based data line (header excluded)
    pub line: usize,
    pub reason: String,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub warnings: usize,
    pub rejected: Vec<RejectedRow>,
}

impl ImportSummary {
    pub fn total_rows(&self) -> usize {
        self.imported + self.rejected.len()
    }
}

pub fn import_emissions_from_path(
    service: &DisclosureService,
    csv_path: &Path,
) -> DisclosureResult<ImportSummary> {
    let file = std::fs::File::open(csv_path).map_err(|e| {
        DisclosureError::Import(format!("Failed to open CSV file {:?}: {}", csv_path, e))
    })?;
    info!(path = %csv_path.display(), "importing emission records");
    import_emissions(service, file)
}

/// Import from any reader. Store failures abort; bad rows do not.
pub fn import_emissions<R: Read>(
    service: &DisclosureService,
    reader: R,
) -> DisclosureResult<ImportSummary> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut summary = ImportSummary::default();

    for (idx, result) in rdr.deserialize::<EmissionRow>().enumerate() {
        let line = idx + 1;

        let outcome = result
            .map_err(DisclosureError::from)
            .and_then(EmissionRow::into_record)
            .and_then(|record| service.submit_emission(record));

        match outcome {
            Ok(saved) => {
                summary.imported += 1;
                summary.warnings += saved.warnings.len();
            }
            Err(err @ (DisclosureError::StoreUnavailable(_) | DisclosureError::Storage(_))) => {
                return Err(err);
            }
            Err(err) => {
                warn!(line, error = %err, "row rejected");
                summary.rejected.push(RejectedRow {
                    line,
                    reason: err.to_string(),
                    findings: err.findings().to_vec(),
                });
            }
        }
    }

    info!(
        imported = summary.imported,
        rejected = summary.rejected.len(),
        "import finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationContext;
    use std::io::Write;

    fn service() -> DisclosureService {
        DisclosureService::in_memory(ValidationContext::new(2020, 2025))
    }

    #[test]
    fn test_import_valid_rows() {
        let svc = service();
        let csv = "\
reporting_year,scope1,scope2_location,scope2_market,scope3,data_quality,verification_status,notes
2023,100.5,50,30,20,High,Limited Assurance,audited
2024,90,45,25,18,,,
";
        let summary = import_emissions(&svc, csv.as_bytes()).unwrap();

        assert_eq!(summary.imported, 2);
        assert!(summary.rejected.is_empty());

        let saved = svc.emissions().get_by_year(2023).unwrap();
        assert_eq!(saved[0].scope1, Decimal::from_str("100.5").unwrap());
        assert_eq!(saved[0].data_quality, Some(DataQuality::High));
        assert_eq!(saved[0].verification_status, VerificationStatus::LimitedAssurance);
        assert_eq!(saved[0].notes, "audited");

        let bare = svc.emissions().get_by_year(2024).unwrap();
        assert_eq!(bare[0].data_quality, None);
        assert_eq!(bare[0].verification_status, VerificationStatus::Unverified);
    }

    #[test]
    fn test_bad_rows_are_reported_and_skipped() {
        let svc = service();
        let csv = "\
reporting_year,scope1,scope2_location,scope2_market,scope3
2024,-5,0,0,0
2024,ten,0,0,0
2024,10,0,0,0
";
        let summary = import_emissions(&svc, csv.as_bytes()).unwrap();

        assert_eq!(summary.imported, 1);
        assert_eq!(summary.total_rows(), 3);
        assert_eq!(summary.rejected[0].line, 1);
        assert!(summary.rejected[0].findings.iter().any(|f| f.field == "scope1"));
        assert_eq!(summary.rejected[1].line, 2);
        assert!(summary.rejected[1].findings.is_empty());
    }

    #[test]
    fn test_import_from_file() {
        let svc = service();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "reporting_year,scope1,scope2_location,scope2_market,scope3").unwrap();
        writeln!(file, "2024,0,0,0,0").unwrap();

        let summary = import_emissions_from_path(&svc, file.path()).unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.warnings, 1);
    }

    #[test]
    fn test_missing_file_is_import_error() {
        let svc = service();
        let err = import_emissions_from_path(&svc, Path::new("/nonexistent/emissions.csv"))
            .unwrap_err();
        assert!(matches!(err, DisclosureError::Import(_)));
    }
}
