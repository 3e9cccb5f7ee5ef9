// SQLite persistence for disclosure records
//
// One table per entity kind with a surrogate AUTOINCREMENT key.
// Quantities are stored as canonical decimal TEXT (never REAL) so regulatory
// totals do not pick up floating-point drift; enumerated fields are plain TEXT
// and their allowed values are enforced by the validators, not the schema.

use crate::entities::{
    Audit, DataQuality, Disclosure, EmissionRecord, EnergyConsumption, MaterialityAssessment,
    ReviewStatus, VerificationStatus, WorkforceDiversity,
};
use crate::error::{DisclosureError, DisclosureResult};
use crate::store::{require_id, system_clock, Clock, RecordStore};
use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::marker::PhantomData;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

// ============================================================================
// CONNECTION & SCHEMA
// ============================================================================

/// Open (or create) the database file and make sure the schema exists.
pub fn open_database(path: &Path) -> DisclosureResult<Connection> {
    let conn = Connection::open(path).map_err(|e| {
        DisclosureError::StoreUnavailable(format!("cannot open {:?}: {}", path, e))
    })?;
    setup_database(&conn).map_err(|e| {
        DisclosureError::StoreUnavailable(format!("cannot initialise {:?}: {}", path, e))
    })?;

    info!(path = %path.display(), "disclosure database ready");
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> DisclosureResult<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS emission_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            reporting_year INTEGER NOT NULL,
            scope1 TEXT NOT NULL,
            scope2_location TEXT NOT NULL,
            scope2_market TEXT NOT NULL,
            scope3 TEXT NOT NULL,
            data_quality TEXT,
            verification_status TEXT NOT NULL DEFAULT 'Unverified',
            notes TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            modified_at TEXT NOT NULL,
            created_by TEXT NOT NULL DEFAULT ''
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS energy_consumption (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            reporting_year INTEGER NOT NULL,
            energy_source TEXT NOT NULL,
            consumption_mwh TEXT NOT NULL,
            is_renewable INTEGER NOT NULL,
            grid_electricity_mwh TEXT NOT NULL,
            self_generated_renewable_mwh TEXT NOT NULL,
            renewable_certificates_mwh TEXT NOT NULL,
            intensity_ratio TEXT,
            methodology TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            modified_at TEXT NOT NULL,
            created_by TEXT NOT NULL DEFAULT ''
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS workforce_diversity (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            reporting_year INTEGER NOT NULL,
            employee_category TEXT NOT NULL,
            total_employees INTEGER NOT NULL,
            female_employees INTEGER NOT NULL,
            male_employees INTEGER NOT NULL,
            non_binary_employees INTEGER NOT NULL,
            employees_under_30 INTEGER NOT NULL,
            employees_30_to_50 INTEGER NOT NULL,
            employees_over_50 INTEGER NOT NULL,
            employees_with_disability INTEGER NOT NULL,
            ethnic_minority_employees INTEGER NOT NULL,
            average_training_hours TEXT NOT NULL,
            turnover_rate TEXT NOT NULL,
            gender_pay_gap TEXT,
            created_at TEXT NOT NULL,
            modified_at TEXT NOT NULL,
            created_by TEXT NOT NULL DEFAULT ''
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS materiality_assessments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            reporting_year INTEGER NOT NULL,
            topic TEXT NOT NULL,
            linked_standard TEXT,
            impact_score INTEGER NOT NULL,
            financial_score INTEGER NOT NULL,
            time_horizon TEXT NOT NULL DEFAULT '',
            stakeholder_groups TEXT NOT NULL DEFAULT '',
            methodology TEXT NOT NULL DEFAULT '',
            risks TEXT NOT NULL DEFAULT '',
            opportunities TEXT NOT NULL DEFAULT '',
            evidence TEXT NOT NULL DEFAULT '',
            management_response TEXT NOT NULL DEFAULT '',
            review_status TEXT NOT NULL DEFAULT 'Draft',
            created_at TEXT NOT NULL,
            modified_at TEXT NOT NULL,
            created_by TEXT NOT NULL DEFAULT ''
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes (every store is queried by reporting year)
    // ==========================================================================
    for table in [
        EmissionRecord::TABLE,
        EnergyConsumption::TABLE,
        WorkforceDiversity::TABLE,
        MaterialityAssessment::TABLE,
    ] {
        conn.execute(
            &format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_year ON {table}(reporting_year)",
                table = table
            ),
            [],
        )?;
    }

    Ok(())
}

// ============================================================================
// ROW MAPPING
// ============================================================================

/// Table layout of an entity kind.
///
/// Every table is `id, COLUMNS..., created_at, modified_at, created_by`;
/// `from_row` reads COLUMNS starting at index 1.
pub trait SqlRecord: Disclosure + Sized {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    /// Values for COLUMNS, in order.
    fn to_values(&self) -> Vec<Value>;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

fn decimal_value(value: Decimal) -> Value {
    Value::Text(value.to_string())
}

fn optional_decimal_value(value: Option<Decimal>) -> Value {
    value.map(decimal_value).unwrap_or(Value::Null)
}

fn text_value(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn parse_decimal(idx: usize, text: &str) -> rusqlite::Result<Decimal> {
    Decimal::from_str(text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    parse_decimal(idx, &text)
}

fn optional_decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| parse_decimal(idx, &t)).transpose()
}

fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| {
        DateTime::parse_from_rfc3339(&t)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Audit columns follow the entity columns.
fn audit_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<Audit> {
    Ok(Audit {
        created_at: timestamp_at(row, offset)?,
        modified_at: timestamp_at(row, offset + 1)?,
        created_by: row.get(offset + 2)?,
    })
}

impl SqlRecord for EmissionRecord {
    const TABLE: &'static str = "emission_records";
    const COLUMNS: &'static [&'static str] = &[
        "reporting_year",
        "scope1",
        "scope2_location",
        "scope2_market",
        "scope3",
        "data_quality",
        "verification_status",
        "notes",
    ];

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.reporting_year as i64),
            decimal_value(self.scope1),
            decimal_value(self.scope2_location),
            decimal_value(self.scope2_market),
            decimal_value(self.scope3),
            self.data_quality
                .as_ref()
                .map(|q| text_value(q.as_str()))
                .unwrap_or(Value::Null),
            text_value(self.verification_status.as_str()),
            text_value(&self.notes),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let data_quality: Option<String> = row.get(6)?;
        let verification_status: String = row.get(7)?;

        Ok(EmissionRecord {
            id: row.get(0)?,
            reporting_year: row.get(1)?,
            scope1: decimal_at(row, 2)?,
            scope2_location: decimal_at(row, 3)?,
            scope2_market: decimal_at(row, 4)?,
            scope3: decimal_at(row, 5)?,
            data_quality: data_quality.map(|q| DataQuality::from_label(&q)),
            verification_status: VerificationStatus::from_label(&verification_status),
            notes: row.get(8)?,
            audit: audit_at(row, 9)?,
        })
    }
}

impl SqlRecord for EnergyConsumption {
    const TABLE: &'static str = "energy_consumption";
    const COLUMNS: &'static [&'static str] = &[
        "reporting_year",
        "energy_source",
        "consumption_mwh",
        "is_renewable",
        "grid_electricity_mwh",
        "self_generated_renewable_mwh",
        "renewable_certificates_mwh",
        "intensity_ratio",
        "methodology",
    ];

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.reporting_year as i64),
            text_value(&self.energy_source),
            decimal_value(self.consumption_mwh),
            Value::Integer(self.is_renewable as i64),
            decimal_value(self.grid_electricity_mwh),
            decimal_value(self.self_generated_renewable_mwh),
            decimal_value(self.renewable_certificates_mwh),
            optional_decimal_value(self.intensity_ratio),
            text_value(&self.methodology),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(EnergyConsumption {
            id: row.get(0)?,
            reporting_year: row.get(1)?,
            energy_source: row.get(2)?,
            consumption_mwh: decimal_at(row, 3)?,
            is_renewable: row.get(4)?,
            grid_electricity_mwh: decimal_at(row, 5)?,
            self_generated_renewable_mwh: decimal_at(row, 6)?,
            renewable_certificates_mwh: decimal_at(row, 7)?,
            intensity_ratio: optional_decimal_at(row, 8)?,
            methodology: row.get(9)?,
            audit: audit_at(row, 10)?,
        })
    }
}

impl SqlRecord for WorkforceDiversity {
    const TABLE: &'static str = "workforce_diversity";
    const COLUMNS: &'static [&'static str] = &[
        "reporting_year",
        "employee_category",
        "total_employees",
        "female_employees",
        "male_employees",
        "non_binary_employees",
        "employees_under_30",
        "employees_30_to_50",
        "employees_over_50",
        "employees_with_disability",
        "ethnic_minority_employees",
        "average_training_hours",
        "turnover_rate",
        "gender_pay_gap",
    ];

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.reporting_year as i64),
            text_value(&self.employee_category),
            Value::Integer(self.total_employees),
            Value::Integer(self.female_employees),
            Value::Integer(self.male_employees),
            Value::Integer(self.non_binary_employees),
            Value::Integer(self.employees_under_30),
            Value::Integer(self.employees_30_to_50),
            Value::Integer(self.employees_over_50),
            Value::Integer(self.employees_with_disability),
            Value::Integer(self.ethnic_minority_employees),
            decimal_value(self.average_training_hours),
            decimal_value(self.turnover_rate),
            optional_decimal_value(self.gender_pay_gap),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(WorkforceDiversity {
            id: row.get(0)?,
            reporting_year: row.get(1)?,
            employee_category: row.get(2)?,
            total_employees: row.get(3)?,
            female_employees: row.get(4)?,
            male_employees: row.get(5)?,
            non_binary_employees: row.get(6)?,
            employees_under_30: row.get(7)?,
            employees_30_to_50: row.get(8)?,
            employees_over_50: row.get(9)?,
            employees_with_disability: row.get(10)?,
            ethnic_minority_employees: row.get(11)?,
            average_training_hours: decimal_at(row, 12)?,
            turnover_rate: decimal_at(row, 13)?,
            gender_pay_gap: optional_decimal_at(row, 14)?,
            audit: audit_at(row, 15)?,
        })
    }
}

impl SqlRecord for MaterialityAssessment {
    const TABLE: &'static str = "materiality_assessments";
    const COLUMNS: &'static [&'static str] = &[
        "reporting_year",
        "topic",
        "linked_standard",
        "impact_score",
        "financial_score",
        "time_horizon",
        "stakeholder_groups",
        "methodology",
        "risks",
        "opportunities",
        "evidence",
        "management_response",
        "review_status",
    ];

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.reporting_year as i64),
            text_value(&self.topic),
            self.linked_standard
                .as_deref()
                .map(text_value)
                .unwrap_or(Value::Null),
            Value::Integer(self.impact_score as i64),
            Value::Integer(self.financial_score as i64),
            text_value(&self.time_horizon),
            text_value(&self.stakeholder_groups),
            text_value(&self.methodology),
            text_value(&self.risks),
            text_value(&self.opportunities),
            text_value(&self.evidence),
            text_value(&self.management_response),
            text_value(self.review_status.as_str()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let review_status: String = row.get(13)?;

        Ok(MaterialityAssessment {
            id: row.get(0)?,
            reporting_year: row.get(1)?,
            topic: row.get(2)?,
            linked_standard: row.get(3)?,
            impact_score: row.get(4)?,
            financial_score: row.get(5)?,
            time_horizon: row.get(6)?,
            stakeholder_groups: row.get(7)?,
            methodology: row.get(8)?,
            risks: row.get(9)?,
            opportunities: row.get(10)?,
            evidence: row.get(11)?,
            management_response: row.get(12)?,
            review_status: ReviewStatus::from_label(&review_status),
            audit: audit_at(row, 14)?,
        })
    }
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// Record store backed by a shared SQLite connection.
///
/// The mutex serialises every call, so one write is durable before the
/// next read can observe it.
pub struct SqliteStore<T> {
    conn: Arc<Mutex<Connection>>,
    clock: Clock,
    _kind: PhantomData<fn() -> T>,
}

impl<T: SqlRecord> SqliteStore<T> {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self::with_clock(conn, system_clock())
    }

    pub fn with_clock(conn: Arc<Mutex<Connection>>, clock: Clock) -> Self {
        SqliteStore {
            conn,
            clock,
            _kind: PhantomData,
        }
    }

    fn get_conn(&self) -> DisclosureResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DisclosureError::StoreUnavailable(format!("connection lock poisoned: {}", e)))
    }

    fn select_sql(filter: &str) -> String {
        format!(
            "SELECT id, {}, created_at, modified_at, created_by FROM {} {} ORDER BY reporting_year, id",
            T::COLUMNS.join(", "),
            T::TABLE,
            filter
        )
    }

    fn query(&self, filter: &str, args: &[Value]) -> DisclosureResult<Vec<T>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&Self::select_sql(filter))?;

        let rows = stmt
            .query_map(params_from_iter(args.iter()), |row| T::from_row(row))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

impl<T: SqlRecord> RecordStore<T> for SqliteStore<T> {
    fn get_all(&self) -> DisclosureResult<Vec<T>> {
        self.query("", &[])
    }

    fn get_by_id(&self, id: i64) -> DisclosureResult<Option<T>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT id, {}, created_at, modified_at, created_by FROM {} WHERE id = ?1",
            T::COLUMNS.join(", "),
            T::TABLE
        );

        let record = conn
            .query_row(&sql, params![id], |row| T::from_row(row))
            .optional()?;

        Ok(record)
    }

    fn get_by_year(&self, year: i32) -> DisclosureResult<Vec<T>> {
        self.query("WHERE reporting_year = ?1", &[Value::Integer(year as i64)])
    }

    fn exists_for_year(&self, year: i32) -> DisclosureResult<bool> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE reporting_year = ?1)",
            T::TABLE
        );
        let exists: bool = conn.query_row(&sql, params![year], |row| row.get(0))?;
        Ok(exists)
    }

    fn add(&self, mut entity: T) -> DisclosureResult<T> {
        let now = (self.clock)();
        entity.audit_mut().created_at = Some(now);
        entity.audit_mut().modified_at = Some(now);

        let mut values = entity.to_values();
        values.push(Value::Text(now.to_rfc3339()));
        values.push(Value::Text(now.to_rfc3339()));
        values.push(Value::Text(entity.audit().created_by.clone()));

        let placeholders = (1..=values.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}, created_at, modified_at, created_by) VALUES ({})",
            T::TABLE,
            T::COLUMNS.join(", "),
            placeholders
        );

        let conn = self.get_conn()?;
        conn.execute(&sql, params_from_iter(values.iter()))?;
        let id = conn.last_insert_rowid();
        entity.set_id(id);

        debug!(table = T::TABLE, id, "inserted");
        Ok(entity)
    }

    fn update(&self, entity: T) -> DisclosureResult<T> {
        let id = require_id(&entity)?;
        let now = (self.clock)();

        let mut values = entity.to_values();
        values.push(Value::Text(now.to_rfc3339()));
        values.push(Value::Integer(id));

        let assignments = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ?{}", column, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {}, modified_at = ?{} WHERE id = ?{}",
            T::TABLE,
            assignments,
            T::COLUMNS.len() + 1,
            T::COLUMNS.len() + 2
        );

        let changed = {
            let conn = self.get_conn()?;
            conn.execute(&sql, params_from_iter(values.iter()))?
        };

        if changed == 0 {
            return Err(DisclosureError::NotFound {
                entity: T::KIND,
                id,
            });
        }

        debug!(table = T::TABLE, id, "replaced");

        // Return the stored row so creation audit comes from storage.
        self.get_by_id(id)?.ok_or(DisclosureError::NotFound {
            entity: T::KIND,
            id,
        })
    }

    fn delete(&self, id: i64) -> DisclosureResult<bool> {
        let conn = self.get_conn()?;
        let removed = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", T::TABLE),
            params![id],
        )?;

        debug!(table = T::TABLE, id, removed, "deleted");
        Ok(removed > 0)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn shared_conn() -> Arc<Mutex<Connection>> {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        Arc::new(Mutex::new(conn))
    }

    fn emission() -> EmissionRecord {
        EmissionRecord::new(
            2024,
            Decimal::from_str("1250.75").unwrap(),
            Decimal::from(800),
            Decimal::from_str("612.10").unwrap(),
            Decimal::from(4300),
        )
        .with_data_quality(DataQuality::High)
        .with_verification(VerificationStatus::LimitedAssurance)
        .with_notes("FY2024 inventory")
    }

    #[test]
    fn test_setup_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        setup_database(&conn).unwrap();
    }

    #[test]
    fn test_emission_round_trip_keeps_decimal_precision() {
        let store: SqliteStore<EmissionRecord> = SqliteStore::new(shared_conn());
        let mut input = emission();
        input.audit = Audit::created_by("analyst");

        let saved = store.add(input).unwrap();
        let id = saved.id.unwrap();
        let loaded = store.get_by_id(id).unwrap().unwrap();

        assert_eq!(loaded.scope1.to_string(), "1250.75");
        assert_eq!(loaded.scope2_market.to_string(), "612.10");
        assert_eq!(loaded.total_emissions(), Decimal::from_str("6162.85").unwrap());
        assert_eq!(loaded.data_quality, Some(DataQuality::High));
        assert_eq!(loaded.verification_status, VerificationStatus::LimitedAssurance);
        assert_eq!(loaded.audit.created_by, "analyst");
        assert!(loaded.audit.created_at.is_some());
    }

    #[test]
    fn test_non_standard_labels_survive_storage() {
        let store: SqliteStore<EmissionRecord> = SqliteStore::new(shared_conn());
        let saved = store
            .add(emission().with_verification(VerificationStatus::from_label("Checked by CFO")))
            .unwrap();

        let loaded = store.get_by_id(saved.id.unwrap()).unwrap().unwrap();
        assert_eq!(
            loaded.verification_status,
            VerificationStatus::Other("Checked by CFO".to_string())
        );
    }

    #[test]
    fn test_year_queries() {
        let conn = shared_conn();
        let store: SqliteStore<EnergyConsumption> = SqliteStore::new(conn);

        store
            .add(EnergyConsumption::new(2023, "Natural gas", Decimal::from(100), false))
            .unwrap();
        let mut solar = EnergyConsumption::new(2024, "Solar PV", Decimal::from(40), true);
        solar.intensity_ratio = Some(Decimal::from_str("0.125").unwrap());
        store.add(solar).unwrap();

        assert_eq!(store.get_all().unwrap().len(), 2);
        let y2024 = store.get_by_year(2024).unwrap();
        assert_eq!(y2024.len(), 1);
        assert!(y2024[0].is_renewable);
        assert_eq!(y2024[0].intensity_ratio, Some(Decimal::from_str("0.125").unwrap()));
        assert!(store.exists_for_year(2023).unwrap());
        assert!(!store.exists_for_year(2022).unwrap());
    }

    #[test]
    fn test_update_is_full_replace() {
        let store: SqliteStore<WorkforceDiversity> = SqliteStore::new(shared_conn());
        let mut w = WorkforceDiversity::new(2024, "All employees", 10).with_gender(4, 6, 0);
        w.audit = Audit::created_by("hr");
        let saved = store.add(w).unwrap();

        let mut replacement = WorkforceDiversity::new(2024, "All employees", 12).with_gender(6, 6, 0);
        replacement.id = saved.id;
        replacement.gender_pay_gap = Some(Decimal::from_str("3.4").unwrap());
        let updated = store.update(replacement).unwrap();

        assert_eq!(updated.total_employees, 12);
        assert_eq!(updated.gender_pay_gap, Some(Decimal::from_str("3.4").unwrap()));
        assert_eq!(updated.audit.created_by, "hr");
        assert_eq!(updated.audit.created_at, saved.audit.created_at);
    }

    #[test]
    fn test_update_missing_row_is_not_found() {
        let store: SqliteStore<MaterialityAssessment> = SqliteStore::new(shared_conn());
        let mut ghost = MaterialityAssessment::new(2024, "Water", 3, 3);
        ghost.id = Some(404);

        assert!(matches!(
            store.update(ghost),
            Err(DisclosureError::NotFound { id: 404, .. })
        ));
    }

    #[test]
    fn test_materiality_round_trip_and_delete() {
        let store: SqliteStore<MaterialityAssessment> = SqliteStore::new(shared_conn());
        let mut a = MaterialityAssessment::new(2024, "Own workforce", 4, 2).with_standard("ESRS S1");
        a.review_status = ReviewStatus::Approved;
        a.risks = "Skills shortage".to_string();

        let saved = store.add(a).unwrap();
        let id = saved.id.unwrap();
        let loaded = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(loaded.linked_standard.as_deref(), Some("ESRS S1"));
        assert_eq!(loaded.review_status, ReviewStatus::Approved);
        assert!(loaded.is_material());

        assert!(store.delete(id).unwrap());
        assert!(!store.delete(id).unwrap());
        assert!(store.get_by_id(id).unwrap().is_none());
    }

    #[test]
    fn test_file_backed_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("esg.db");

        {
            let conn = open_database(&path).unwrap();
            let store: SqliteStore<EmissionRecord> = SqliteStore::new(Arc::new(Mutex::new(conn)));
            store.add(emission()).unwrap();
        }

        let conn = open_database(&path).unwrap();
        let store: SqliteStore<EmissionRecord> = SqliteStore::new(Arc::new(Mutex::new(conn)));
        assert_eq!(store.get_by_year(2024).unwrap().len(), 1);
    }

    #[test]
    fn test_unopenable_path_is_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("esg.db");

        assert!(matches!(
            open_database(&path),
            Err(DisclosureError::StoreUnavailable(_))
        ));
    }
}
