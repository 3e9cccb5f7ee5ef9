// 🗄️ Record Store contract - one store instance per entity kind
//
// The store owns persisted records; callers only ever hold detached copies.
// Audit timestamps are assigned here, on the write path, never by the core.

use crate::entities::Disclosure;
use crate::error::{DisclosureError, DisclosureResult};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Source of "now" for audit timestamps; swap it out for deterministic tests.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Persist/retrieve typed records.
pub trait RecordStore<T: Disclosure> {
    fn get_all(&self) -> DisclosureResult<Vec<T>>;

    fn get_by_id(&self, id: i64) -> DisclosureResult<Option<T>>;

    fn get_by_year(&self, year: i32) -> DisclosureResult<Vec<T>>;

    fn exists_for_year(&self, year: i32) -> DisclosureResult<bool> {
        Ok(!self.get_by_year(year)?.is_empty())
    }

    /// Assigns the id and sets `created_at`/`modified_at` to now.
    fn add(&self, entity: T) -> DisclosureResult<T>;

    /// Full-record replace; sets `modified_at`. NotFound if the id is absent.
    fn update(&self, entity: T) -> DisclosureResult<T>;

    /// True if a record was removed.
    fn delete(&self, id: i64) -> DisclosureResult<bool>;
}

/// Id required for an update; absent or non-positive ids are malformed.
pub(crate) fn require_id<T: Disclosure>(entity: &T) -> DisclosureResult<i64> {
    match entity.id() {
        Some(id) if id > 0 => Ok(id),
        Some(id) => Err(DisclosureError::InvalidId {
            entity: T::KIND,
            reason: format!("ids are positive, got {}", id),
        }),
        None => Err(DisclosureError::InvalidId {
            entity: T::KIND,
            reason: "record has not been saved yet".to_string(),
        }),
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

struct InMemoryState<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

/// Map-backed store for tests and embedding; ids start at 1 and are never reused.
pub struct InMemoryStore<T> {
    state: Arc<RwLock<InMemoryState<T>>>,
    clock: Clock,
}

impl<T: Disclosure> InMemoryStore<T> {
    pub fn new() -> Self {
        Self::with_clock(system_clock())
    }

    pub fn with_clock(clock: Clock) -> Self {
        InMemoryStore {
            state: Arc::new(RwLock::new(InMemoryState {
                rows: BTreeMap::new(),
                next_id: 1,
            })),
            clock,
        }
    }

    fn read(&self) -> DisclosureResult<std::sync::RwLockReadGuard<'_, InMemoryState<T>>> {
        self.state
            .read()
            .map_err(|e| DisclosureError::Storage(format!("store lock poisoned: {}", e)))
    }

    fn write(&self) -> DisclosureResult<std::sync::RwLockWriteGuard<'_, InMemoryState<T>>> {
        self.state
            .write()
            .map_err(|e| DisclosureError::Storage(format!("store lock poisoned: {}", e)))
    }
}

impl<T: Disclosure> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Disclosure> RecordStore<T> for InMemoryStore<T> {
    fn get_all(&self) -> DisclosureResult<Vec<T>> {
        Ok(self.read()?.rows.values().cloned().collect())
    }

    fn get_by_id(&self, id: i64) -> DisclosureResult<Option<T>> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    fn get_by_year(&self, year: i32) -> DisclosureResult<Vec<T>> {
        Ok(self
            .read()?
            .rows
            .values()
            .filter(|r| r.reporting_year() == year)
            .cloned()
            .collect())
    }

    fn add(&self, mut entity: T) -> DisclosureResult<T> {
        let now = (self.clock)();
        let mut state = self.write()?;

        let id = state.next_id;
        state.next_id += 1;

        entity.set_id(id);
        entity.audit_mut().created_at = Some(now);
        entity.audit_mut().modified_at = Some(now);
        state.rows.insert(id, entity.clone());

        debug!(kind = T::KIND, id, "record added");
        Ok(entity)
    }

    fn update(&self, mut entity: T) -> DisclosureResult<T> {
        let id = require_id(&entity)?;
        let now = (self.clock)();
        let mut state = self.write()?;

        let existing = state.rows.get(&id).ok_or(DisclosureError::NotFound {
            entity: T::KIND,
            id,
        })?;

        // Creation audit belongs to the stored row, not the incoming copy.
        let created_at = existing.audit().created_at;
        let created_by = existing.audit().created_by.clone();
        entity.audit_mut().created_at = created_at;
        entity.audit_mut().created_by = created_by;
        entity.audit_mut().modified_at = Some(now);
        state.rows.insert(id, entity.clone());

        debug!(kind = T::KIND, id, "record replaced");
        Ok(entity)
    }

    fn delete(&self, id: i64) -> DisclosureResult<bool> {
        let removed = self.write()?.rows.remove(&id).is_some();
        debug!(kind = T::KIND, id, removed, "record delete");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Audit, MaterialityAssessment};
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock that advances one second per call, starting at 2025-01-01.
    fn ticking_clock() -> Clock {
        let ticks = Arc::new(AtomicI64::new(0));
        Arc::new(move || {
            let n = ticks.fetch_add(1, Ordering::SeqCst);
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::seconds(n)
        })
    }

    fn assessment(year: i32, topic: &str) -> MaterialityAssessment {
        let mut a = MaterialityAssessment::new(year, topic, 4, 2);
        a.audit = Audit::created_by("analyst");
        a
    }

    #[test]
    fn test_add_assigns_ids_and_timestamps() {
        let store = InMemoryStore::with_clock(ticking_clock());

        let first = store.add(assessment(2024, "Water")).unwrap();
        let second = store.add(assessment(2024, "Biodiversity")).unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(first.audit.created_at, first.audit.modified_at);
        assert!(second.audit.created_at > first.audit.created_at);
    }

    #[test]
    fn test_queries_by_id_and_year() {
        let store = InMemoryStore::new();
        store.add(assessment(2023, "Water")).unwrap();
        let saved = store.add(assessment(2024, "Climate")).unwrap();

        assert_eq!(store.get_all().unwrap().len(), 2);
        assert_eq!(store.get_by_year(2024).unwrap().len(), 1);
        assert!(store.exists_for_year(2023).unwrap());
        assert!(!store.exists_for_year(2022).unwrap());
        assert_eq!(store.get_by_id(saved.id.unwrap()).unwrap().unwrap().topic, "Climate");
        assert!(store.get_by_id(99).unwrap().is_none());
    }

    #[test]
    fn test_update_replaces_and_keeps_creation_audit() {
        let store = InMemoryStore::with_clock(ticking_clock());
        let saved = store.add(assessment(2024, "Water")).unwrap();

        let mut edited = saved.clone();
        edited.topic = "Water and marine resources".to_string();
        edited.audit = Audit::default();
        let updated = store.update(edited).unwrap();

        assert_eq!(updated.topic, "Water and marine resources");
        assert_eq!(updated.audit.created_at, saved.audit.created_at);
        assert_eq!(updated.audit.created_by, "analyst");
        assert!(updated.audit.modified_at > saved.audit.modified_at);
    }

    #[test]
    fn test_update_unknown_or_unsaved_id() {
        let store: InMemoryStore<MaterialityAssessment> = InMemoryStore::new();

        let mut ghost = assessment(2024, "Water");
        ghost.id = Some(7);
        assert!(matches!(
            store.update(ghost),
            Err(DisclosureError::NotFound { id: 7, .. })
        ));

        assert!(matches!(
            store.update(assessment(2024, "Water")),
            Err(DisclosureError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_delete_reports_removal() {
        let store = InMemoryStore::new();
        let saved = store.add(assessment(2024, "Water")).unwrap();
        let id = saved.id.unwrap();

        assert!(store.delete(id).unwrap());
        assert!(!store.delete(id).unwrap());
        assert!(store.get_all().unwrap().is_empty());
    }
}
