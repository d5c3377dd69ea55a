//! Shared in-memory record set.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::{CensusRecord, RecordId};

/// The record set a user is currently looking at.
///
/// Mutations apply synchronously, so the set already reflects the intended
/// state by the time a router call returns, ahead of any remote
/// confirmation. Cheap to clone; clones share the same underlying set.
#[derive(Debug, Clone, Default)]
pub struct VisibleRecords {
    inner: Arc<RwLock<Vec<CensusRecord>>>,
}

impl VisibleRecords {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current set.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CensusRecord> {
        self.inner.read().clone()
    }

    /// Replace the whole set in one step.
    pub fn replace(&self, records: Vec<CensusRecord>) {
        *self.inner.write() = records;
    }

    /// Insert a record, or replace the existing entry with the same id.
    pub fn upsert(&self, record: CensusRecord) {
        let mut records = self.inner.write();
        if let Some(existing) = records.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
        } else {
            records.push(record);
        }
    }

    /// Remove the record with the given id, if present.
    pub fn remove(&self, id: RecordId) {
        self.inner.write().retain(|r| r.id != id);
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<CensusRecord> {
        self.inner.read().iter().find(|r| r.id == id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::MembershipStatus;

    fn record(id: i64, name: &str) -> CensusRecord {
        CensusRecord {
            id: RecordId::new(id),
            user_id: Uuid::nil(),
            full_name: name.to_string(),
            birth_date: None,
            national_id: None,
            gender: None,
            group: None,
            status: MembershipStatus::Active,
            created_at: None,
        }
    }

    #[test]
    fn upsert_replaces_matching_id() {
        let visible = VisibleRecords::new();
        visible.upsert(record(1, "Ana"));
        visible.upsert(record(2, "Luis"));
        visible.upsert(record(1, "Ana Morales"));

        assert_eq!(visible.len(), 2);
        assert_eq!(
            visible.get(RecordId::new(1)).unwrap().full_name,
            "Ana Morales"
        );
    }

    #[test]
    fn remove_is_silent_for_missing_id() {
        let visible = VisibleRecords::new();
        visible.upsert(record(1, "Ana"));
        visible.remove(RecordId::new(99));
        assert_eq!(visible.len(), 1);
    }

    #[test]
    fn clones_share_state() {
        let visible = VisibleRecords::new();
        let alias = visible.clone();
        alias.upsert(record(1, "Ana"));
        assert_eq!(visible.len(), 1);
    }
}
