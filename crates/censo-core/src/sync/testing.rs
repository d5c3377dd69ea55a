//! In-memory remote service double shared by the sync tests.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{CensusRecord, MembershipStatus, NewCensusRecord, RecordId};
use crate::remote::RemoteService;

/// Scripted remote: an in-memory collection with per-operation failure
/// switches and a call log for ordering assertions.
pub struct MockRemote {
    records: Mutex<Vec<CensusRecord>>,
    next_id: AtomicI64,
    calls: Mutex<Vec<String>>,
    pub fail_creates: AtomicBool,
    pub fail_updates: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub fail_fetch: AtomicBool,
}

impl MockRemote {
    pub fn new(first_id: i64) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(first_id),
            calls: Mutex::new(Vec::new()),
            fail_creates: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            fail_fetch: AtomicBool::new(false),
        }
    }

    pub fn seed(&self, records: Vec<CensusRecord>) {
        *self.records.lock() = records;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn server_records(&self) -> Vec<CensusRecord> {
        self.records.lock().clone()
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }
}

#[async_trait]
impl RemoteService for MockRemote {
    async fn fetch_records(&self) -> Result<Vec<CensusRecord>> {
        self.log("fetch");
        if self.fail_fetch.load(Ordering::Relaxed) {
            return Err(Error::Remote("fetch unavailable".to_string()));
        }
        let mut records = self.records.lock().clone();
        records.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(records)
    }

    async fn create_record(&self, draft: &NewCensusRecord) -> Result<CensusRecord> {
        self.log(format!("create:{}", draft.full_name));
        if self.fail_creates.load(Ordering::Relaxed) {
            return Err(Error::Remote("create rejected".to_string()));
        }
        let record = CensusRecord {
            id: RecordId::new(self.next_id.fetch_add(1, Ordering::Relaxed)),
            user_id: Uuid::nil(),
            full_name: draft.full_name.clone(),
            birth_date: draft.birth_date,
            national_id: draft.national_id.clone(),
            gender: draft.gender,
            group: draft.group,
            status: draft.status,
            created_at: Some(Utc::now()),
        };
        self.records.lock().push(record.clone());
        Ok(record)
    }

    async fn bulk_create_records(&self, drafts: &[NewCensusRecord]) -> Result<Vec<CensusRecord>> {
        self.log(format!("bulk_create:{}", drafts.len()));
        if self.fail_creates.load(Ordering::Relaxed) {
            return Err(Error::Remote("bulk create rejected".to_string()));
        }
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            created.push(self.create_record(draft).await?);
        }
        Ok(created)
    }

    async fn update_record(&self, record: &CensusRecord) -> Result<CensusRecord> {
        self.log(format!("update:{}", record.id));
        if self.fail_updates.load(Ordering::Relaxed) {
            return Err(Error::Remote("update rejected".to_string()));
        }
        let mut records = self.records.lock();
        let Some(existing) = records.iter_mut().find(|r| r.id == record.id) else {
            return Err(Error::Remote(format!("no row with id {}", record.id)));
        };
        *existing = record.clone();
        Ok(record.clone())
    }

    async fn delete_record(&self, id: RecordId) -> Result<()> {
        self.log(format!("delete:{id}"));
        if self.fail_deletes.load(Ordering::Relaxed) {
            return Err(Error::Remote("delete rejected".to_string()));
        }
        self.records.lock().retain(|r| r.id != id);
        Ok(())
    }
}

/// Minimal active-member fixture.
pub fn record(id: i64, name: &str) -> CensusRecord {
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

pub fn draft(name: &str) -> NewCensusRecord {
    NewCensusRecord::new(name, MembershipStatus::Active).unwrap()
}
