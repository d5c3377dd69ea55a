//! Local census store implementation

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use libsql::{params, Connection, Row};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{CensusRecord, Mutation, RecordId, SyncOperation};

/// Trait for the durable local persistence layer.
///
/// Holds the last known snapshot of the remote collection and the FIFO
/// queue of pending mutations. Snapshot replacement and queue edits are
/// each individually atomic; nothing spans both.
#[async_trait]
pub trait CensusStore: Send + Sync {
    /// Read the full current snapshot (order unspecified)
    async fn all_records(&self) -> Result<Vec<CensusRecord>>;

    /// Atomically discard the previous snapshot and insert the given set
    async fn replace_records(&self, records: &[CensusRecord]) -> Result<()>;

    /// Pending operations in FIFO enqueue order (oldest first)
    async fn sync_queue(&self) -> Result<Vec<SyncOperation>>;

    /// Append one operation; the store assigns its queue id and timestamp
    async fn add_operation(&self, mutation: &Mutation) -> Result<SyncOperation>;

    /// Delete one operation by queue id; removing an absent id is not an error
    async fn remove_operation(&self, id: i64) -> Result<()>;

    /// Durably map a confirmed placeholder id to its server-assigned id
    async fn record_placeholder(&self, placeholder: RecordId, server_id: RecordId) -> Result<()>;

    /// Look up the server id a placeholder resolved to, if confirmed
    async fn resolve_placeholder(&self, placeholder: RecordId) -> Result<Option<RecordId>>;
}

/// `libSQL` implementation of [`CensusStore`]
#[derive(Clone)]
pub struct LibSqlCensusStore {
    conn: Connection,
}

impl LibSqlCensusStore {
    /// Create a new store over the given connection
    #[must_use]
    pub fn new(conn: &Connection) -> Self {
        Self { conn: conn.clone() }
    }

    /// Parse a census record from a snapshot row
    fn parse_record(row: &Row) -> Result<CensusRecord> {
        let user_id: String = row.get(1)?;
        let birth_date: Option<String> = row.get(3)?;
        let gender: Option<String> = row.get(5)?;
        let group: Option<String> = row.get(6)?;
        let status: String = row.get(7)?;
        let created_at: Option<String> = row.get(8)?;

        Ok(CensusRecord {
            id: RecordId::new(row.get(0)?),
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| Error::Database(format!("Invalid user id in store: {e}")))?,
            full_name: row.get(2)?,
            birth_date: birth_date
                .map(|raw| {
                    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                        .map_err(|e| Error::Database(format!("Invalid birth date in store: {e}")))
                })
                .transpose()?,
            national_id: row.get(4)?,
            gender: gender.map(|raw| raw.parse()).transpose()?,
            group: group.map(|raw| raw.parse()).transpose()?,
            status: status.parse()?,
            created_at: created_at
                .map(|raw| {
                    DateTime::parse_from_rfc3339(&raw)
                        .map(|parsed| parsed.with_timezone(&Utc))
                        .map_err(|e| Error::Database(format!("Invalid timestamp in store: {e}")))
                })
                .transpose()?,
        })
    }

    async fn insert_record(&self, record: &CensusRecord) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO census_records
                 (id, user_id, full_name, birth_date, national_id, gender, group_code, status, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    record.id.as_i64(),
                    record.user_id.to_string(),
                    record.full_name.clone(),
                    record.birth_date.map(|d| d.format("%Y-%m-%d").to_string()),
                    record.national_id.clone(),
                    record.gender.map(|g| g.to_string()),
                    record.group.map(|g| g.to_string()),
                    record.status.to_string(),
                    record.created_at.map(|t| t.to_rfc3339()),
                ],
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CensusStore for LibSqlCensusStore {
    async fn all_records(&self) -> Result<Vec<CensusRecord>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, user_id, full_name, birth_date, national_id, gender, group_code, status, created_at
                 FROM census_records",
                (),
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(Self::parse_record(&row)?);
        }
        Ok(records)
    }

    async fn replace_records(&self, records: &[CensusRecord]) -> Result<()> {
        // Clear + insert must be one atomic unit: a concurrent reader never
        // sees a partially-cleared snapshot, and a failed insert restores
        // the previous generation.
        self.conn.execute("BEGIN TRANSACTION", ()).await?;

        if let Err(e) = self.conn.execute("DELETE FROM census_records", ()).await {
            self.conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }

        for record in records {
            if let Err(e) = self.insert_record(record).await {
                self.conn.execute("ROLLBACK", ()).await.ok();
                return Err(e);
            }
        }

        if let Err(e) = self.conn.execute("COMMIT", ()).await {
            self.conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }

        tracing::debug!("Replaced local snapshot with {} records", records.len());
        Ok(())
    }

    async fn sync_queue(&self) -> Result<Vec<SyncOperation>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, kind, payload, queued_at FROM sync_queue ORDER BY id ASC",
                (),
            )
            .await?;

        let mut operations = Vec::new();
        while let Some(row) = rows.next().await? {
            let kind: String = row.get(1)?;
            let payload: String = row.get(2)?;
            operations.push(SyncOperation {
                id: row.get(0)?,
                mutation: Mutation::from_row(&kind, &payload)?,
                queued_at: row.get(3)?,
            });
        }
        Ok(operations)
    }

    async fn add_operation(&self, mutation: &Mutation) -> Result<SyncOperation> {
        let queued_at = Utc::now().timestamp_millis();
        self.conn
            .execute(
                "INSERT INTO sync_queue (kind, payload, queued_at) VALUES (?, ?, ?)",
                params![mutation.kind(), mutation.payload_json()?, queued_at],
            )
            .await?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!("Queued {} operation {}", mutation.kind(), id);
        Ok(SyncOperation {
            id,
            mutation: mutation.clone(),
            queued_at,
        })
    }

    async fn remove_operation(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM sync_queue WHERE id = ?", params![id])
            .await?;
        Ok(())
    }

    async fn record_placeholder(&self, placeholder: RecordId, server_id: RecordId) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO placeholder_map (placeholder_id, server_id) VALUES (?, ?)",
                params![placeholder.as_i64(), server_id.as_i64()],
            )
            .await?;
        Ok(())
    }

    async fn resolve_placeholder(&self, placeholder: RecordId) -> Result<Option<RecordId>> {
        let mut rows = self
            .conn
            .query(
                "SELECT server_id FROM placeholder_map WHERE placeholder_id = ?",
                params![placeholder.as_i64()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(RecordId::new(row.get(0)?))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::MembershipStatus;
    use crate::store::Database;

    fn record(id: i64, name: &str) -> CensusRecord {
        CensusRecord {
            id: RecordId::new(id),
            user_id: Uuid::nil(),
            full_name: name.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1985, 3, 14),
            national_id: Some("8-456-789".to_string()),
            gender: Some(crate::models::Gender::Female),
            group: Some(crate::models::Group::C),
            status: MembershipStatus::Active,
            created_at: None,
        }
    }

    async fn setup() -> (Database, LibSqlCensusStore) {
        let db = Database::open_in_memory().await.unwrap();
        let store = LibSqlCensusStore::new(db.connection());
        (db, store)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn replace_and_read_roundtrip() {
        let (_db, store) = setup().await;

        let records = vec![record(1, "Ana"), record(2, "Luis")];
        store.replace_records(&records).await.unwrap();

        let mut loaded = store.all_records().await.unwrap();
        loaded.sort_by_key(|r| r.id);
        assert_eq!(loaded, records);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn replace_discards_previous_snapshot() {
        let (_db, store) = setup().await;

        store
            .replace_records(&[record(1, "Ana"), record(2, "Luis")])
            .await
            .unwrap();
        store.replace_records(&[record(3, "Marta")]).await.unwrap();

        let loaded = store.all_records().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].full_name, "Marta");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn replace_rolls_back_on_duplicate_id() {
        let (_db, store) = setup().await;

        store.replace_records(&[record(1, "Ana")]).await.unwrap();

        // Duplicate primary key aborts the insert; the previous generation
        // must survive intact.
        let result = store
            .replace_records(&[record(7, "Luis"), record(7, "Marta")])
            .await;
        assert!(result.is_err());

        let loaded = store.all_records().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].full_name, "Ana");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn queue_preserves_fifo_order() {
        let (_db, store) = setup().await;

        store
            .add_operation(&Mutation::Create(record(-100, "Ana")))
            .await
            .unwrap();
        store
            .add_operation(&Mutation::Update(record(5, "Luis")))
            .await
            .unwrap();
        store
            .add_operation(&Mutation::Delete(RecordId::new(9)))
            .await
            .unwrap();

        let queue = store.sync_queue().await.unwrap();
        assert_eq!(queue.len(), 3);
        assert!(queue[0].id < queue[1].id && queue[1].id < queue[2].id);
        assert_eq!(queue[0].mutation.kind(), "CREATE");
        assert_eq!(queue[1].mutation.kind(), "UPDATE");
        assert_eq!(queue[2].mutation.kind(), "DELETE");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn remove_operation_is_idempotent() {
        let (_db, store) = setup().await;

        let op = store
            .add_operation(&Mutation::Delete(RecordId::new(1)))
            .await
            .unwrap();
        let other = store
            .add_operation(&Mutation::Delete(RecordId::new(2)))
            .await
            .unwrap();

        store.remove_operation(op.id).await.unwrap();
        // Removing the same id again must not error or disturb the rest
        store.remove_operation(op.id).await.unwrap();
        store.remove_operation(9999).await.unwrap();

        let queue = store.sync_queue().await.unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, other.id);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn placeholder_map_roundtrip() {
        let (_db, store) = setup().await;

        let placeholder = RecordId::new(-1_700_000_000_000);
        assert_eq!(store.resolve_placeholder(placeholder).await.unwrap(), None);

        store
            .record_placeholder(placeholder, RecordId::new(99))
            .await
            .unwrap();
        assert_eq!(
            store.resolve_placeholder(placeholder).await.unwrap(),
            Some(RecordId::new(99))
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn snapshot_and_queue_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("censo.db");

        {
            let db = Database::open(&db_path).await.unwrap();
            let store = LibSqlCensusStore::new(db.connection());
            store.replace_records(&[record(1, "Ana")]).await.unwrap();
            store
                .add_operation(&Mutation::Delete(RecordId::new(1)))
                .await
                .unwrap();
        }

        let db = Database::open(&db_path).await.unwrap();
        let store = LibSqlCensusStore::new(db.connection());

        let records = store.all_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_name, "Ana");

        let queue = store.sync_queue().await.unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].mutation, Mutation::Delete(RecordId::new(1)));
    }
}
