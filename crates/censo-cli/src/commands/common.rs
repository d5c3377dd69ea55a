//! Shared command plumbing: context construction and output formatting.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use censo_core::config::RemoteConfig;
use censo_core::models::{CensusRecord, NewCensusRecord, RecordId};
use censo_core::reachability::Reachability;
use censo_core::remote::{RemoteService, SupabaseClient};
use censo_core::stats::{age_on, display_group};
use censo_core::store::{CensusStore, Database, LibSqlCensusStore};
use censo_core::sync::{MutationRouter, SyncEngine, VisibleRecords};

use crate::error::CliError;
use crate::session;

/// Everything a command needs to act on one database.
pub struct AppContext {
    /// Held open for the lifetime of the command; the store shares its
    /// connection
    _db: Database,
    pub store: Arc<LibSqlCensusStore>,
    pub visible: VisibleRecords,
    pub reachability: Reachability,
    pub remote: Arc<dyn RemoteService>,
    pub remote_configured: bool,
    pub owner: Uuid,
}

impl AppContext {
    /// Open the database and wire up the sync components.
    ///
    /// With a remote config and a stored session present, the context
    /// starts online and routes mutations through the Supabase client;
    /// otherwise it starts offline and everything queues locally.
    pub async fn load(db_path: &Path) -> Result<Self, CliError> {
        let db = open_database(db_path).await?;
        let store = Arc::new(LibSqlCensusStore::new(db.connection()));

        let stored_session = session::load_session(db_path)?;
        let owner = stored_session
            .as_ref()
            .map_or_else(Uuid::nil, |s| s.user_id);

        let config = RemoteConfig::from_env();
        let (remote, remote_configured): (Arc<dyn RemoteService>, bool) =
            match (config, stored_session) {
                (Some(config), Some(active)) => {
                    tracing::info!("Remote service configured");
                    (Arc::new(SupabaseClient::new(config, active)?), true)
                }
                _ => (Arc::new(NoRemote), false),
            };

        let reachability = Reachability::new(remote_configured);

        let visible = VisibleRecords::new();
        visible.replace(store.all_records().await?);

        Ok(Self {
            _db: db,
            store,
            visible,
            reachability,
            remote,
            remote_configured,
            owner,
        })
    }

    pub fn router(&self) -> MutationRouter {
        MutationRouter::new(
            self.store.clone(),
            self.remote.clone(),
            self.visible.clone(),
            self.reachability.clone(),
            self.owner,
        )
    }

    pub fn engine(&self) -> SyncEngine {
        SyncEngine::new(self.store.clone(), self.remote.clone(), self.visible.clone())
    }

    /// Find a record in the local view by id.
    pub fn find_record(&self, id: &str) -> Result<CensusRecord, CliError> {
        let record_id: RecordId = id
            .trim()
            .parse()
            .map_err(|_| CliError::InvalidRecordId(id.to_string()))?;
        self.visible
            .get(record_id)
            .ok_or_else(|| CliError::RecordNotFound(id.to_string()))
    }
}

/// Null object used when no remote is configured; mutations queue locally
/// and sync is reported as not configured before it gets here.
struct NoRemote;

#[async_trait]
impl RemoteService for NoRemote {
    async fn fetch_records(&self) -> censo_core::Result<Vec<CensusRecord>> {
        Err(not_configured())
    }

    async fn create_record(&self, _: &NewCensusRecord) -> censo_core::Result<CensusRecord> {
        Err(not_configured())
    }

    async fn bulk_create_records(
        &self,
        _: &[NewCensusRecord],
    ) -> censo_core::Result<Vec<CensusRecord>> {
        Err(not_configured())
    }

    async fn update_record(&self, _: &CensusRecord) -> censo_core::Result<CensusRecord> {
        Err(not_configured())
    }

    async fn delete_record(&self, _: RecordId) -> censo_core::Result<()> {
        Err(not_configured())
    }
}

fn not_configured() -> censo_core::Error {
    censo_core::Error::Remote("Remote service not configured".to_string())
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("CENSO_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("censo")
        .join("censo.db")
}

async fn open_database(path: &Path) -> Result<Database, CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Database::open(path).await?)
}

#[derive(Debug, Serialize)]
pub struct RecordListItem {
    pub id: i64,
    pub full_name: String,
    pub birth_date: Option<String>,
    pub age: Option<i32>,
    pub national_id: Option<String>,
    pub gender: Option<String>,
    pub group: Option<String>,
    pub status: String,
    /// True while the record only exists in the local queue
    pub pending: bool,
}

pub fn record_to_list_item(record: &CensusRecord) -> RecordListItem {
    let today = Utc::now().date_naive();
    RecordListItem {
        id: record.id.as_i64(),
        full_name: record.full_name.clone(),
        birth_date: record
            .birth_date
            .map(|d| d.format("%Y-%m-%d").to_string()),
        age: record.birth_date.map(|d| age_on(d, today)),
        national_id: record.national_id.clone(),
        gender: record.gender.map(|g| g.to_string()),
        group: display_group(record, today).map(|g| g.to_string()),
        status: record.status.to_string(),
        pending: record.id.is_placeholder(),
    }
}

pub fn format_record_lines(records: &[CensusRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            let item = record_to_list_item(record);
            let age = item
                .age
                .map_or_else(|| "N/A".to_string(), |age| age.to_string());
            let group = item.group.unwrap_or_else(|| "-".to_string());
            let marker = if item.pending { "*" } else { " " };

            format!(
                "{:<15}{marker} {:<32} {age:>4}  {group:<3} {}",
                item.id, item.full_name, item.status
            )
        })
        .collect()
}

/// Sort the way the remote lists: by full name, ascending.
pub fn sort_for_listing(records: &mut [CensusRecord]) {
    records.sort_by(|a, b| a.full_name.cmp(&b.full_name));
}

pub fn parse_birth_date(raw: &str) -> Result<chrono::NaiveDate, CliError> {
    chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|error| {
        CliError::Core(censo_core::Error::InvalidInput(format!(
            "Invalid birth date (expected YYYY-MM-DD): {error}"
        )))
    })
}

#[cfg(test)]
mod tests {
    use censo_core::models::MembershipStatus;
    use pretty_assertions::assert_eq;

    use super::*;

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
    fn resolve_db_path_prefers_cli_flag() {
        let flag = PathBuf::from("/tmp/custom.db");
        assert_eq!(resolve_db_path(Some(flag.clone())), flag);
    }

    #[test]
    fn list_item_marks_pending_placeholders() {
        let item = record_to_list_item(&record(-17, "Marta"));
        assert!(item.pending);
        let item = record_to_list_item(&record(5, "Luis"));
        assert!(!item.pending);
    }

    #[test]
    fn sort_for_listing_orders_by_name() {
        let mut records = vec![record(1, "Rosa"), record(2, "Ana")];
        sort_for_listing(&mut records);
        assert_eq!(records[0].full_name, "Ana");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn context_without_remote_config_starts_offline() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("censo.db");

        let ctx = AppContext::load(&db_path).await.unwrap();
        assert!(!ctx.remote_configured);
        assert!(!ctx.reachability.is_online());
        assert!(ctx.visible.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn context_loads_visible_set_from_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("censo.db");

        {
            let ctx = AppContext::load(&db_path).await.unwrap();
            ctx.store.replace_records(&[record(1, "Ana")]).await.unwrap();
        }

        let ctx = AppContext::load(&db_path).await.unwrap();
        assert_eq!(ctx.visible.len(), 1);
        assert_eq!(ctx.find_record("1").unwrap().full_name, "Ana");
        assert!(matches!(
            ctx.find_record("99"),
            Err(CliError::RecordNotFound(_))
        ));
        assert!(matches!(
            ctx.find_record("abc"),
            Err(CliError::InvalidRecordId(_))
        ));
    }
}
