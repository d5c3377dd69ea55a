//! Sync engine: reconciles local and remote state across connectivity
//! transitions.
//!
//! One cycle drains the pending queue in FIFO order, fetches the complete
//! remote collection, and replaces both the local snapshot and the visible
//! set with it. The remote service is the source of truth after a drain;
//! when anything fails, the engine degrades to serving the stale local
//! snapshot rather than leaving the user without data.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::error::{Error, Result};
use crate::models::{Mutation, RecordId, SyncOperation};
use crate::reachability::{ReachabilityEvent, ReachabilityEvents};
use crate::remote::RemoteService;
use crate::state::SyncState;
use crate::store::CensusStore;

use super::visible::VisibleRecords;

pub struct SyncEngine {
    store: Arc<dyn CensusStore>,
    remote: Arc<dyn RemoteService>,
    visible: VisibleRecords,
    status: watch::Sender<SyncState>,
    /// Serializes sync cycles; overlapping drains would race on the queue
    /// and snapshot.
    cycle_lock: Mutex<()>,
}

impl SyncEngine {
    #[must_use]
    pub fn new(
        store: Arc<dyn CensusStore>,
        remote: Arc<dyn RemoteService>,
        visible: VisibleRecords,
    ) -> Self {
        let (status, _) = watch::channel(SyncState::Offline);
        Self {
            store,
            remote,
            visible,
            status,
            cycle_lock: Mutex::new(()),
        }
    }

    /// Subscribe to status changes for the ambient indicator.
    #[must_use]
    pub fn status(&self) -> watch::Receiver<SyncState> {
        self.status.subscribe()
    }

    /// Current status.
    #[must_use]
    pub fn state(&self) -> SyncState {
        *self.status.borrow()
    }

    /// Drive the engine from a reachability subscription until it closes.
    ///
    /// Performs the startup transition for `initially_online`, then reacts
    /// to each edge: regained connectivity starts a sync cycle, lost
    /// connectivity is a status-only transition. Dropping the last
    /// `Reachability` handle ends the subscription and returns.
    pub async fn run(&self, initially_online: bool, mut events: ReachabilityEvents) {
        if initially_online {
            if let Err(error) = self.sync_cycle().await {
                tracing::warn!("Startup sync failed: {error}");
            }
        } else if let Err(error) = self.enter_offline().await {
            tracing::error!("Could not load local snapshot: {error}");
        }

        while let Some(event) = events.next().await {
            match event {
                ReachabilityEvent::CameOnline => {
                    if let Err(error) = self.sync_cycle().await {
                        tracing::warn!("Sync cycle failed: {error}");
                    }
                }
                ReachabilityEvent::WentOffline => {
                    // Status only; the visible set keeps whatever it has
                    self.set_state(SyncState::Offline);
                }
            }
        }
    }

    /// Offline entry: present the last local snapshot, no remote calls.
    pub async fn enter_offline(&self) -> Result<()> {
        self.set_state(SyncState::Offline);
        self.present_local().await
    }

    /// One drain-then-refresh cycle.
    ///
    /// Single-flight: a cycle entered while another is in flight waits for
    /// it to finish before running. On any failure the state drops to
    /// `Error`, the local snapshot is presented, and the original error is
    /// returned.
    pub async fn sync_cycle(&self) -> Result<()> {
        let _guard = self.cycle_lock.lock().await;

        self.set_state(SyncState::Syncing);
        match self.drain_and_refresh().await {
            Ok(()) => {
                self.set_state(SyncState::Online);
                Ok(())
            }
            Err(error) => {
                tracing::warn!("Sync cycle degraded to local snapshot: {error}");
                self.set_state(SyncState::Error);
                self.present_local().await?;
                Err(error)
            }
        }
    }

    async fn drain_and_refresh(&self) -> Result<()> {
        self.drain_queue().await?;

        let records = self.remote.fetch_records().await?;
        self.visible.replace(records.clone());
        self.store.replace_records(&records).await?;
        Ok(())
    }

    /// Replay queued operations strictly in enqueue order, one at a time.
    ///
    /// Fail-fast: the first dispatch failure aborts the drain, leaving that
    /// operation and everything after it queued for the next cycle. Later
    /// operations may depend on ids resolved by earlier creates, so
    /// skipping ahead is not safe.
    async fn drain_queue(&self) -> Result<()> {
        let queue = self.store.sync_queue().await?;
        if queue.is_empty() {
            return Ok(());
        }

        tracing::info!("Draining {} queued operations", queue.len());
        for operation in queue {
            self.dispatch(operation).await?;
        }
        Ok(())
    }

    async fn dispatch(&self, operation: SyncOperation) -> Result<()> {
        match operation.mutation {
            Mutation::Create(record) => {
                let placeholder = record.id;
                let created = self.remote.create_record(&record.as_draft()).await?;
                if placeholder.is_placeholder() {
                    // Map before removing the queue entry so a crash in
                    // between still leaves later operations resolvable
                    self.store
                        .record_placeholder(placeholder, created.id)
                        .await?;
                }
            }
            Mutation::Update(mut record) => {
                record.id = self.resolve(record.id).await?;
                self.remote.update_record(&record).await?;
            }
            Mutation::Delete(id) => {
                let id = self.resolve(id).await?;
                self.remote.delete_record(id).await?;
            }
        }
        self.store.remove_operation(operation.id).await
    }

    /// Rewrite a placeholder id through the durable map established by the
    /// confirming create.
    async fn resolve(&self, id: RecordId) -> Result<RecordId> {
        if !id.is_placeholder() {
            return Ok(id);
        }
        self.store
            .resolve_placeholder(id)
            .await?
            .ok_or(Error::UnresolvedPlaceholder(id.as_i64()))
    }

    async fn present_local(&self) -> Result<()> {
        let records = self.store.all_records().await?;
        self.visible.replace(records);
        Ok(())
    }

    fn set_state(&self, state: SyncState) {
        self.status.send_replace(state);
    }
}
