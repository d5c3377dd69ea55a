//! Mutation router: optimistic create/update/delete with local fallback.
//!
//! Every user-intended mutation lands in the visible set before the call
//! returns. When the remote service is reachable the mutation is attempted
//! immediately; when it isn't — or the attempt fails — the mutation is
//! queued for the next sync cycle instead. Remote failures are never
//! surfaced to the caller (availability over feedback); local store
//! failures always are.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{CensusRecord, Mutation, NewCensusRecord, RecordId};
use crate::reachability::Reachability;
use crate::remote::RemoteService;
use crate::store::CensusStore;

use super::visible::VisibleRecords;

pub struct MutationRouter {
    store: Arc<dyn CensusStore>,
    remote: Arc<dyn RemoteService>,
    visible: VisibleRecords,
    reachability: Reachability,
    /// Owner attached to placeholder records created offline
    owner: Uuid,
}

impl MutationRouter {
    #[must_use]
    pub fn new(
        store: Arc<dyn CensusStore>,
        remote: Arc<dyn RemoteService>,
        visible: VisibleRecords,
        reachability: Reachability,
        owner: Uuid,
    ) -> Self {
        Self {
            store,
            remote,
            visible,
            reachability,
            owner,
        }
    }

    /// Create a record.
    ///
    /// Returns the record as it is now visible: the server-assigned form
    /// when the immediate attempt succeeded, the placeholder form when the
    /// create was queued.
    pub async fn create(&self, draft: NewCensusRecord) -> Result<CensusRecord> {
        if self.reachability.is_online() {
            match self.remote.create_record(&draft).await {
                Ok(created) => {
                    self.visible.upsert(created.clone());
                    self.persist_visible().await?;
                    return Ok(created);
                }
                Err(error) => {
                    tracing::debug!("Immediate create failed, queuing: {error}");
                }
            }
        }

        let placeholder = CensusRecord::placeholder_for(draft, self.owner);
        self.store
            .add_operation(&Mutation::Create(placeholder.clone()))
            .await?;
        self.visible.upsert(placeholder.clone());
        Ok(placeholder)
    }

    /// Update a record by id match.
    pub async fn update(&self, record: CensusRecord) -> Result<CensusRecord> {
        if self.reachability.is_online() {
            match self.remote.update_record(&record).await {
                Ok(stored) => {
                    self.visible.upsert(stored.clone());
                    self.persist_visible().await?;
                    return Ok(stored);
                }
                Err(error) => {
                    tracing::debug!("Immediate update failed, queuing: {error}");
                }
            }
        }

        self.store
            .add_operation(&Mutation::Update(record.clone()))
            .await?;
        self.visible.upsert(record.clone());
        Ok(record)
    }

    /// Delete a record by id.
    pub async fn delete(&self, id: RecordId) -> Result<()> {
        if self.reachability.is_online() {
            match self.remote.delete_record(id).await {
                Ok(()) => {
                    self.visible.remove(id);
                    self.persist_visible().await?;
                    return Ok(());
                }
                Err(error) => {
                    tracing::debug!("Immediate delete failed, queuing: {error}");
                }
            }
        }

        self.store.add_operation(&Mutation::Delete(id)).await?;
        self.visible.remove(id);
        Ok(())
    }

    /// After a confirmed remote write, rewrite the snapshot from the
    /// visible set so a reload sees the same thing the user does.
    async fn persist_visible(&self) -> Result<()> {
        self.store.replace_records(&self.visible.snapshot()).await
    }
}
