//! Queued sync operation model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::record::{CensusRecord, RecordId};

/// A user-intended mutation destined for the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    /// Create carries the full placeholder record so the optimistic entry
    /// can be rebuilt from the queue alone
    Create(CensusRecord),
    /// Update carries the full edited record
    Update(CensusRecord),
    /// Delete only needs the target id
    Delete(RecordId),
}

impl Mutation {
    /// Stable kind tag persisted in the queue table
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Create(_) => "CREATE",
            Self::Update(_) => "UPDATE",
            Self::Delete(_) => "DELETE",
        }
    }

    /// Serialize the payload column for this mutation.
    ///
    /// Create/Update store the whole record; Delete stores `{"id": n}`,
    /// matching the remote delete call's shape.
    pub fn payload_json(&self) -> Result<String> {
        let value = match self {
            Self::Create(record) | Self::Update(record) => serde_json::to_value(record)?,
            Self::Delete(id) => serde_json::json!({ "id": id.as_i64() }),
        };
        Ok(value.to_string())
    }

    /// Rebuild a mutation from its persisted kind + payload columns.
    pub fn from_row(kind: &str, payload: &str) -> Result<Self> {
        match kind {
            "CREATE" => Ok(Self::Create(serde_json::from_str(payload)?)),
            "UPDATE" => Ok(Self::Update(serde_json::from_str(payload)?)),
            "DELETE" => {
                #[derive(Deserialize)]
                struct IdPayload {
                    id: i64,
                }
                let parsed: IdPayload = serde_json::from_str(payload)?;
                Ok(Self::Delete(RecordId::new(parsed.id)))
            }
            other => Err(Error::Database(format!(
                "Unknown sync operation kind: {other}"
            ))),
        }
    }

    /// The record id this mutation targets
    #[must_use]
    pub const fn target(&self) -> RecordId {
        match self {
            Self::Create(record) | Self::Update(record) => record.id,
            Self::Delete(id) => *id,
        }
    }
}

/// A queued, not-yet-confirmed mutation.
///
/// The queue id is assigned by the local store and is unrelated to any
/// record id; drains consume operations in ascending queue-id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOperation {
    pub id: i64,
    pub mutation: Mutation,
    /// Enqueue time, Unix ms
    pub queued_at: i64,
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::record::MembershipStatus;

    fn sample_record(id: i64) -> CensusRecord {
        CensusRecord {
            id: RecordId::new(id),
            user_id: Uuid::nil(),
            full_name: "Ana".to_string(),
            birth_date: None,
            national_id: None,
            gender: None,
            group: None,
            status: MembershipStatus::Active,
            created_at: None,
        }
    }

    #[test]
    fn create_payload_roundtrips() {
        let mutation = Mutation::Create(sample_record(-1_700_000_000_000));
        let payload = mutation.payload_json().unwrap();
        let rebuilt = Mutation::from_row("CREATE", &payload).unwrap();
        assert_eq!(mutation, rebuilt);
    }

    #[test]
    fn delete_payload_is_bare_id() {
        let mutation = Mutation::Delete(RecordId::new(5));
        let payload = mutation.payload_json().unwrap();
        assert_eq!(payload, r#"{"id":5}"#);

        let rebuilt = Mutation::from_row("DELETE", &payload).unwrap();
        assert_eq!(rebuilt.target(), RecordId::new(5));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(Mutation::from_row("UPSERT", "{}").is_err());
    }

    #[test]
    fn kind_tags_are_stable() {
        assert_eq!(Mutation::Create(sample_record(1)).kind(), "CREATE");
        assert_eq!(Mutation::Update(sample_record(1)).kind(), "UPDATE");
        assert_eq!(Mutation::Delete(RecordId::new(1)).kind(), "DELETE");
    }
}
