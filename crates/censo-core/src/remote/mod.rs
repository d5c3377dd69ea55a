//! Remote census service client

mod auth;
mod supabase;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

pub use auth::{AuthClient, AuthSession};
pub use supabase::SupabaseClient;

use crate::error::Result;
use crate::models::{CensusRecord, NewCensusRecord, RecordId};

/// The remote collection over the network.
///
/// Every method may fail with a connectivity or service error carrying a
/// human-readable message; callers treat any failure as "unreachable" and
/// fall back to local queuing.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Fetch the complete collection, ordered by full name ascending
    async fn fetch_records(&self) -> Result<Vec<CensusRecord>>;

    /// Create one record; the service assigns id and creation timestamp
    async fn create_record(&self, draft: &NewCensusRecord) -> Result<CensusRecord>;

    /// Create many records in one call
    async fn bulk_create_records(&self, drafts: &[NewCensusRecord]) -> Result<Vec<CensusRecord>>;

    /// Update one record by id, returning the stored row
    async fn update_record(&self, record: &CensusRecord) -> Result<CensusRecord>;

    /// Delete one record by id
    async fn delete_record(&self, id: RecordId) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Extract a readable message from an error response body.
pub(crate) fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_api_error_prefers_message_field() {
        let parsed = parse_api_error(
            StatusCode::CONFLICT,
            r#"{"message": "duplicate key value", "error": "conflict"}"#,
        );
        assert_eq!(parsed, "duplicate key value (409)");
    }

    #[test]
    fn parse_api_error_falls_back_to_body_text() {
        let parsed = parse_api_error(StatusCode::BAD_GATEWAY, "upstream unavailable");
        assert_eq!(parsed, "upstream unavailable (502)");
    }

    #[test]
    fn parse_api_error_handles_empty_body() {
        let parsed = parse_api_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(parsed, "HTTP 500");
    }
}
