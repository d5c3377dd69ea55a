use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] censo_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No member name provided")]
    EmptyName,
    #[error("Record ID must be an integer, got: {0}")]
    InvalidRecordId(String),
    #[error("Record not found: {0}")]
    RecordNotFound(String),
    #[error("No password provided. Set CENSO_PASSWORD or pipe it on stdin.")]
    MissingPassword,
    #[error("Not logged in. Run `censo auth login` first.")]
    NotLoggedIn,
    #[error("Bulk import requires a connection to the remote service.")]
    ImportRequiresConnection,
    #[error(
        "Sync is not configured. Set CENSO_SUPABASE_URL and CENSO_SUPABASE_ANON_KEY, then run `censo auth login`."
    )]
    SyncNotConfigured,
}
