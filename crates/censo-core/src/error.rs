//! Error types for censo-core

use thiserror::Error;

/// Result type alias using censo-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in censo-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote HTTP request failed (connectivity, TLS, timeouts)
    #[error("Remote request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote service rejected the request
    #[error("Remote service error: {0}")]
    Remote(String),

    /// A queued operation references a placeholder id with no confirmed mapping
    #[error("Unresolved placeholder id: {0}")]
    UnresolvedPlaceholder(i64),
}
