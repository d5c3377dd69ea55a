//! Shared sync status types.

use std::fmt;

/// Connection status surfaced by the ambient status indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Offline,
    Syncing,
    Online,
    Error,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Offline => "offline",
            Self::Syncing => "syncing",
            Self::Online => "online",
            Self::Error => "error",
        };
        write!(f, "{label}")
    }
}
