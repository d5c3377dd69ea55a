//! censo-core - Core library for Censo
//!
//! This crate contains the shared models, local store, remote client, and
//! offline-first sync engine used by all Censo interfaces.

pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod reachability;
pub mod remote;
pub mod state;
pub mod stats;
pub mod store;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{CensusRecord, NewCensusRecord, RecordId};
pub use state::SyncState;
