//! Local persistence layer for Censo

mod connection;
mod local;
mod migrations;

pub use connection::Database;
pub use local::{CensusStore, LibSqlCensusStore};
