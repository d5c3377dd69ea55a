//! Data models for Censo

mod operation;
mod record;

pub use operation::{Mutation, SyncOperation};
pub use record::{CensusRecord, Gender, Group, MembershipStatus, NewCensusRecord, RecordId};
