pub mod add;
pub mod auth_cmd;
pub mod common;
pub mod completions;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod list;
pub mod stats;
pub mod sync;
