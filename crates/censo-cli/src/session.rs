//! Stored auth session.
//!
//! The session lives in a JSON file next to the database so `--db-path`
//! keeps environments (and tests) isolated from each other.

use std::path::{Path, PathBuf};

use censo_core::remote::AuthSession;

use crate::error::CliError;

fn session_path(db_path: &Path) -> PathBuf {
    db_path.with_file_name("session.json")
}

pub fn load_session(db_path: &Path) -> Result<Option<AuthSession>, CliError> {
    let path = session_path(db_path);
    match std::fs::read_to_string(&path) {
        Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error.into()),
    }
}

pub fn save_session(db_path: &Path, session: &AuthSession) -> Result<(), CliError> {
    let path = session_path(db_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, serde_json::to_string_pretty(session)?)?;
    Ok(())
}

pub fn clear_session(db_path: &Path) -> Result<(), CliError> {
    let path = session_path(db_path);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn session_roundtrip_and_clear() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("censo.db");

        assert!(load_session(&db_path).unwrap().is_none());

        let session = AuthSession::new("token", Uuid::nil(), None, "Betania");
        save_session(&db_path, &session).unwrap();
        assert_eq!(load_session(&db_path).unwrap(), Some(session));

        clear_session(&db_path).unwrap();
        assert!(load_session(&db_path).unwrap().is_none());
        // Clearing twice is fine
        clear_session(&db_path).unwrap();
    }
}
