use std::io::{IsTerminal, Read};
use std::path::Path;

use censo_core::config::RemoteConfig;
use censo_core::remote::AuthClient;

use crate::error::CliError;
use crate::session;

/// Environment variable consulted before falling back to piped stdin
const PASSWORD_VAR: &str = "CENSO_PASSWORD";

pub async fn run_login(email: &str, db_path: &Path) -> Result<(), CliError> {
    let config = RemoteConfig::from_env().ok_or(CliError::SyncNotConfigured)?;
    let password = resolve_password()?;

    let client = AuthClient::new(config)?;
    let active = client.sign_in(email, &password).await?;
    session::save_session(db_path, &active)?;

    println!("Logged in as {email} ({})", active.church_name);
    Ok(())
}

pub fn run_auth_status(db_path: &Path) -> Result<(), CliError> {
    match session::load_session(db_path)? {
        Some(active) => {
            println!("Logged in");
            println!("  user:   {}", active.user_id);
            if let Some(email) = &active.email {
                println!("  email:  {email}");
            }
            println!("  church: {}", active.church_name);
        }
        None => println!("Not logged in"),
    }
    Ok(())
}

pub fn run_logout(db_path: &Path) -> Result<(), CliError> {
    session::clear_session(db_path)?;
    println!("Logged out");
    Ok(())
}

fn resolve_password() -> Result<String, CliError> {
    if let Ok(password) = std::env::var(PASSWORD_VAR) {
        if !password.is_empty() {
            return Ok(password);
        }
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(CliError::MissingPassword);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    let password = buffer.trim_end_matches(['\n', '\r']).to_string();
    if password.is_empty() {
        return Err(CliError::MissingPassword);
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn login_requires_remote_config() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("censo.db");

        // No CENSO_SUPABASE_* in the test environment
        let error = run_login("ana@example.com", &db_path).await.unwrap_err();
        assert!(matches!(error, CliError::SyncNotConfigured));
    }

    #[test]
    fn auth_status_reports_logged_out() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("censo.db");

        run_auth_status(&db_path).unwrap();
        run_logout(&db_path).unwrap();
    }
}
