//! Remote endpoint configuration.

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

/// Environment variable holding the Supabase project URL
pub const SUPABASE_URL_VAR: &str = "CENSO_SUPABASE_URL";
/// Environment variable holding the Supabase anon/public key
pub const SUPABASE_ANON_KEY_VAR: &str = "CENSO_SUPABASE_ANON_KEY";

/// Connection settings for the remote census service.
///
/// These are safe-to-ship public endpoint values; per-user credentials
/// live in the auth session, never here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub supabase_url: String,
    pub anon_key: String,
}

impl RemoteConfig {
    /// Build a config, validating and normalizing the endpoint.
    pub fn new(supabase_url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self> {
        let supabase_url = normalize_endpoint(supabase_url.into())?;
        let anon_key = normalize_text_option(Some(anon_key.into()))
            .ok_or_else(|| Error::InvalidInput("Anon key must not be empty".to_string()))?;
        Ok(Self {
            supabase_url,
            anon_key,
        })
    }

    /// Read the config from the environment, if fully present.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let url = normalize_text_option(std::env::var(SUPABASE_URL_VAR).ok())?;
        let key = normalize_text_option(std::env::var(SUPABASE_ANON_KEY_VAR).ok())?;
        Self::new(url, key).ok()
    }
}

fn normalize_endpoint(raw: String) -> Result<String> {
    let endpoint = normalize_text_option(Some(raw))
        .ok_or_else(|| Error::InvalidInput("Endpoint must not be empty".to_string()))?;
    if is_http_url(&endpoint) {
        Ok(endpoint.trim_end_matches('/').to_string())
    } else {
        Err(Error::InvalidInput(
            "Endpoint must include http:// or https://".to_string(),
        ))
    }
}
