//! Supabase password authentication client.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RemoteConfig;
use crate::error::{Error, Result};

use super::parse_api_error;

/// Church name assigned to accounts that never completed profile setup
pub const DEFAULT_CHURCH_NAME: &str = "Mi Iglesia";

/// An authenticated session with the remote service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    access_token: String,
    pub user_id: Uuid,
    pub email: Option<String>,
    pub church_name: String,
}

impl AuthSession {
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        user_id: Uuid,
        email: Option<String>,
        church_name: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            user_id,
            email,
            church_name: church_name.into(),
        }
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("church_name", &self.church_name)
            .finish()
    }
}

/// Password-grant auth client for the Supabase auth endpoint.
#[derive(Clone)]
pub struct AuthClient {
    config: RemoteConfig,
    client: reqwest::Client,
}

impl AuthClient {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        Ok(Self {
            config,
            client: reqwest::Client::builder().build()?,
        })
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        let email = email.trim();
        if email.is_empty() {
            return Err(Error::InvalidInput("Email must not be empty".to_string()));
        }

        let url = format!(
            "{}/auth/v1/token?grant_type=password",
            self.config.supabase_url
        );
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .header("Accept", "application/json")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Remote(parse_api_error(status, &body)));
        }

        let payload = response.json::<TokenResponse>().await?;
        payload.try_into()
    }

    /// Register a new account, storing the church name in user metadata.
    pub async fn sign_up(&self, email: &str, password: &str, church_name: &str) -> Result<AuthSession> {
        let url = format!("{}/auth/v1/signup", self.config.supabase_url);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": { "church_name": church_name },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Remote(parse_api_error(status, &body)));
        }

        let payload = response.json::<TokenResponse>().await?;
        payload.try_into()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    user: Option<TokenUser>,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: Uuid,
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    church_name: Option<String>,
}

impl TryFrom<TokenResponse> for AuthSession {
    type Error = Error;

    fn try_from(value: TokenResponse) -> Result<Self> {
        let access_token = value
            .access_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                Error::Remote("Auth response did not include access_token".to_string())
            })?;

        let user = value
            .user
            .ok_or_else(|| Error::Remote("Auth response did not include user".to_string()))?;

        let church_name = user
            .user_metadata
            .church_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_CHURCH_NAME.to_string());

        Ok(Self {
            access_token,
            user_id: user.id,
            email: user.email,
            church_name,
        })
    }
}
