//! Supabase (PostgREST) implementation of the remote census service.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::models::{CensusRecord, NewCensusRecord, RecordId};

use super::{parse_api_error, AuthSession, RemoteService};

const RECORDS_TABLE: &str = "registros_censo";

/// REST client for the `registros_censo` table.
#[derive(Clone)]
pub struct SupabaseClient {
    config: RemoteConfig,
    session: AuthSession,
    client: reqwest::Client,
}

impl SupabaseClient {
    pub fn new(config: RemoteConfig, session: AuthSession) -> Result<Self> {
        Ok(Self {
            config,
            session,
            client: reqwest::Client::builder().build()?,
        })
    }

    fn records_url(&self) -> String {
        format!("{}/rest/v1/{RECORDS_TABLE}", self.config.supabase_url)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.config.anon_key)
            .bearer_auth(self.session.access_token())
            .header("Accept", "application/json")
    }

    /// Attach the owning user's id to a draft before insertion, the way
    /// the service-side table expects it.
    fn draft_with_owner(&self, draft: &NewCensusRecord) -> Result<Value> {
        let mut body = serde_json::to_value(draft)?;
        let Some(map) = body.as_object_mut() else {
            return Err(Error::InvalidInput(
                "Draft did not serialize to an object".to_string(),
            ));
        };
        map.insert(
            "user_id".to_string(),
            Value::String(self.session.user_id.to_string()),
        );
        Ok(body)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(Error::Remote(parse_api_error(status, &body)))
    }

    /// PostgREST returns representation bodies as arrays even for single
    /// row writes; unwrap the one expected row.
    fn single_row(mut rows: Vec<CensusRecord>) -> Result<CensusRecord> {
        match rows.len() {
            1 => Ok(rows.remove(0)),
            n => Err(Error::Remote(format!(
                "Expected exactly one row in response, got {n}"
            ))),
        }
    }
}

#[async_trait]
impl RemoteService for SupabaseClient {
    async fn fetch_records(&self) -> Result<Vec<CensusRecord>> {
        let response = self
            .request(self.client.get(self.records_url()))
            .query(&[("select", "*"), ("order", "nombre_completo.asc")])
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn create_record(&self, draft: &NewCensusRecord) -> Result<CensusRecord> {
        let body = self.draft_with_owner(draft)?;
        let response = self
            .request(self.client.post(self.records_url()))
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Self::single_row(response.json().await?)
    }

    async fn bulk_create_records(&self, drafts: &[NewCensusRecord]) -> Result<Vec<CensusRecord>> {
        let body = drafts
            .iter()
            .map(|draft| self.draft_with_owner(draft))
            .collect::<Result<Vec<Value>>>()?;
        let response = self
            .request(self.client.post(self.records_url()))
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn update_record(&self, record: &CensusRecord) -> Result<CensusRecord> {
        let response = self
            .request(self.client.patch(self.records_url()))
            .query(&[("id", format!("eq.{}", record.id))])
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Self::single_row(response.json().await?)
    }

    async fn delete_record(&self, id: RecordId) -> Result<()> {
        let response = self
            .request(self.client.delete(self.records_url()))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::MembershipStatus;

    fn client() -> SupabaseClient {
        let config = RemoteConfig::new("https://example.supabase.co", "anon-key").unwrap();
        let session = AuthSession::new("token", Uuid::nil(), None, "Mi Iglesia");
        SupabaseClient::new(config, session).unwrap()
    }

    #[test]
    fn records_url_targets_census_table() {
        assert_eq!(
            client().records_url(),
            "https://example.supabase.co/rest/v1/registros_censo"
        );
    }

    #[test]
    fn draft_with_owner_injects_user_id() {
        let draft = NewCensusRecord::new("Ana", MembershipStatus::Active).unwrap();
        let body = client().draft_with_owner(&draft).unwrap();

        assert_eq!(body["nombre_completo"], "Ana");
        assert_eq!(body["estado"], "Activo");
        assert_eq!(body["user_id"], Uuid::nil().to_string());
    }

    #[test]
    fn single_row_rejects_unexpected_counts() {
        assert!(SupabaseClient::single_row(vec![]).is_err());
    }
}
