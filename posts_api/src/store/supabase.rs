use std::time::Duration;

use redact::Secret;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};

use crate::models::{Post, PostId};
use crate::token::TokenHash;

use super::{PostStore, StoreError};

const POST_COLUMNS: &str = "id,delete_token_hash";

/// `PostStore` backed by the PostgREST interface of a Supabase project,
/// authenticated with the service role key.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    table_url: Url,
    service_key: Secret<String>,
}

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
}

impl SupabaseStore {
    /// Builds the store client.
    ///
    /// # Errors
    /// If `base_url` is not an absolute URL or the HTTP client cannot be
    /// constructed.
    pub fn new(
        base_url: &str,
        service_key: Secret<String>,
        table: &str,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let table_url = Url::parse(&format!(
            "{}/rest/v1/{table}",
            base_url.trim_end_matches('/')
        ))
        .map_err(|e| StoreError::Config(format!("{base_url}: {e}")))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            table_url,
            service_key,
        })
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let key = self.service_key.expose_secret();

        self.client
            .request(method, self.table_url.clone())
            .header("apikey", key)
            .bearer_auth(key)
    }
}

async fn read_rows<T: DeserializeOwned>(
    response: Response,
) -> Result<Vec<T>, StoreError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<PostgrestError>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| status.to_string());

        return Err(StoreError::Response {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_slice(&body)?)
}

impl PostStore for SupabaseStore {
    #[tracing::instrument(skip(self))]
    async fn fetch_by_id(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        let id_filter = format!("eq.{id}");

        let response = self
            .request(Method::GET)
            .query(&[("select", POST_COLUMNS), ("id", id_filter.as_str())])
            .send()
            .await?;

        let rows: Vec<Post> = read_rows(response).await?;

        if rows.len() > 1 {
            tracing::warn!("{0} posts share id {id}", rows.len());
        }

        Ok(rows.into_iter().next())
    }

    #[tracing::instrument(skip(self, expected_hash))]
    async fn delete_by_id(
        &self,
        id: PostId,
        expected_hash: &TokenHash,
    ) -> Result<bool, StoreError> {
        let id_filter = format!("eq.{id}");
        let hash_filter = format!("eq.{}", expected_hash.as_str());

        let response = self
            .request(Method::DELETE)
            .header("Prefer", "return=representation")
            .query(&[
                ("select", "id"),
                ("id", id_filter.as_str()),
                ("delete_token_hash", hash_filter.as_str()),
            ])
            .send()
            .await?;

        let rows: Vec<IgnoredAny> = read_rows(response).await?;

        tracing::info!("deleted {0} row(s)", rows.len());

        Ok(!rows.is_empty())
    }
}
