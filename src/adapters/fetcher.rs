use crate::domain::model::RawRow;
use crate::domain::ports::{ConfigProvider, MemberSource};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Fetches the member feed over HTTP: client-credentials token first, then
/// the feed itself, which arrives as a `{"data": [...]}` envelope.
pub struct HttpMemberSource<C: ConfigProvider> {
    config: C,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    data: Vec<Value>,
}

impl<C: ConfigProvider> HttpMemberSource<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    async fn acquire_token(&self) -> Result<String> {
        tracing::debug!("Requesting token from {}", self.config.auth_endpoint());
        let response = self
            .client
            .post(self.config.auth_endpoint())
            .json(&serde_json::json!({
                "client_id": self.config.client_id(),
                "client_secret": self.config.client_secret(),
                "grant_type": "client_credentials",
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::AuthError {
                message: format!("token endpoint returned {}", response.status()),
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl<C: ConfigProvider> MemberSource for HttpMemberSource<C> {
    async fn fetch(&self) -> Result<Vec<RawRow>> {
        let token = self.acquire_token().await?;

        tracing::debug!("Fetching member feed from {}", self.config.api_endpoint());
        let response = self
            .client
            .get(self.config.api_endpoint())
            .bearer_auth(&token)
            .send()
            .await?
            .error_for_status()?;

        let feed: FeedResponse = response.json().await?;
        tracing::debug!("Feed returned {} rows", feed.data.len());

        Ok(feed.data.iter().map(row_from_json).collect())
    }
}

/// Flatten one feed object into a raw row. Scalars coerce to strings, null
/// reads as empty; nested values are not expected in the feed and are skipped.
fn row_from_json(value: &Value) -> RawRow {
    let mut row = RawRow::new();
    if let Value::Object(fields) = value {
        for (key, field) in fields {
            match field {
                Value::String(s) => row.set(key, s),
                Value::Number(n) => row.set(key, &n.to_string()),
                Value::Bool(b) => row.set(key, if *b { "true" } else { "false" }),
                Value::Null => row.set(key, ""),
                Value::Array(_) | Value::Object(_) => {
                    tracing::warn!("Skipping non-scalar feed field '{}'", key);
                    continue;
                }
            };
        }
    }
    row
}
