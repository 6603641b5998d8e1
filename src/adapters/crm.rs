use crate::domain::model::{TransformedRecord, UpdateStats};
use crate::domain::ports::CrmSink;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Pushes transformed records into the CRM one upsert at a time. Rejected
/// records are counted and logged, not fatal; only transport errors abort.
pub struct HttpCrmSink {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpCrmSink {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            endpoint,
            api_key,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl CrmSink for HttpCrmSink {
    async fn push(&self, records: &[TransformedRecord]) -> Result<UpdateStats> {
        let mut stats = UpdateStats::default();

        for record in records {
            let mut request = self.client.post(&self.endpoint).json(record);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = request.send().await?;
            if response.status().is_success() {
                stats.updated += 1;
            } else {
                stats.failed += 1;
                tracing::warn!(
                    "CRM rejected record for member '{}': {}",
                    record.get_str("member_number"),
                    response.status()
                );
            }
        }

        tracing::info!("CRM push done: {} updated, {} failed", stats.updated, stats.failed);
        Ok(stats)
    }
}
