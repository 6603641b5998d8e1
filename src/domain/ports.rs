use crate::domain::model::{RawRow, TransformedRecord, UpdateStats};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source-system feed of raw member rows.
#[async_trait]
pub trait MemberSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RawRow>>;
}

/// Destination CRM accepting transformed records for upsert.
#[async_trait]
pub trait CrmSink: Send + Sync {
    async fn push(&self, records: &[TransformedRecord]) -> Result<UpdateStats>;
}

pub trait ConfigProvider: Send + Sync {
    fn auth_endpoint(&self) -> &str;
    fn api_endpoint(&self) -> &str;
    fn crm_endpoint(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn client_id(&self) -> &str;
    fn client_secret(&self) -> &str;
}
