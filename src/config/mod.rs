pub mod mapping;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "member-sync")]
#[command(about = "Sync member records from the membership system into the CRM")]
pub struct CliConfig {
    /// Token endpoint of the membership system
    #[arg(long, default_value = "https://api.partners.daxko.com/auth/token")]
    pub auth_endpoint: String,

    /// Member feed endpoint
    #[arg(long, default_value = "https://api.partners.daxko.com/v1/members")]
    pub api_endpoint: String,

    /// CRM contact upsert endpoint; omit to skip the push step
    #[arg(long)]
    pub crm_endpoint: Option<String>,

    /// API key for the CRM endpoint
    #[arg(long)]
    pub crm_api_key: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long)]
    pub client_id: String,

    #[arg(long)]
    pub client_secret: String,

    /// TOML field-mapping file; the built-in member table is used when omitted
    #[arg(long)]
    pub mapping_file: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn auth_endpoint(&self) -> &str {
        &self.auth_endpoint
    }

    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn crm_endpoint(&self) -> Option<&str> {
        self.crm_endpoint.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("auth_endpoint", &self.auth_endpoint)?;
        validation::validate_url("api_endpoint", &self.api_endpoint)?;
        if let Some(crm) = &self.crm_endpoint {
            validation::validate_url("crm_endpoint", crm)?;
        }
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty_string("client_id", &self.client_id)?;
        validation::validate_non_empty_string("client_secret", &self.client_secret)?;
        Ok(())
    }
}
