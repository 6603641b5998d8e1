pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{crm::HttpCrmSink, csv_writer::DualHeaderCsvWriter, fetcher::HttpMemberSource};
pub use config::{mapping::MappingTable, CliConfig};
pub use core::{engine::SyncEngine, transformer::MemberTransformer};
pub use utils::error::{Result, SyncError};
