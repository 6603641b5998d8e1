// Adapters layer: concrete implementations for external systems (source feed,
// CRM, file output).

pub mod crm;
pub mod csv_writer;
pub mod fetcher;
