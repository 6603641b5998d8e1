use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Authentication failed: {message}")]
    AuthError { message: String },

    #[error("Mapping entry for '{source_field}' has an unsupported shape: {reason}")]
    MappingShapeError { source_field: String, reason: String },

    #[error("Record {record_index} is missing column '{column}' present in the file header")]
    SchemaDriftError { column: String, record_index: usize },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, SyncError>;
