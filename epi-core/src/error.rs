/// Error types for the EPI engine
use thiserror::Error;

/// Main error type for loading and querying case records
#[derive(Error, Debug)]
pub enum EpiError {
    /// Required column missing, or a date/count failed to parse
    #[error("Schema error: {0}")]
    Schema(String),

    /// Aggregation requested over a store with zero records
    #[error("Record store is empty")]
    EmptyStore,

    /// Region is not one of the store's selectable regions
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// Case type selector value not recognised
    #[error("Unknown case type: {0}")]
    UnknownCaseType(String),

    /// Failed to read CSV input
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to read a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Type alias for Results using EpiError
pub type Result<T> = std::result::Result<T, EpiError>;
