//! Error types for rnagrid.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RnagridError>;

/// All errors produced by the pyramid pipeline.
#[derive(Error, Debug)]
pub enum RnagridError {
    /// Input data violates a precondition (negative or non-finite
    /// coordinates, missing columns, too many distinct genes). Fatal;
    /// raised before anything is written.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An internal invariant broke (e.g. a gene code outside the catalog
    /// range). Indicates a programming defect, not bad user data.
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
