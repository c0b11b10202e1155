//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::application::ingest::TreeFormat;
use crate::domain::DomainError;

/// Application errors wrap domain errors and add ingestion, editing and config context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("unsupported file format: {0} (use JSON, YAML or XML)")]
    UnsupportedFormat(PathBuf),

    #[error("invalid {format} attack tree: {message}")]
    Parse { format: TreeFormat, message: String },

    #[error("not a leaf node: {0}")]
    UnknownLeaf(String),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// The domain error behind this error, if any.
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            ApplicationError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
