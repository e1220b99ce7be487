//! Error types for metadata access

use cirrus_common::ContextError;
use thiserror::Error;

/// Error type for metadata operations
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The metadata service could not be reached or refused the request
    #[error("metadata request failed: {0}")]
    Request(String),

    /// The response body did not match the metadata schema
    #[error("failed to decode metadata: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Cancelled(#[from] ContextError),
}

/// Result type for metadata operations
pub type Result<T> = std::result::Result<T, MetadataError>;
