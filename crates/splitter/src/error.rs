//! Error types for the receipt store.

use splitter_core::{ItemId, ModelError, PersonId, ReceiptId, ValidationError};
use splitter_store::StoreError;
use thiserror::Error;

/// Errors that can occur during receipt store operations.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Persisted data is malformed. `load` recovers from this locally.
    #[error("parse error: {0}")]
    Parse(String),

    /// Receipt input cannot be allocated (bad amount, dangling assignment, ...).
    #[error("invalid allocation: {0}")]
    InvalidAllocation(ValidationError),

    #[error("person not found: {0}")]
    PersonNotFound(PersonId),

    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// No receipt with this id is in the collection.
    #[error("receipt not found: {0}")]
    NotFound(ReceiptId),

    #[error("position {position} is out of range for {len} receipts")]
    InvalidPosition { position: usize, len: usize },

    /// Backend error.
    #[error("storage error: {0}")]
    Backend(#[from] StoreError),

    /// The collection could not be serialized.
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<ModelError> for SplitError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::InvalidAllocation(v) => SplitError::InvalidAllocation(v),
            ModelError::PersonNotFound(id) => SplitError::PersonNotFound(id),
            ModelError::ItemNotFound(id) => SplitError::ItemNotFound(id),
        }
    }
}

impl From<ValidationError> for SplitError {
    fn from(e: ValidationError) -> Self {
        SplitError::InvalidAllocation(e)
    }
}

/// Result type for receipt store operations.
pub type Result<T> = std::result::Result<T, SplitError>;
