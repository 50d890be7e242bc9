//! Error types for the receipt model.

use thiserror::Error;

use crate::types::{ItemId, PersonId};

/// Errors that can occur while building, editing, or splitting a receipt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// The receipt (or the input used to change it) cannot be allocated.
    #[error("invalid allocation: {0}")]
    InvalidAllocation(#[from] ValidationError),

    #[error("person not found: {0}")]
    PersonNotFound(PersonId),

    #[error("item not found: {0}")]
    ItemNotFound(ItemId),
}

/// Validation errors for amounts, names, and assignment structure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("item {item} has no assignees and the receipt has no persons to split it across")]
    NoPersons { item: ItemId },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("{field} is not a number: {input:?}")]
    Malformed { field: &'static str, input: String },

    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },

    #[error("item {item} is assigned to person {person} who is not on the receipt")]
    UnknownAssignee { item: ItemId, person: PersonId },

    #[error("item {item} lists person {person} more than once")]
    DuplicateAssignee { item: ItemId, person: PersonId },

    #[error("no {kind} named {name:?}")]
    UnknownName { kind: &'static str, name: String },

    #[error("more than one {kind} is named {name:?}")]
    AmbiguousName { kind: &'static str, name: String },

    #[error("duplicate id {0}")]
    DuplicateId(String),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
