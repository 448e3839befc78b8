//! Cross-cutting error types for the knowledge base.
//!
//! This module defines the error taxonomy shared by every crate. Storage and
//! transport failures (`DatabaseError`, `EngineError`) live in their own crates
//! and wrap `CoreError` where a core rule was violated; the binary converges
//! all of them into `anyhow`.

use thiserror::Error;

/// Errors raised by the pure knowledge-base logic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Input failed a shape, range or required-field check. Nothing was written.
    #[error("Validation error: {subject}: {reason}")]
    Validation { subject: String, reason: String },

    /// A referential rule blocked the operation (e.g. deleting a characteristic in use).
    #[error("Conflict: {entity_type} {id}: {reason}")]
    Conflict {
        entity_type: String,
        id: String,
        reason: String,
    },

    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// The specialist submitted a form with no usable value.
    #[error("Empty query: at least one characteristic must be supplied")]
    EmptyQuery,

    /// A specialist-flow transition was attempted that is not allowed.
    #[error("Invalid state transition: from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

impl CoreError {
    /// Shorthand for a [`CoreError::Validation`].
    pub fn validation(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`CoreError::NotFound`].
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    /// Shorthand for a [`CoreError::Conflict`].
    pub fn conflict(entity_type: &str, id: impl ToString, reason: impl Into<String>) -> Self {
        Self::Conflict {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
