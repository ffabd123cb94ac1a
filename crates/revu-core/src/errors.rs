//! Cross-cutting error types for Revu.
//!
//! Domain-specific errors (`DatabaseError`, `AuthError`, `ApiError`) live in
//! their own crates. The HTTP boundary in `revu-api` is where they converge.

use thiserror::Error;

/// Errors that can be raised by any Revu crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A type label did not classify to a known entity kind.
    #[error("Invalid entity type: {label}")]
    InvalidKind { label: String },

    /// An entity kind was used in a role it cannot play (e.g. a Grant as liker).
    #[error("{kind} cannot act as {role}")]
    InvalidRole { kind: String, role: &'static str },

    /// A hashid alphabet was rejected.
    #[error("Invalid hashid alphabet: {0}")]
    InvalidAlphabet(String),

    /// Data failed validation (schema, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
