//! Cross-cutting error types for Scrutiny.
//!
//! Domain-agnostic failures live here; storage errors are defined in
//! `scrutiny-store`. The two converge in `scrutiny-store::ServiceError`, and
//! the CLI reports everything through `anyhow`.

use thiserror::Error;

/// Errors raised by the permission and validation layers.
///
/// None of these are retried automatically: every failure is terminal for
/// the user action that triggered it.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The acting user is not allowed to perform the operation.
    #[error("Permission denied: {actor} may not {action}")]
    PermissionDenied { actor: String, action: String },

    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Caller-supplied data is missing required fields. Caught before any
    /// persistence attempt.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Convenience constructor for permission failures.
    #[must_use]
    pub fn denied(actor: impl Into<String>, action: impl Into<String>) -> Self {
        Self::PermissionDenied {
            actor: actor.into(),
            action: action.into(),
        }
    }

    /// Convenience constructor for missing audits.
    #[must_use]
    pub fn audit_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "audit".into(),
            id: id.into(),
        }
    }
}
