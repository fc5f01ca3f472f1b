//! Storage and service error types for scrutiny-store.

use thiserror::Error;

use scrutiny_core::errors::CoreError;

/// Errors from either persistence adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// An optimistic version check failed: another session wrote the audit
    /// after we read it. Never retried automatically.
    #[error("Concurrent update detected for {id} (stale version {version})")]
    VersionConflict { id: String, version: i64 },

    /// JSON (de)serialization of a stored document failed.
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A local-store file operation failed.
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Unified error for the aggregate manager and the user directory.
///
/// Permission and validation failures come from `scrutiny-core`; everything
/// else is storage. The CLI converges both through `anyhow`.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Whether this failure is a permission rejection (blocking notice to
    /// the user, never retried).
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Core(CoreError::PermissionDenied { .. }))
    }
}
