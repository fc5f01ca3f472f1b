//! # scrutiny-store
//!
//! Persistence adapters and the audit aggregate manager for Scrutiny.
//!
//! Two interchangeable adapters implement [`AuditStore`]:
//! - [`local::LocalStore`]: a directory of JSON documents mirroring the
//!   key-value layout (`user_audits_<email>.json` per user plus a derived
//!   `all_audits.json` global view).
//! - [`remote::RemoteStore`]: a libSQL relational backend with `audits`,
//!   `contacts`, and `status_log` tables.
//!
//! The adapter is selected **once at startup** by [`open_store`]; nothing
//! branches on the backend per call. All mutations flow through
//! [`service::AuditManager`], which keeps its in-memory collection
//! consistent with whichever adapter is active.

pub mod error;
pub mod helpers;
pub mod local;
mod migrations;
pub mod remote;
pub mod service;
pub mod users;

mod test_support;

use scrutiny_config::{ScrutinyConfig, StoreBackend};
use scrutiny_core::entities::{Audit, StatusChange};

use error::StoreError;
use local::LocalStore;
use remote::RemoteStore;

/// The contract both persistence adapters satisfy.
///
/// `update_status` is the append path for a single status transition;
/// `update` is the general write-back used by edits (which may append
/// several log entries at once). Implementations never evaluate
/// permissions; that happens in the aggregate manager before any call
/// lands here.
#[allow(async_fn_in_trait)]
pub trait AuditStore {
    /// All audits, optionally filtered to one owner's email.
    async fn list(&self, owner: Option<&str>) -> Result<Vec<Audit>, StoreError>;

    /// Persist a brand-new audit.
    async fn create(&mut self, audit: &Audit) -> Result<(), StoreError>;

    /// Write back a full audit (fields, contacts, and any newly appended
    /// log entries). Returns the stored state, including any version bump.
    async fn update(&mut self, audit: &Audit) -> Result<Audit, StoreError>;

    /// Remove an audit. Returns `false` when the id is unknown.
    async fn delete(&mut self, id: &str) -> Result<bool, StoreError>;

    /// Append one status-bearing log entry and update the denormalized
    /// status (and archive flag) to match. Returns the stored audit.
    async fn update_status(&mut self, id: &str, entry: &StatusChange)
    -> Result<Audit, StoreError>;
}

/// The adapter picked at startup.
#[derive(Debug)]
pub enum Store {
    Local(LocalStore),
    Remote(RemoteStore),
}

impl AuditStore for Store {
    async fn list(&self, owner: Option<&str>) -> Result<Vec<Audit>, StoreError> {
        match self {
            Self::Local(s) => s.list(owner).await,
            Self::Remote(s) => s.list(owner).await,
        }
    }

    async fn create(&mut self, audit: &Audit) -> Result<(), StoreError> {
        match self {
            Self::Local(s) => s.create(audit).await,
            Self::Remote(s) => s.create(audit).await,
        }
    }

    async fn update(&mut self, audit: &Audit) -> Result<Audit, StoreError> {
        match self {
            Self::Local(s) => s.update(audit).await,
            Self::Remote(s) => s.update(audit).await,
        }
    }

    async fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        match self {
            Self::Local(s) => s.delete(id).await,
            Self::Remote(s) => s.delete(id).await,
        }
    }

    async fn update_status(
        &mut self,
        id: &str,
        entry: &StatusChange,
    ) -> Result<Audit, StoreError> {
        match self {
            Self::Local(s) => s.update_status(id, entry).await,
            Self::Remote(s) => s.update_status(id, entry).await,
        }
    }
}

/// Resolve the configured adapter, once, at startup.
///
/// Requesting the remote backend without a configured `[remote]` section
/// falls back to the local store with a logged warning instead of failing.
///
/// # Errors
///
/// Returns `StoreError` when the selected adapter cannot be opened.
pub async fn open_store(config: &ScrutinyConfig) -> Result<Store, StoreError> {
    match config.store.backend {
        StoreBackend::Remote if config.remote.is_configured() => {
            let store = RemoteStore::connect(&config.remote.url, &config.remote.auth_token).await?;
            Ok(Store::Remote(store))
        }
        StoreBackend::Remote => {
            tracing::warn!("remote backend requested but [remote] is not configured; using local store");
            Ok(Store::Local(LocalStore::open(&config.store.data_dir)?))
        }
        StoreBackend::Local => Ok(Store::Local(LocalStore::open(&config.store.data_dir)?)),
    }
}
