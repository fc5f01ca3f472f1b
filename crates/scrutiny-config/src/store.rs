//! Persistence backend selection.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which persistence adapter the application uses.
///
/// Resolved once at startup; nothing branches on this per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// File-backed key-value store under `data_dir`.
    Local,
    /// libSQL relational backend (requires `[remote]` to be configured).
    Remote,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".scrutiny")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Selected backend. Falls back to `local` when `remote` is requested
    /// but `[remote]` is unconfigured.
    #[serde(default = "StoreConfig::default_backend")]
    pub backend: StoreBackend,

    /// Directory holding the local key-value documents and the system
    /// audit log.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl StoreConfig {
    const fn default_backend() -> StoreBackend {
        StoreBackend::Local
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Self::default_backend(),
            data_dir: default_data_dir(),
        }
    }
}
