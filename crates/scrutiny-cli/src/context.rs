//! Application context: config, the selected store, and the user directory.

use std::path::PathBuf;

use anyhow::Context as _;

use scrutiny_config::ScrutinyConfig;
use scrutiny_core::entities::User;
use scrutiny_store::service::AuditManager;
use scrutiny_store::users::UserDirectory;
use scrutiny_store::{Store, open_store};

/// Everything a command handler needs.
pub struct AppContext {
    pub config: ScrutinyConfig,
    pub manager: AuditManager<Store>,
    pub directory: UserDirectory,
}

impl AppContext {
    /// Load config, resolve the persistence adapter once, and open the
    /// user directory.
    pub async fn init(data_dir_override: Option<PathBuf>) -> anyhow::Result<Self> {
        let mut config =
            ScrutinyConfig::load_with_dotenv().context("failed to load configuration")?;
        if let Some(dir) = data_dir_override {
            config.store.data_dir = dir;
        }

        tracing::debug!(backend = ?config.store.backend, "opening audit store");
        let store = open_store(&config)
            .await
            .context("failed to open the audit store")?;
        let manager = AuditManager::load(store)
            .await
            .context("failed to load audits")?;
        let directory = UserDirectory::open(&config.store.data_dir)
            .context("failed to open the user directory")?;

        Ok(Self {
            config,
            manager,
            directory,
        })
    }

    /// The signed-in user, required by every mutating command.
    pub fn current_user(&self) -> anyhow::Result<User> {
        self.directory
            .current_user()?
            .context("nobody is signed in (run `scy login <email>` first)")
    }
}
