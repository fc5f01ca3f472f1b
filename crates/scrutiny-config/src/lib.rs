//! # scrutiny-config
//!
//! Layered configuration loading for Scrutiny using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SCRUTINY_*` prefix, `__` as separator)
//! 2. Project-level `.scrutiny/config.toml`
//! 3. User-level `~/.config/scrutiny/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SCRUTINY_REMOTE__URL` -> `remote.url`,
//! `SCRUTINY_STORE__DATA_DIR` -> `store.data_dir`, etc. The `__` (double
//! underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use scrutiny_config::ScrutinyConfig;
//!
//! let config = ScrutinyConfig::load_with_dotenv().expect("config");
//! if config.remote.is_configured() {
//!     println!("remote backend: {}", config.remote.url);
//! }
//! ```

mod error;
mod general;
mod remote;
mod store;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use remote::RemoteConfig;
pub use store::{StoreBackend, StoreConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScrutinyConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl ScrutinyConfig {
    /// Load configuration from all sources (TOML files + environment
    /// variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] if `.env`
    /// loading is wanted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when extraction fails (malformed TOML, type
    /// mismatches).
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Loads `.env` from the working directory before building the figment.
    /// This is the typical entry point for the CLI and for tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when extraction fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// The figment powering [`Self::load`], exposed for tests that need to
    /// inject providers.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(user_config) = Self::user_config_path() {
            figment = figment.merge(Toml::file(user_config));
        }
        figment
            .merge(Toml::file(".scrutiny/config.toml"))
            .merge(Env::prefixed("SCRUTINY_").split("__"))
    }

    /// `~/.config/scrutiny/config.toml`, if a home config dir exists.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scrutiny").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_select_local_backend() {
        figment::Jail::expect_with(|_jail| {
            let config: ScrutinyConfig = ScrutinyConfig::figment().extract()?;
            assert_eq!(config.store.backend, StoreBackend::Local);
            assert!(!config.remote.is_configured());
            Ok(())
        });
    }

    #[test]
    fn env_vars_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SCRUTINY_STORE__BACKEND", "remote");
            jail.set_env("SCRUTINY_REMOTE__URL", "libsql://audits.example.io");
            jail.set_env("SCRUTINY_REMOTE__AUTH_TOKEN", "token123");

            let config: ScrutinyConfig = ScrutinyConfig::figment().extract()?;
            assert_eq!(config.store.backend, StoreBackend::Remote);
            assert!(config.remote.is_configured());
            assert_eq!(config.remote.url, "libsql://audits.example.io");
            Ok(())
        });
    }

    #[test]
    fn project_toml_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_dir(".scrutiny")?;
            jail.create_file(
                ".scrutiny/config.toml",
                r#"
                [store]
                data_dir = "/tmp/scrutiny-data"

                [general]
                default_limit = 50
                "#,
            )?;

            let config: ScrutinyConfig = ScrutinyConfig::figment().extract()?;
            assert_eq!(
                config.store.data_dir,
                PathBuf::from("/tmp/scrutiny-data")
            );
            assert_eq!(config.general.default_limit, 50);
            Ok(())
        });
    }
}
