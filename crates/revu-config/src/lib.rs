//! # revu-config
//!
//! Layered configuration loading for Revu using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`REVU_*` prefix, `__` as separator)
//! 2. Project-level `revu.toml`
//! 3. User-level `~/.config/revu/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `REVU_SERVER__PORT` -> `server.port`, `REVU_HASHID__SALT` ->
//! `hashid.salt`, etc. The `__` (double underscore) separates nested sections.
//! Token lists can be given inline:
//! `REVU_AUTH__TOKENS='[{name="web",token="s3cret",scopes=["read_only"]}]'`.
//!
//! # Usage
//!
//! ```no_run
//! use revu_config::RevuConfig;
//!
//! let config = RevuConfig::load_with_dotenv().expect("config");
//! println!("listening on {}", config.server.bind_addr());
//! ```

mod auth;
mod database;
mod error;
mod hashid;
mod pagination;
mod server;

pub use auth::{AuthConfig, TokenConfig};
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use hashid::HashidConfig;
pub use pagination::PaginationConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local configuration file, resolved against the working directory.
pub const PROJECT_CONFIG_FILE: &str = "revu.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RevuConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub hashid: HashidConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl RevuConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed, or
    /// `ConfigError::InvalidValue` if the merged values are inconsistent.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(PROJECT_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("REVU_").split("__"))
    }

    /// Cross-field checks figment cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pagination = &self.pagination;
        if pagination.default_per_page == 0 {
            return Err(invalid("pagination.default_per_page", "must be positive"));
        }
        if pagination.max_per_page < pagination.default_per_page {
            return Err(invalid(
                "pagination.max_per_page",
                "must not be smaller than default_per_page",
            ));
        }
        if self.server.port == 0 {
            return Err(invalid("server.port", "must be non-zero"));
        }
        if self.server.max_body_bytes == 0 {
            return Err(invalid("server.max_body_bytes", "must be positive"));
        }
        for (i, token) in self.auth.tokens.iter().enumerate() {
            if token.token.trim().is_empty() {
                return Err(invalid(&format!("auth.tokens[{i}].token"), "must not be blank"));
            }
        }
        Ok(())
    }

    /// Require the hashid salt before the server exposes any id.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` for an empty salt.
    pub fn require_hashid(&self) -> Result<&HashidConfig, ConfigError> {
        if self.hashid.is_configured() {
            Ok(&self.hashid)
        } else {
            Err(ConfigError::NotConfigured {
                section: "hashid".to_string(),
            })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("revu").join("config.toml"))
    }

    /// Load `.env` from the current directory. Silently does nothing if no
    /// `.env` is found.
    fn load_dotenv() {
        let _ = dotenvy::dotenv();
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RevuConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.hashid.is_configured());
        assert!(!config.auth.is_configured());
    }

    #[test]
    fn figment_builds_without_files() {
        let config: RevuConfig = figment::Figment::from(Serialized::defaults(RevuConfig::default()))
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.pagination.default_per_page, 25);
        assert_eq!(config.database.path, "revu.db");
    }

    #[test]
    fn rejects_inverted_page_sizes() {
        let mut config = RevuConfig::default();
        config.pagination.max_per_page = 10;
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "pagination.max_per_page")
        );
    }

    #[test]
    fn rejects_zero_body_limit() {
        let mut config = RevuConfig::default();
        config.server.max_body_bytes = 0;
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "server.max_body_bytes")
        );
    }

    #[test]
    fn hashid_salt_is_required() {
        let mut config = RevuConfig::default();
        assert!(matches!(
            config.require_hashid(),
            Err(ConfigError::NotConfigured { .. })
        ));
        config.hashid.salt = "pepper".into();
        assert!(config.require_hashid().is_ok());
    }
}
