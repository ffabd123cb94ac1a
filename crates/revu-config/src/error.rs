//! Errors raised while loading or checking `RevuConfig`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or `REVU_*` variable could not be extracted.
    #[error("could not read revu configuration: {0}")]
    Figment(#[from] figment::Error),

    /// A section the server cannot start without is empty.
    #[error("[{section}] must be configured before the server can start")]
    NotConfigured { section: String },

    #[error("{field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
