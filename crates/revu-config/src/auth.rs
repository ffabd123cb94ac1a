//! Provisioned API tokens.
//!
//! Tokens are never minted by the service. Operators list them here (or in
//! `REVU_AUTH__TOKENS`) with the scopes each one carries.

use chrono::{DateTime, Utc};
use revu_core::enums::Scope;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TokenConfig {
    /// Client name, used in logs.
    pub name: String,

    /// Bearer secret presented in the `Authorization` header.
    pub token: String,

    #[serde(default)]
    pub scopes: Vec<Scope>,

    /// Tokens past this instant are rejected as unauthorized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.tokens.is_empty()
    }
}
