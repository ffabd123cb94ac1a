//! Token lookup and scope checks.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use revu_config::AuthConfig;
use revu_core::enums::Scope;
use revu_core::identity::AuthIdentity;

use crate::bearer::parse_bearer;
use crate::error::AuthError;
use crate::grant::TokenGrant;

/// All provisioned tokens, keyed by secret.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: HashMap<String, TokenGrant>,
}

impl TokenRegistry {
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        let tokens = config
            .tokens
            .iter()
            .map(|token| (token.token.clone(), TokenGrant::from(token)))
            .collect();
        Self { tokens }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Authorize a request from its raw `Authorization` header.
    ///
    /// # Errors
    ///
    /// `MissingToken`, `UnknownToken` and `TokenExpired` mean the caller is
    /// unauthenticated; `InsufficientScope` means the token is valid but
    /// lacks every scope in `accepted`.
    pub fn authorize(&self, header: Option<&str>, accepted: &[Scope]) -> Result<AuthIdentity, AuthError> {
        self.authorize_at(header, accepted, Utc::now())
    }

    /// [`Self::authorize`] against an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`Self::authorize`].
    pub fn authorize_at(
        &self,
        header: Option<&str>,
        accepted: &[Scope],
        now: DateTime<Utc>,
    ) -> Result<AuthIdentity, AuthError> {
        let token = header.and_then(parse_bearer).ok_or(AuthError::MissingToken)?;
        let grant = self.tokens.get(token).ok_or(AuthError::UnknownToken)?;

        if grant.is_expired_at(now) {
            tracing::debug!(client = %grant.client, "rejected expired token");
            return Err(AuthError::TokenExpired {
                client: grant.client.clone(),
            });
        }

        let identity = grant.to_identity();
        if !identity.has_any_scope(accepted) {
            return Err(AuthError::InsufficientScope {
                client: grant.client.clone(),
                accepted: accepted.to_vec(),
            });
        }
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use revu_config::TokenConfig;

    fn registry() -> TokenRegistry {
        TokenRegistry::from_config(&AuthConfig {
            tokens: vec![
                TokenConfig {
                    name: "reader".into(),
                    token: "r-token".into(),
                    scopes: vec![Scope::ReadOnly],
                    expires_at: None,
                },
                TokenConfig {
                    name: "writer".into(),
                    token: "w-token".into(),
                    scopes: vec![Scope::WriteOnly],
                    expires_at: None,
                },
                TokenConfig {
                    name: "stale".into(),
                    token: "old-token".into(),
                    scopes: vec![Scope::ReadWrite],
                    expires_at: Some(Utc::now() - chrono::TimeDelta::days(1)),
                },
            ],
        })
    }

    #[test]
    fn reader_can_read() {
        let identity = registry().authorize(Some("Bearer r-token"), Scope::READ).unwrap();
        assert_eq!(identity.client, "reader");
    }

    #[test]
    fn reader_cannot_write() {
        let err = registry().authorize(Some("Bearer r-token"), Scope::WRITE).unwrap_err();
        assert!(err.is_forbidden());
    }

    #[test]
    fn writer_cannot_read() {
        let err = registry().authorize(Some("Bearer w-token"), Scope::READ).unwrap_err();
        assert!(matches!(err, AuthError::InsufficientScope { ref client, .. } if client == "writer"));
    }

    #[test]
    fn missing_and_unknown_tokens_are_unauthenticated() {
        let registry = registry();
        let missing = registry.authorize(None, Scope::READ).unwrap_err();
        assert!(matches!(missing, AuthError::MissingToken));
        assert!(!missing.is_forbidden());

        let unknown = registry.authorize(Some("Bearer nope"), Scope::READ).unwrap_err();
        assert!(matches!(unknown, AuthError::UnknownToken));
    }

    #[test]
    fn expired_token_is_unauthenticated() {
        let err = registry().authorize(Some("Bearer old-token"), Scope::READ).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired { .. }));
        assert!(!err.is_forbidden());
    }

    #[test]
    fn registry_counts_tokens() {
        assert_eq!(registry().len(), 3);
        assert!(TokenRegistry::default().is_empty());
    }
}
