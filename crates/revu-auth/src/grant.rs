use chrono::{DateTime, Utc};
use revu_config::TokenConfig;
use revu_core::enums::Scope;
use revu_core::identity::AuthIdentity;

/// What a provisioned token allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub client: String,
    pub scopes: Vec<Scope>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenGrant {
    /// Convert to a lightweight `AuthIdentity` for cross-crate passing.
    #[must_use]
    pub fn to_identity(&self) -> AuthIdentity {
        AuthIdentity {
            client: self.client.clone(),
            scopes: self.scopes.clone(),
        }
    }

    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

impl From<&TokenConfig> for TokenGrant {
    fn from(config: &TokenConfig) -> Self {
        Self {
            client: config.name.clone(),
            scopes: config.scopes.clone(),
            expires_at: config.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_grant(expires_at: Option<DateTime<Utc>>) -> TokenGrant {
        TokenGrant {
            client: "portal".into(),
            scopes: vec![Scope::ReadOnly],
            expires_at,
        }
    }

    #[test]
    fn to_identity_maps_all_fields() {
        let identity = make_grant(None).to_identity();
        assert_eq!(identity.client, "portal");
        assert_eq!(identity.scopes, vec![Scope::ReadOnly]);
    }

    #[test]
    fn never_expires_without_deadline() {
        assert!(!make_grant(None).is_expired_at(Utc::now()));
    }

    #[test]
    fn expired_at_and_after_deadline() {
        let deadline = Utc::now();
        let grant = make_grant(Some(deadline));
        assert!(grant.is_expired_at(deadline));
        assert!(grant.is_expired_at(deadline + chrono::TimeDelta::seconds(1)));
        assert!(!grant.is_expired_at(deadline - chrono::TimeDelta::seconds(1)));
    }
}
