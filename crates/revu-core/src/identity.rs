use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Scope;

/// Lightweight authenticated client identity for cross-crate passing.
///
/// Produced by `revu-auth` from a bearer token, consumed by `revu-api` for
/// scope checks and request logging. Contains only data fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuthIdentity {
    /// Configured name of the token's owner (e.g. `"portal-frontend"`).
    pub client: String,
    /// Scopes granted to the token.
    pub scopes: Vec<Scope>,
}

impl AuthIdentity {
    /// Whether any granted scope is in `accepted`.
    #[must_use]
    pub fn has_any_scope(&self, accepted: &[Scope]) -> bool {
        self.scopes.iter().any(|scope| accepted.contains(scope))
    }
}
