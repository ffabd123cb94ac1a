use revu_core::enums::Scope;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("unknown bearer token")]
    UnknownToken,

    #[error("token for '{client}' has expired")]
    TokenExpired { client: String },

    #[error("token for '{client}' lacks any of the scopes {accepted:?}")]
    InsufficientScope { client: String, accepted: Vec<Scope> },
}

impl AuthError {
    /// Whether the caller is authenticated but not allowed (403), as opposed
    /// to unauthenticated (401).
    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        matches!(self, Self::InsufficientScope { .. })
    }
}
