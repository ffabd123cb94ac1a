//! # revu-auth
//!
//! Bearer-token authorization for the Revu API.
//!
//! Tokens are provisioned through configuration ([`revu_config::AuthConfig`])
//! and looked up in a [`TokenRegistry`]. A request is authorized when its
//! token is known, unexpired, and carries at least one accepted scope.

pub mod bearer;
pub mod error;
pub mod grant;
pub mod registry;

pub use error::AuthError;
pub use grant::TokenGrant;
pub use registry::TokenRegistry;
