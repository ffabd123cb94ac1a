//! Request handlers, one module per resource.
//!
//! Handlers run after the router has matched the route and authorized the
//! token. Each one is a straight pipeline of `?` steps: read parameters,
//! decode hashids, resolve records, write, render.

pub mod agencies;
pub mod aspects;
pub mod comments;
pub mod companies;
pub mod grants;
pub mod industries;
pub mod likes;
pub mod offerings;
pub mod reviews;

use revu_core::enums::EntityKind;

use crate::API_PREFIX;
use crate::error::{ApiError, model_key};
use crate::resolver::decode_id;
use crate::state::AppState;

/// Canonical URL of a record, used for `Location` headers.
pub(crate) fn location(kind: EntityKind, hashid: &str) -> String {
    format!("{API_PREFIX}/{}/{hashid}", kind.collection())
}

/// Decode a path id naming a record of `kind`; failures are keyed by the
/// model name.
pub(crate) fn path_id(state: &AppState, raw: &str, kind: EntityKind) -> Result<i64, ApiError> {
    decode_id(&state.hashids, raw, &model_key(kind))
}
