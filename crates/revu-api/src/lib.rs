//! # revu-api
//!
//! The Revu HTTP API under `/api/v1`.
//!
//! Requests are modelled as plain [`ApiRequest`]/[`ApiResponse`] values so the
//! router and handlers run without a socket; [`server`] adapts them to
//! `tiny_http`. Every identifier in a URL or body is a hashid, decoded at the
//! edge by [`resolver`] before any repository call.

pub mod error;
pub mod handlers;
pub mod i18n;
pub mod pagination;
pub mod params;
pub mod request;
pub mod resolver;
pub mod response;
pub mod router;
pub mod serializers;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use request::{ApiRequest, Method};
pub use response::ApiResponse;
pub use router::handle;
pub use state::AppState;

/// Path prefix of every route.
pub const API_PREFIX: &str = "/api/v1";
