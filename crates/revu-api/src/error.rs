//! API error taxonomy and its JSON rendering.
//!
//! Every error renders as `{"errors": {"<key>": ["<message>", ...]}}` with
//! key and message taken from [`crate::i18n`].

use revu_auth::AuthError;
use revu_core::enums::EntityKind;
use revu_core::validation::ValidationErrors;
use revu_db::error::DatabaseError;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::i18n::{t, t_with};
use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The addressed record is missing or discarded. `key` names it.
    #[error("{key} not found")]
    NotFound { key: String },

    /// A parameter is present but not acceptable.
    #[error("invalid parameter {key}")]
    InvalidParameter { key: String },

    /// A required parameter group is absent. `model` names what is missing.
    #[error("{model} is missing")]
    MissingParameter { model: String },

    #[error("validation failed: {0:?}")]
    Validation(ValidationErrors),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The connection failed while the body was being read.
    #[error("unreadable request body: {0}")]
    UnreadableBody(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    /// A write failed for a reason the client cannot fix field by field.
    #[error("unprocessable: {0}")]
    Unprocessable(String),

    #[error("no route matches")]
    RouteNotFound,
}

/// Response key naming a record of `kind` (`"review"`, `"company"`, ...).
#[must_use]
pub fn model_key(kind: EntityKind) -> String {
    t(&format!("{}.key_id", kind.singular()))
}

impl ApiError {
    #[must_use]
    pub fn not_found(kind: EntityKind) -> Self {
        Self::NotFound { key: model_key(kind) }
    }

    #[must_use]
    pub fn invalid(key: impl Into<String>) -> Self {
        Self::InvalidParameter { key: key.into() }
    }

    #[must_use]
    pub fn missing(model: impl Into<String>) -> Self {
        Self::MissingParameter { model: model.into() }
    }

    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } | Self::RouteNotFound => 404,
            Self::InvalidParameter { .. } | Self::Validation(_) | Self::Unprocessable(_) => 422,
            Self::MissingParameter { .. } | Self::MalformedBody(_) | Self::UnreadableBody(_) => 400,
            Self::BodyTooLarge { .. } => 413,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
        }
    }

    fn errors(&self) -> Value {
        let pair = |key: String, message: String| {
            let mut map = Map::new();
            map.insert(key, json!([message]));
            Value::Object(map)
        };
        match self {
            Self::NotFound { key } => pair(key.clone(), t("general_error.not_found")),
            Self::InvalidParameter { key } => pair(key.clone(), t("general_error.invalid")),
            Self::MissingParameter { model } => pair(
                t("general_error.params_missing_key"),
                t_with("general_error.params_missing_value", &[("model", model)]),
            ),
            Self::Validation(errors) => serde_json::to_value(errors).unwrap_or(Value::Null),
            Self::MalformedBody(_) => pair(t("general_error.params_missing_key"), t("general_error.malformed_body")),
            Self::BodyTooLarge { .. } => pair(t("general_error.params_missing_key"), t("general_error.body_too_large")),
            Self::UnreadableBody(_) => pair(t("general_error.params_missing_key"), t("general_error.unreadable_body")),
            Self::Unauthorized => pair(t("general_error.unauthorized_key"), t("general_error.unauthorized")),
            Self::Forbidden => pair(t("general_error.unauthorized_key"), t("general_error.forbidden")),
            Self::Unprocessable(_) => pair(t("general_error.base_key"), t("general_error.unprocessable")),
            Self::RouteNotFound => pair(t("general_error.route_key"), t("general_error.route_not_found")),
        }
    }

    #[must_use]
    pub fn into_response(self) -> ApiResponse {
        let response = ApiResponse::json(self.status(), &json!({ "errors": self.errors() }));
        if matches!(self, Self::Unauthorized) {
            response.with_header("WWW-Authenticate", "Bearer")
        } else {
            response
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NoResult => Self::NotFound {
                key: t("general_error.base_key"),
            },
            DatabaseError::Invalid(errors) => Self::Validation(errors),
            other => {
                tracing::error!(error = %other, "database write failed");
                Self::Unprocessable(other.to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_forbidden() {
            Self::Forbidden
        } else {
            Self::Unauthorized
        }
    }
}

/// Turn a repository `NoResult` into a `NotFound` under a specific key.
pub trait OrNotFound<T> {
    /// # Errors
    ///
    /// `NotFound { key }` for `NoResult`; other errors convert as usual.
    fn or_not_found(self, key: impl Into<String>) -> Result<T, ApiError>;

    /// # Errors
    ///
    /// Same as [`OrNotFound::or_not_found`], keyed by the model name.
    fn or_not_found_kind(self, kind: EntityKind) -> Result<T, ApiError>
    where
        Self: Sized,
    {
        self.or_not_found(model_key(kind))
    }
}

impl<T> OrNotFound<T> for Result<T, DatabaseError> {
    fn or_not_found(self, key: impl Into<String>) -> Result<T, ApiError> {
        self.map_err(|err| match err {
            DatabaseError::NoResult => ApiError::NotFound { key: key.into() },
            other => other.into(),
        })
    }
}
