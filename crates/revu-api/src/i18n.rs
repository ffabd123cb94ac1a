//! Message catalog for error keys and messages.
//!
//! Lookups that miss the catalog fall back to the key itself so a missing
//! translation is visible in the response instead of failing the request.

const CATALOG: &[(&str, &str)] = &[
    ("general_error.not_found", "not found"),
    ("general_error.invalid", "is invalid"),
    ("general_error.params_missing_key", "params"),
    ("general_error.params_missing_value", "%{model} is missing"),
    ("general_error.from_type_key", "from_type"),
    ("general_error.from_id_key", "from_id"),
    ("general_error.malformed_body", "is not valid JSON"),
    ("general_error.body_too_large", "is too large"),
    ("general_error.unreadable_body", "could not be read"),
    ("general_error.unauthorized", "unauthorized"),
    ("general_error.unauthorized_key", "token"),
    ("general_error.forbidden", "insufficient scope"),
    ("general_error.route_not_found", "no route matches"),
    ("general_error.route_key", "route"),
    ("general_error.unprocessable", "could not be saved"),
    ("general_error.base_key", "base"),
    ("like.key_id", "like"),
    ("comment.key_id", "comment"),
    ("review.key_id", "review"),
    ("company.key_id", "company"),
    ("product.key_id", "product"),
    ("service.key_id", "service"),
    ("project.key_id", "project"),
    ("aspect.key_id", "aspect"),
    ("grant.key_id", "grant"),
    ("industry.key_id", "industry"),
    ("agency.key_id", "agency"),
];

/// Translate `key`.
#[must_use]
pub fn t(key: &str) -> String {
    CATALOG
        .iter()
        .find(|(k, _)| *k == key)
        .map_or_else(|| key.to_string(), |(_, v)| (*v).to_string())
}

/// Translate `key` and substitute `%{name}` placeholders.
#[must_use]
pub fn t_with(key: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(t(key), |message, (name, value)| {
        message.replace(&format!("%{{{name}}}"), value)
    })
}
