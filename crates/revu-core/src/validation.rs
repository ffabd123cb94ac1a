//! Field-level validation errors.
//!
//! Collected per entity before a write and returned to clients as a
//! `field -> [messages]` map.

use std::collections::BTreeMap;

use serde::Serialize;

pub const BLANK: &str = "can't be blank";
pub const TAKEN: &str = "has already been taken";
pub const INVALID: &str = "is invalid";
pub const INVALID_URL: &str = "is not a valid URL";
pub const INVALID_EMAIL: &str = "is not a valid email address";
pub const TOO_LONG: &str = "is too long";

/// Maximum accepted length for short text fields (names, acronyms).
pub const MAX_NAME_LENGTH: usize = 255;

/// Ordered `field -> messages` map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for an error map with a single entry.
    #[must_use]
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// `Ok(())` when nothing was collected.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Require a non-blank value. A missing value is only checked when
    /// `required` is set (creates); updates pass `false` for absent fields.
    pub fn require_present(&mut self, field: &str, value: Option<&str>, required: bool) {
        match value {
            Some(v) if v.trim().is_empty() => self.add(field, BLANK),
            None if required => self.add(field, BLANK),
            _ => {}
        }
    }

    pub fn check_length(&mut self, field: &str, value: Option<&str>, max: usize) {
        if value.is_some_and(|v| v.chars().count() > max) {
            self.add(field, TOO_LONG);
        }
    }

    /// Accept blank/absent, otherwise require an absolute http(s) URL.
    pub fn check_url(&mut self, field: &str, value: Option<&str>) {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return;
        };
        let rest = value
            .strip_prefix("https://")
            .or_else(|| value.strip_prefix("http://"));
        let host = rest.and_then(|r| r.split(['/', '?', '#']).next());
        let valid = host.is_some_and(|h| !h.is_empty() && !h.contains(char::is_whitespace));
        if !valid {
            self.add(field, INVALID_URL);
        }
    }

    /// Accept blank/absent, otherwise require `local@domain.tld`.
    pub fn check_email(&mut self, field: &str, value: Option<&str>) {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return;
        };
        let valid = value.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() > 1
                && domain.split('.').all(|label| !label.is_empty())
                && !value.contains(char::is_whitespace)
        });
        if !valid {
            self.add(field, INVALID_EMAIL);
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = (String, Vec<String>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn collects_messages_per_field() {
        let mut errors = ValidationErrors::new();
        errors.require_present("name", Some("  "), true);
        errors.check_length("name", Some(&"x".repeat(300)), MAX_NAME_LENGTH);
        errors.require_present("content", None, true);

        assert_eq!(errors.get("name").unwrap(), [BLANK, TOO_LONG]);
        assert_eq!(errors.get("content").unwrap(), [BLANK]);
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({"content": [BLANK], "name": [BLANK, TOO_LONG]})
        );
    }

    #[test]
    fn absent_field_is_fine_on_update() {
        let mut errors = ValidationErrors::new();
        errors.require_present("name", None, false);
        assert!(errors.into_result().is_ok());
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(""), true)]
    #[case(Some("https://example.gov.sg"), true)]
    #[case(Some("http://vendor.example/about?x=1"), true)]
    #[case(Some("ftp://vendor.example"), false)]
    #[case(Some("https://"), false)]
    #[case(Some("vendor.example"), false)]
    fn url_format(#[case] value: Option<&str>, #[case] ok: bool) {
        let mut errors = ValidationErrors::new();
        errors.check_url("url", value);
        assert_eq!(errors.is_empty(), ok);
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(" "), true)]
    #[case(Some("enquiries@agency.gov.sg"), true)]
    #[case(Some("enquiries@localhost"), false)]
    #[case(Some("@agency.gov.sg"), false)]
    #[case(Some("a@b@agency.gov.sg"), false)]
    #[case(Some("help desk@agency.gov.sg"), false)]
    #[case(Some("help@agency..sg"), false)]
    fn email_format(#[case] value: Option<&str>, #[case] ok: bool) {
        let mut errors = ValidationErrors::new();
        errors.check_email("email", value);
        assert_eq!(errors.is_empty(), ok);
    }
}
