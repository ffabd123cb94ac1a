//! Hashid codec settings.

use serde::{Deserialize, Serialize};

const fn default_min_length() -> usize {
    8
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HashidConfig {
    /// Salt mixed into every encoding. Changing it invalidates every id
    /// previously handed out to clients.
    #[serde(default)]
    pub salt: String,

    /// Minimum length of an encoded id.
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Custom alphabet. Empty means the codec's built-in alphabet.
    #[serde(default)]
    pub alphabet: String,
}

impl Default for HashidConfig {
    fn default() -> Self {
        Self {
            salt: String::new(),
            min_length: default_min_length(),
            alphabet: String::new(),
        }
    }
}

impl HashidConfig {
    /// A salt is required before ids are exposed to anyone.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.salt.is_empty()
    }

    #[must_use]
    pub fn has_custom_alphabet(&self) -> bool {
        !self.alphabet.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = HashidConfig::default();
        assert!(!config.is_configured());
        assert!(!config.has_custom_alphabet());
        assert_eq!(config.min_length, 8);
    }
}
