//! Listing page sizes.

use serde::{Deserialize, Serialize};

const fn default_per_page() -> u32 {
    25
}

const fn default_max_per_page() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationConfig {
    /// Page size when a request does not ask for one.
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,

    /// Upper bound on a requested `per_page`.
    #[serde(default = "default_max_per_page")]
    pub max_per_page: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = PaginationConfig::default();
        assert_eq!(config.default_per_page, 25);
        assert_eq!(config.max_per_page, 100);
    }
}
