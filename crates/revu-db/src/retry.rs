//! Busy/locked retry logic.
//!
//! A file-backed database can briefly refuse writes while another
//! connection holds the lock. These errors resolve on their own, so
//! statements issued through `RevuDb::execute_with`/`query_with` are retried
//! with capped exponential backoff. Constraint and syntax errors are never
//! retried.

use std::time::Duration;

/// Configuration for retry behavior on transient lock errors.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(1),
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Detect transient lock contention errors.
///
/// The predicate is intentionally narrow to avoid retrying genuine
/// SQL or constraint errors.
pub fn is_transient_lock_error(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("database is locked") || msg.contains("database table is locked") || msg.contains("SQLITE_BUSY")
}
