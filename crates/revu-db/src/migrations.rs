//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time and executes them on
//! database open. All statements use `IF NOT EXISTS` for idempotent re-running.

use crate::RevuDb;
use crate::error::DatabaseError;

/// Initial schema: companies, offerings, join rows, reviews, likes,
/// comments, aspects, grants.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

/// Industries with their company join rows, and agencies.
const MIGRATION_002: &str = include_str!("../migrations/002_industries_agencies.sql");

impl RevuDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_initial: {e}")))?;
        self.conn
            .execute_batch(MIGRATION_002)
            .await
            .map_err(|e| DatabaseError::Migration(format!("002_industries_agencies: {e}")))?;
        Ok(())
    }
}
