//! # revu-db
//!
//! libSQL persistence for the Revu review platform.
//!
//! Holds all relational state: companies, their products, services and
//! projects, reviews, likes, comments, aspects and grants. Repository methods
//! live on [`service::RevuService`] as `impl` blocks under [`repos`]; every
//! lookup there only sees kept (not discarded) rows.
//!
//! Uses the `libsql` crate in local mode.

pub mod error;
pub mod helpers;
mod migrations;
pub mod pagination;
pub mod repos;
pub mod retry;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use libsql::params::IntoParams;
use retry::{RetryConfig, is_transient_lock_error};

/// Central database handle.
///
/// Wraps a libSQL database and connection.
pub struct RevuDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    retry: RetryConfig,
}

impl RevuDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let revu_db = Self {
            db,
            conn,
            retry: RetryConfig::default(),
        };
        revu_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(revu_db)
    }

    /// Replace the lock-contention retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Rowid of the most recent successful INSERT on this connection.
    #[must_use]
    pub fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// Execute a statement, retrying on transient lock errors.
    ///
    /// `params` is called once per attempt because libSQL consumes its
    /// parameters.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` once the error is not transient or
    /// the attempts are exhausted.
    pub async fn execute_with<F, P>(&self, sql: &str, params: F) -> Result<u64, DatabaseError>
    where
        F: Fn() -> P,
        P: IntoParams,
    {
        let mut attempt = 1;
        loop {
            match self.conn.execute(sql, params()).await {
                Ok(changed) => return Ok(changed),
                Err(e) if attempt < self.retry.max_attempts && is_transient_lock_error(&e) => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(attempt, ?delay, error = %e, "database locked, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Run a query, retrying on transient lock errors.
    ///
    /// # Errors
    ///
    /// Same as [`Self::execute_with`].
    pub async fn query_with<F, P>(&self, sql: &str, params: F) -> Result<libsql::Rows, DatabaseError>
    where
        F: Fn() -> P,
        P: IntoParams,
    {
        let mut attempt = 1;
        loop {
            match self.conn.query(sql, params()).await {
                Ok(rows) => return Ok(rows),
                Err(e) if attempt < self.retry.max_attempts && is_transient_lock_error(&e) => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(attempt, ?delay, error = %e, "database locked, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Run a `SELECT COUNT(*)`-style query and return the first column.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn count_with<F, P>(&self, sql: &str, params: F) -> Result<u64, DatabaseError>
    where
        F: Fn() -> P,
        P: IntoParams,
    {
        let mut rows = self.query_with(sql, params).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count = row.get::<i64>(0)?;
        u64::try_from(count).map_err(|_| DatabaseError::InvalidState(format!("negative count {count}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> RevuDb {
        RevuDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "companies",
            "products",
            "services",
            "projects",
            "company_reviewables",
            "reviews",
            "likes",
            "comments",
            "aspects",
            "grants",
            "industries",
            "industry_companies",
            "agencies",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revu.db");
        let path = path.to_str().unwrap();

        {
            let db = RevuDb::open_local(path).await.unwrap();
            db.execute_with(
                "INSERT INTO grants (name, created_at, updated_at) VALUES (?1, ?2, ?2)",
                || libsql::params!["Productivity Solutions Grant", "2026-01-01T00:00:00.000000Z"],
            )
            .await
            .unwrap();
        }

        let db = RevuDb::open_local(path).await.unwrap();
        let count = db.count_with("SELECT COUNT(*) FROM grants", || ()).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn kept_like_pair_is_unique() {
        let db = test_db().await;
        let insert = "INSERT INTO likes (liker_type, liker_id, likeable_type, likeable_id, created_at, discarded_at)
                      VALUES ('Company', 1, 'Review', 1, '2026-01-01T00:00:00.000000Z', ?1)";

        db.execute_with(insert, || libsql::params![libsql::Value::Null]).await.unwrap();
        let dup = db.execute_with(insert, || libsql::params![libsql::Value::Null]).await;
        assert!(dup.is_err(), "second kept like must violate the partial index");

        db.execute_with(insert, || libsql::params!["2026-01-02T00:00:00.000000Z"])
            .await
            .expect("discarded rows are outside the index");
    }

    #[tokio::test]
    async fn score_check_constraint() {
        let db = test_db().await;
        db.execute_with(
            "INSERT INTO companies (name, created_at, updated_at) VALUES ('Acme', 'x', 'x')",
            || (),
        )
        .await
        .unwrap();
        let result = db
            .execute_with(
                "INSERT INTO reviews (score, vendor_id, reviewer_type, reviewer_id, reviewable_type, reviewable_id, created_at, updated_at)
                 VALUES (5, 1, 'Company', 1, 'Service', 1, 'x', 'x')",
                || (),
            )
            .await;
        assert!(result.is_err());
    }
}
