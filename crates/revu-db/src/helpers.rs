//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing logic. Timestamps are written
//! by [`fmt_datetime`] in a fixed-width RFC 3339 form so that TEXT ordering
//! matches chronological ordering.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use revu_core::enums::{EntityKind, Score};

use crate::error::DatabaseError;

/// Current time at storage precision, so a freshly built entity equals the
/// same row read back.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Format a timestamp for storage.
#[must_use]
pub fn fmt_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 and `SQLite`'s default format
/// (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a nullable TEXT timestamp column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Read a nullable timestamp column by index.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read or parse fails.
pub fn get_opt_datetime(row: &libsql::Row, idx: i32) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    parse_optional_datetime(row.get::<Option<String>>(idx)?.as_deref())
}

/// Read a required timestamp column by index.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read or parse fails.
pub fn get_datetime(row: &libsql::Row, idx: i32) -> Result<DateTime<Utc>, DatabaseError> {
    parse_datetime(&row.get::<String>(idx)?)
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Parse a polymorphic `*_type` column into a role enum.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the label is unknown or the kind cannot
/// play the role.
pub fn parse_kind<T>(s: &str) -> Result<T, DatabaseError>
where
    T: TryFrom<EntityKind, Error = revu_core::errors::CoreError>,
{
    let kind = EntityKind::classify(s)
        .ok_or_else(|| DatabaseError::Query(format!("Unknown entity type '{s}'")))?;
    T::try_from(kind).map_err(|e| DatabaseError::Query(e.to_string()))
}

/// Parse the integer `score` column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` for values outside -1..=1.
pub fn parse_score(value: i64) -> Result<Score, DatabaseError> {
    Score::from_value(value)
        .ok_or_else(|| DatabaseError::Query(format!("Invalid score value {value}")))
}

/// Trim an optional text value, mapping blank strings to `None`.
#[must_use]
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Commit `tx` when `outcome` succeeded, roll it back otherwise.
///
/// # Errors
///
/// Returns the error carried by `outcome`, or the commit failure.
pub async fn settle<T>(tx: libsql::Transaction, outcome: Result<T, DatabaseError>) -> Result<T, DatabaseError> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(error = %rollback, "rollback failed");
            }
            Err(e)
        }
    }
}

/// Map `EntityKind` to the corresponding SQL table name.
///
/// Uses exhaustive match, so adding a new `EntityKind` variant forces updating this.
#[must_use]
pub const fn entity_kind_to_table(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Company => "companies",
        EntityKind::Product => "products",
        EntityKind::Service => "services",
        EntityKind::Project => "projects",
        EntityKind::Review => "reviews",
        EntityKind::Comment => "comments",
        EntityKind::Like => "likes",
        EntityKind::Aspect => "aspects",
        EntityKind::Grant => "grants",
        EntityKind::Industry => "industries",
        EntityKind::Agency => "agencies",
    }
}
