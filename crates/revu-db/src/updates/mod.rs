//! Update builder types for entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some`
//! fields generate SET clauses in the dynamic UPDATE SQL. Nullable columns use
//! `Option<Option<T>>`: `Some(None)` clears the column.

pub mod agency;
pub mod aspect;
pub mod comment;
pub mod company;
pub mod grant;
pub mod industry;
pub mod offering;
pub mod review;

use crate::helpers::fmt_datetime;

/// Accumulates `column = ?N` assignments for a dynamic UPDATE.
#[derive(Debug, Default)]
pub(crate) struct SetClause {
    sets: Vec<String>,
    params: Vec<libsql::Value>,
}

impl SetClause {
    pub(crate) fn push(&mut self, column: &str, value: impl Into<libsql::Value>) {
        self.params.push(value.into());
        self.sets.push(format!("{column} = ?{}", self.params.len()));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Finish as `UPDATE {table} SET .., updated_at = ? WHERE id = ? AND kept`.
    pub(crate) fn into_update(mut self, table: &str, id: i64, now: chrono::DateTime<chrono::Utc>) -> (String, Vec<libsql::Value>) {
        self.push("updated_at", fmt_datetime(now));
        self.params.push(id.into());
        let sql = format!(
            "UPDATE {table} SET {} WHERE id = ?{} AND discarded_at IS NULL",
            self.sets.join(", "),
            self.params.len()
        );
        (sql, self.params)
    }
}
