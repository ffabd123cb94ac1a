//! Grant repository.

use revu_core::entities::Grant;
use revu_core::validation::{MAX_NAME_LENGTH, ValidationErrors};

use crate::error::DatabaseError;
use crate::helpers::{blank_to_none, fmt_datetime, get_datetime, get_opt_datetime, get_opt_string, now};
use crate::pagination::{PageRequest, Paged};
use crate::service::RevuService;
use crate::updates::SetClause;
use crate::updates::grant::GrantUpdate;

pub(crate) const GRANT_COLUMNS: &str = "g.id, g.name, g.acronym, g.description, g.created_at, g.updated_at, g.discarded_at";

pub(crate) fn row_to_grant(row: &libsql::Row) -> Result<Grant, DatabaseError> {
    Ok(Grant {
        id: row.get::<i64>(0)?,
        name: row.get::<String>(1)?,
        acronym: get_opt_string(row, 2)?,
        description: get_opt_string(row, 3)?,
        created_at: get_datetime(row, 4)?,
        updated_at: get_datetime(row, 5)?,
        discarded_at: get_opt_datetime(row, 6)?,
    })
}

/// Attributes accepted when creating a grant.
#[derive(Debug, Clone, Default)]
pub struct NewGrant {
    pub name: Option<String>,
    pub acronym: Option<String>,
    pub description: Option<String>,
}

impl RevuService {
    pub async fn create_grant(&self, new: NewGrant) -> Result<Grant, DatabaseError> {
        let acronym = blank_to_none(new.acronym);
        let mut errors = ValidationErrors::new();
        errors.require_present("name", new.name.as_deref(), true);
        errors.check_length("name", new.name.as_deref(), MAX_NAME_LENGTH);
        errors.check_length("acronym", acronym.as_deref(), MAX_NAME_LENGTH);
        errors.into_result()?;

        let now = now();
        let name = new.name.unwrap_or_default().trim().to_string();
        self.db()
            .execute_with(
                "INSERT INTO grants (name, acronym, description, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                || {
                    libsql::params![
                        name.as_str(),
                        acronym.as_deref(),
                        new.description.as_deref(),
                        fmt_datetime(now)
                    ]
                },
            )
            .await?;
        let id = self.db().last_insert_id();
        tracing::debug!(id, %name, "grant created");

        Ok(Grant {
            id,
            name,
            acronym,
            description: new.description,
            created_at: now,
            updated_at: now,
            discarded_at: None,
        })
    }

    /// Fetch a kept grant.
    pub async fn get_grant(&self, id: i64) -> Result<Grant, DatabaseError> {
        let sql = format!("SELECT {GRANT_COLUMNS} FROM grants g WHERE g.id = ?1 AND g.discarded_at IS NULL");
        let mut rows = self.db().query_with(&sql, || [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_grant(&row)
    }

    /// Kept grants in id order.
    pub async fn list_grants(&self, page: PageRequest) -> Result<Paged<Grant>, DatabaseError> {
        let sql = format!(
            "SELECT {GRANT_COLUMNS} FROM grants g WHERE g.discarded_at IS NULL ORDER BY g.id{}",
            page.sql_window()
        );
        let mut rows = self.db().query_with(&sql, || ()).await?;

        let mut grants = Vec::new();
        while let Some(row) = rows.next().await? {
            grants.push(row_to_grant(&row)?);
        }
        let total = self
            .db()
            .count_with("SELECT COUNT(*) FROM grants WHERE discarded_at IS NULL", || ())
            .await?;
        Ok(Paged {
            items: grants,
            total,
            request: page,
        })
    }

    pub async fn update_grant(&self, id: i64, update: GrantUpdate) -> Result<Grant, DatabaseError> {
        let grant = self.get_grant(id).await?;

        let acronym = update.acronym.map(blank_to_none);
        let mut errors = ValidationErrors::new();
        errors.require_present("name", update.name.as_deref(), false);
        errors.check_length("name", update.name.as_deref(), MAX_NAME_LENGTH);
        if let Some(acronym) = &acronym {
            errors.check_length("acronym", acronym.as_deref(), MAX_NAME_LENGTH);
        }
        errors.into_result()?;

        let mut set = SetClause::default();
        if let Some(name) = &update.name {
            set.push("name", name.trim());
        }
        if let Some(acronym) = acronym {
            set.push("acronym", acronym);
        }
        if let Some(description) = update.description {
            set.push("description", description);
        }
        if set.is_empty() {
            return Ok(grant);
        }

        let (sql, params) = set.into_update("grants", id, now());
        self.db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        self.get_grant(id).await
    }

    /// Soft-delete a grant. Reviews keep their `grant_id`; the grant simply
    /// drops out of every statistic.
    pub async fn discard_grant(&self, id: i64) -> Result<(), DatabaseError> {
        let stamp = fmt_datetime(now());
        let changed = self
            .db()
            .execute_with(
                "UPDATE grants SET discarded_at = ?1 WHERE id = ?2 AND discarded_at IS NULL",
                || libsql::params![stamp.as_str(), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        tracing::debug!(id, "grant discarded");
        Ok(())
    }
}
