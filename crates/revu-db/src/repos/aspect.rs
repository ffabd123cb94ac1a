//! Aspect repository.

use revu_core::entities::Aspect;
use revu_core::validation::{MAX_NAME_LENGTH, ValidationErrors};

use crate::error::DatabaseError;
use crate::helpers::{fmt_datetime, get_datetime, get_opt_datetime, get_opt_string, now};
use crate::pagination::{PageRequest, Paged};
use crate::service::RevuService;
use crate::updates::SetClause;
use crate::updates::aspect::AspectUpdate;

pub(crate) const ASPECT_COLUMNS: &str = "a.id, a.review_id, a.name, a.description, a.created_at, a.updated_at, a.discarded_at";

pub(crate) const INSERT_ASPECT_SQL: &str = "INSERT INTO aspects (review_id, name, description, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?4)";

pub(crate) fn row_to_aspect(row: &libsql::Row) -> Result<Aspect, DatabaseError> {
    Ok(Aspect {
        id: row.get::<i64>(0)?,
        review_id: row.get::<i64>(1)?,
        name: row.get::<String>(2)?,
        description: get_opt_string(row, 3)?,
        created_at: get_datetime(row, 4)?,
        updated_at: get_datetime(row, 5)?,
        discarded_at: get_opt_datetime(row, 6)?,
    })
}

/// Attributes accepted when creating an aspect.
#[derive(Debug, Clone, Default)]
pub struct NewAspect {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl RevuService {
    /// Attach an aspect to a kept review.
    pub async fn create_aspect(&self, review_id: i64, new: NewAspect) -> Result<Aspect, DatabaseError> {
        self.get_review(review_id).await?;

        let mut errors = ValidationErrors::new();
        errors.require_present("name", new.name.as_deref(), true);
        errors.check_length("name", new.name.as_deref(), MAX_NAME_LENGTH);
        errors.into_result()?;

        let now = now();
        let name = new.name.unwrap_or_default().trim().to_string();
        self.db()
            .execute_with(INSERT_ASPECT_SQL, || {
                libsql::params![review_id, name.as_str(), new.description.as_deref(), fmt_datetime(now)]
            })
            .await?;
        let id = self.db().last_insert_id();
        tracing::debug!(id, review_id, "aspect created");

        Ok(Aspect {
            id,
            review_id,
            name,
            description: new.description,
            created_at: now,
            updated_at: now,
            discarded_at: None,
        })
    }

    /// Fetch a kept aspect whose review is kept too.
    pub async fn get_aspect(&self, id: i64) -> Result<Aspect, DatabaseError> {
        let sql = format!(
            "SELECT {ASPECT_COLUMNS} FROM aspects a JOIN reviews r ON r.id = a.review_id
             WHERE a.id = ?1 AND a.discarded_at IS NULL AND r.discarded_at IS NULL"
        );
        let mut rows = self.db().query_with(&sql, || [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_aspect(&row)
    }

    /// Kept aspects of a kept review, in id order.
    pub async fn list_review_aspects(
        &self,
        review_id: i64,
        page: PageRequest,
    ) -> Result<Paged<Aspect>, DatabaseError> {
        self.get_review(review_id).await?;

        let filter = "a.review_id = ?1 AND a.discarded_at IS NULL";
        let sql = format!(
            "SELECT {ASPECT_COLUMNS} FROM aspects a WHERE {filter} ORDER BY a.id{}",
            page.sql_window()
        );
        let mut rows = self.db().query_with(&sql, || [review_id]).await?;

        let mut aspects = Vec::new();
        while let Some(row) = rows.next().await? {
            aspects.push(row_to_aspect(&row)?);
        }
        let total = self
            .db()
            .count_with(&format!("SELECT COUNT(*) FROM aspects a WHERE {filter}"), || [review_id])
            .await?;
        Ok(Paged {
            items: aspects,
            total,
            request: page,
        })
    }

    pub async fn update_aspect(&self, id: i64, update: AspectUpdate) -> Result<Aspect, DatabaseError> {
        let aspect = self.get_aspect(id).await?;

        let mut errors = ValidationErrors::new();
        errors.require_present("name", update.name.as_deref(), false);
        errors.check_length("name", update.name.as_deref(), MAX_NAME_LENGTH);
        errors.into_result()?;

        let mut set = SetClause::default();
        if let Some(name) = &update.name {
            set.push("name", name.trim());
        }
        if let Some(description) = update.description {
            set.push("description", description);
        }
        if set.is_empty() {
            return Ok(aspect);
        }

        let (sql, params) = set.into_update("aspects", id, now());
        self.db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        self.get_aspect(id).await
    }

    pub async fn discard_aspect(&self, id: i64) -> Result<(), DatabaseError> {
        self.get_aspect(id).await?;
        let stamp = fmt_datetime(now());
        self.db()
            .execute_with(
                "UPDATE aspects SET discarded_at = ?1 WHERE id = ?2 AND discarded_at IS NULL",
                || libsql::params![stamp.as_str(), id],
            )
            .await?;
        tracing::debug!(id, "aspect discarded");
        Ok(())
    }
}
