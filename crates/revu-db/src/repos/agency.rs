//! Agency repository.

use revu_core::entities::Agency;
use revu_core::validation::{MAX_NAME_LENGTH, ValidationErrors};

use crate::error::DatabaseError;
use crate::helpers::{blank_to_none, fmt_datetime, get_datetime, get_opt_datetime, get_opt_string, now};
use crate::pagination::{PageRequest, Paged};
use crate::service::RevuService;
use crate::updates::SetClause;
use crate::updates::agency::AgencyUpdate;

const AGENCY_COLUMNS: &str = "id, name, acronym, kind, description, phone_number, email, image, \
     created_at, updated_at, discarded_at";

fn row_to_agency(row: &libsql::Row) -> Result<Agency, DatabaseError> {
    Ok(Agency {
        id: row.get::<i64>(0)?,
        name: row.get::<String>(1)?,
        acronym: get_opt_string(row, 2)?,
        kind: get_opt_string(row, 3)?,
        description: get_opt_string(row, 4)?,
        phone_number: get_opt_string(row, 5)?,
        email: get_opt_string(row, 6)?,
        image: get_opt_string(row, 7)?,
        created_at: get_datetime(row, 8)?,
        updated_at: get_datetime(row, 9)?,
        discarded_at: get_opt_datetime(row, 10)?,
    })
}

/// Attributes accepted when creating an agency.
#[derive(Debug, Clone, Default)]
pub struct NewAgency {
    pub name: Option<String>,
    pub acronym: Option<String>,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl RevuService {
    pub async fn create_agency(&self, new: NewAgency) -> Result<Agency, DatabaseError> {
        let mut errors = ValidationErrors::new();
        errors.require_present("name", new.name.as_deref(), true);
        errors.check_length("name", new.name.as_deref(), MAX_NAME_LENGTH);
        errors.check_length("acronym", new.acronym.as_deref(), MAX_NAME_LENGTH);
        errors.check_email("email", new.email.as_deref());
        errors.check_url("image", new.image.as_deref());
        errors.into_result()?;

        let now = now();
        let agency = Agency {
            id: 0,
            name: new.name.unwrap_or_default().trim().to_string(),
            acronym: blank_to_none(new.acronym),
            kind: blank_to_none(new.kind),
            description: new.description,
            phone_number: blank_to_none(new.phone_number),
            email: blank_to_none(new.email),
            image: blank_to_none(new.image),
            created_at: now,
            updated_at: now,
            discarded_at: None,
        };
        self.db()
            .execute_with(
                "INSERT INTO agencies (name, acronym, kind, description, phone_number, email, image, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                || {
                    libsql::params![
                        agency.name.as_str(),
                        agency.acronym.as_deref(),
                        agency.kind.as_deref(),
                        agency.description.as_deref(),
                        agency.phone_number.as_deref(),
                        agency.email.as_deref(),
                        agency.image.as_deref(),
                        fmt_datetime(now)
                    ]
                },
            )
            .await?;
        let id = self.db().last_insert_id();
        tracing::debug!(id, name = %agency.name, "agency created");
        Ok(Agency { id, ..agency })
    }

    /// Fetch a kept agency.
    pub async fn get_agency(&self, id: i64) -> Result<Agency, DatabaseError> {
        let sql = format!("SELECT {AGENCY_COLUMNS} FROM agencies WHERE id = ?1 AND discarded_at IS NULL");
        let mut rows = self.db().query_with(&sql, || [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_agency(&row)
    }

    /// Kept agencies in id order.
    pub async fn list_agencies(&self, page: PageRequest) -> Result<Paged<Agency>, DatabaseError> {
        let sql = format!(
            "SELECT {AGENCY_COLUMNS} FROM agencies WHERE discarded_at IS NULL ORDER BY id{}",
            page.sql_window()
        );
        let mut rows = self.db().query_with(&sql, || ()).await?;

        let mut agencies = Vec::new();
        while let Some(row) = rows.next().await? {
            agencies.push(row_to_agency(&row)?);
        }
        let total = self
            .db()
            .count_with("SELECT COUNT(*) FROM agencies WHERE discarded_at IS NULL", || ())
            .await?;
        Ok(Paged {
            items: agencies,
            total,
            request: page,
        })
    }

    pub async fn update_agency(&self, id: i64, update: AgencyUpdate) -> Result<Agency, DatabaseError> {
        let agency = self.get_agency(id).await?;

        let mut errors = ValidationErrors::new();
        errors.require_present("name", update.name.as_deref(), false);
        errors.check_length("name", update.name.as_deref(), MAX_NAME_LENGTH);
        if let Some(acronym) = &update.acronym {
            errors.check_length("acronym", acronym.as_deref(), MAX_NAME_LENGTH);
        }
        if let Some(email) = &update.email {
            errors.check_email("email", email.as_deref());
        }
        if let Some(image) = &update.image {
            errors.check_url("image", image.as_deref());
        }
        errors.into_result()?;

        let mut set = SetClause::default();
        if let Some(name) = &update.name {
            set.push("name", name.trim());
        }
        let optional = [
            ("acronym", update.acronym.map(blank_to_none)),
            ("kind", update.kind.map(blank_to_none)),
            ("phone_number", update.phone_number.map(blank_to_none)),
            ("email", update.email.map(blank_to_none)),
            ("image", update.image.map(blank_to_none)),
            ("description", update.description),
        ];
        for (column, value) in optional {
            if let Some(value) = value {
                set.push(column, value);
            }
        }
        if set.is_empty() {
            return Ok(agency);
        }

        let (sql, params) = set.into_update("agencies", id, now());
        self.db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        self.get_agency(id).await
    }

    pub async fn discard_agency(&self, id: i64) -> Result<(), DatabaseError> {
        let stamp = fmt_datetime(now());
        let changed = self
            .db()
            .execute_with(
                "UPDATE agencies SET discarded_at = ?1 WHERE id = ?2 AND discarded_at IS NULL",
                || libsql::params![stamp.as_str(), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        tracing::debug!(id, "agency discarded");
        Ok(())
    }
}
