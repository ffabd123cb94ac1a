//! Industry repository and the industry/company join rows.

use revu_core::entities::{Company, Industry, IndustryCompany};
use revu_core::validation::{self, MAX_NAME_LENGTH, ValidationErrors};

use crate::error::DatabaseError;
use crate::helpers::{fmt_datetime, get_datetime, get_opt_datetime, get_opt_string, now};
use crate::pagination::{PageRequest, Paged};
use crate::repos::company::{COMPANY_COLUMNS, row_to_company};
use crate::service::RevuService;
use crate::updates::SetClause;
use crate::updates::industry::IndustryUpdate;

pub(crate) const INDUSTRY_COLUMNS: &str = "i.id, i.name, i.description, i.created_at, i.updated_at, i.discarded_at";

const JOIN_COLUMNS: &str = "id, industry_id, company_id, created_at, discarded_at";

/// Insert a join row, or revive the discarded one for the same pair.
const LINK_SQL: &str = "INSERT INTO industry_companies (industry_id, company_id, created_at)
     VALUES (?1, ?2, ?3)
     ON CONFLICT (industry_id, company_id)
     DO UPDATE SET discarded_at = NULL WHERE industry_companies.discarded_at IS NOT NULL";

pub(crate) fn row_to_industry(row: &libsql::Row) -> Result<Industry, DatabaseError> {
    Ok(Industry {
        id: row.get::<i64>(0)?,
        name: row.get::<String>(1)?,
        description: get_opt_string(row, 2)?,
        created_at: get_datetime(row, 3)?,
        updated_at: get_datetime(row, 4)?,
        discarded_at: get_opt_datetime(row, 5)?,
    })
}

fn row_to_industry_company(row: &libsql::Row) -> Result<IndustryCompany, DatabaseError> {
    Ok(IndustryCompany {
        id: row.get::<i64>(0)?,
        industry_id: row.get::<i64>(1)?,
        company_id: row.get::<i64>(2)?,
        created_at: get_datetime(row, 3)?,
        discarded_at: get_opt_datetime(row, 4)?,
    })
}

/// Attributes accepted when creating an industry.
#[derive(Debug, Clone, Default)]
pub struct NewIndustry {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl RevuService {
    pub async fn create_industry(&self, new: NewIndustry) -> Result<Industry, DatabaseError> {
        let mut errors = ValidationErrors::new();
        errors.require_present("name", new.name.as_deref(), true);
        errors.check_length("name", new.name.as_deref(), MAX_NAME_LENGTH);
        errors.into_result()?;

        let now = now();
        let name = new.name.unwrap_or_default().trim().to_string();
        self.db()
            .execute_with(
                "INSERT INTO industries (name, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
                || libsql::params![name.as_str(), new.description.as_deref(), fmt_datetime(now)],
            )
            .await?;
        let id = self.db().last_insert_id();
        tracing::debug!(id, %name, "industry created");

        Ok(Industry {
            id,
            name,
            description: new.description,
            created_at: now,
            updated_at: now,
            discarded_at: None,
        })
    }

    /// Fetch a kept industry.
    pub async fn get_industry(&self, id: i64) -> Result<Industry, DatabaseError> {
        let sql = format!("SELECT {INDUSTRY_COLUMNS} FROM industries i WHERE i.id = ?1 AND i.discarded_at IS NULL");
        let mut rows = self.db().query_with(&sql, || [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_industry(&row)
    }

    /// Kept industries in name order.
    pub async fn list_industries(&self, page: PageRequest) -> Result<Paged<Industry>, DatabaseError> {
        let sql = format!(
            "SELECT {INDUSTRY_COLUMNS} FROM industries i WHERE i.discarded_at IS NULL ORDER BY i.name, i.id{}",
            page.sql_window()
        );
        let mut rows = self.db().query_with(&sql, || ()).await?;

        let mut industries = Vec::new();
        while let Some(row) = rows.next().await? {
            industries.push(row_to_industry(&row)?);
        }
        let total = self
            .db()
            .count_with("SELECT COUNT(*) FROM industries WHERE discarded_at IS NULL", || ())
            .await?;
        Ok(Paged {
            items: industries,
            total,
            request: page,
        })
    }

    pub async fn update_industry(&self, id: i64, update: IndustryUpdate) -> Result<Industry, DatabaseError> {
        let industry = self.get_industry(id).await?;

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
            return Ok(industry);
        }

        let (sql, params) = set.into_update("industries", id, now());
        self.db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        self.get_industry(id).await
    }

    /// Soft-delete an industry together with its join rows.
    pub async fn discard_industry(&self, id: i64) -> Result<(), DatabaseError> {
        let stamp = fmt_datetime(now());
        let changed = self
            .db()
            .execute_with(
                "UPDATE industries SET discarded_at = ?1 WHERE id = ?2 AND discarded_at IS NULL",
                || libsql::params![stamp.as_str(), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.db()
            .execute_with(
                "UPDATE industry_companies SET discarded_at = ?1 WHERE industry_id = ?2 AND discarded_at IS NULL",
                || libsql::params![stamp.as_str(), id],
            )
            .await?;
        tracing::debug!(id, "industry discarded");
        Ok(())
    }

    /// File a kept company under a kept industry, reviving a discarded join
    /// row for the same pair. A pair that is already linked is an
    /// `industry_id` "taken" error.
    pub async fn link_industry(&self, company_id: i64, industry_id: i64) -> Result<IndustryCompany, DatabaseError> {
        self.get_company(company_id).await?;
        self.get_industry(industry_id).await?;

        let stamp = fmt_datetime(now());
        let changed = self
            .db()
            .execute_with(LINK_SQL, || libsql::params![industry_id, company_id, stamp.as_str()])
            .await?;
        if changed == 0 {
            return Err(ValidationErrors::single("industry_id", validation::TAKEN).into());
        }
        tracing::debug!(company_id, industry_id, "industry linked");

        let sql = format!("SELECT {JOIN_COLUMNS} FROM industry_companies WHERE industry_id = ?1 AND company_id = ?2");
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params![industry_id, company_id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_industry_company(&row)
    }

    pub async fn unlink_industry(&self, company_id: i64, industry_id: i64) -> Result<(), DatabaseError> {
        self.get_company(company_id).await?;
        let stamp = fmt_datetime(now());
        let changed = self
            .db()
            .execute_with(
                "UPDATE industry_companies SET discarded_at = ?1
                 WHERE industry_id = ?2 AND company_id = ?3 AND discarded_at IS NULL",
                || libsql::params![stamp.as_str(), industry_id, company_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        tracing::debug!(company_id, industry_id, "industry unlinked");
        Ok(())
    }

    /// Kept industries a kept company is filed under, in id order.
    pub async fn company_industries(&self, company_id: i64) -> Result<Vec<Industry>, DatabaseError> {
        self.get_company(company_id).await?;
        let sql = format!(
            "SELECT {INDUSTRY_COLUMNS} FROM industries i
             JOIN industry_companies ic ON ic.industry_id = i.id
             WHERE ic.company_id = ?1 AND ic.discarded_at IS NULL AND i.discarded_at IS NULL
             ORDER BY i.id"
        );
        let mut rows = self.db().query_with(&sql, || [company_id]).await?;

        let mut industries = Vec::new();
        while let Some(row) = rows.next().await? {
            industries.push(row_to_industry(&row)?);
        }
        Ok(industries)
    }

    /// Kept companies filed under a kept industry, in id order.
    pub async fn industry_companies(&self, industry_id: i64, page: PageRequest) -> Result<Paged<Company>, DatabaseError> {
        self.get_industry(industry_id).await?;

        let from = "FROM companies
             WHERE discarded_at IS NULL AND id IN (
                 SELECT company_id FROM industry_companies WHERE industry_id = ?1 AND discarded_at IS NULL)";
        let sql = format!("SELECT {COMPANY_COLUMNS} {from} ORDER BY id{}", page.sql_window());
        let mut rows = self.db().query_with(&sql, || [industry_id]).await?;

        let mut companies = Vec::new();
        while let Some(row) = rows.next().await? {
            companies.push(row_to_company(&row)?);
        }
        let total = self
            .db()
            .count_with(&format!("SELECT COUNT(*) {from}"), || [industry_id])
            .await?;
        Ok(Paged {
            items: companies,
            total,
            request: page,
        })
    }

    /// Discard every kept join row of a company.
    pub(crate) async fn discard_company_industries(&self, company_id: i64, stamp: &str) -> Result<u64, DatabaseError> {
        self.db()
            .execute_with(
                "UPDATE industry_companies SET discarded_at = ?1 WHERE company_id = ?2 AND discarded_at IS NULL",
                || libsql::params![stamp, company_id],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{company, industry, test_service};
    use crate::updates::industry::IndustryUpdateBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_update_and_list_industries() {
        let svc = test_service().await;
        let logistics = industry(&svc, "Logistics").await;
        let cleaning = industry(&svc, "Cleaning").await;

        let updated = svc
            .update_industry(
                logistics.id,
                IndustryUpdateBuilder::new().description(Some("Freight and warehousing".into())).build(),
            )
            .await
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("Freight and warehousing"));

        let names: Vec<_> = svc
            .list_industries(PageRequest::All)
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(names, [cleaning.id, logistics.id]);

        let err = svc.create_industry(NewIndustry::default()).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Invalid(_)));
    }

    #[tokio::test]
    async fn link_revives_and_rejects_duplicates() {
        let svc = test_service().await;
        let acme = company(&svc, "Acme").await;
        let logistics = industry(&svc, "Logistics").await;

        let first = svc.link_industry(acme.id, logistics.id).await.unwrap();
        let err = svc.link_industry(acme.id, logistics.id).await.unwrap_err();
        let DatabaseError::Invalid(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.get("industry_id").unwrap(), [validation::TAKEN]);

        svc.unlink_industry(acme.id, logistics.id).await.unwrap();
        assert!(svc.company_industries(acme.id).await.unwrap().is_empty());
        assert!(matches!(
            svc.unlink_industry(acme.id, logistics.id).await,
            Err(DatabaseError::NoResult)
        ));

        let revived = svc.link_industry(acme.id, logistics.id).await.unwrap();
        assert_eq!(revived.id, first.id);
        assert_eq!(revived.discarded_at, None);
        assert_eq!(svc.company_industries(acme.id).await.unwrap(), [logistics]);
    }

    #[tokio::test]
    async fn discards_hide_join_rows() {
        let svc = test_service().await;
        let acme = company(&svc, "Acme").await;
        let globex = company(&svc, "Globex").await;
        let logistics = industry(&svc, "Logistics").await;
        svc.link_industry(acme.id, logistics.id).await.unwrap();
        svc.link_industry(globex.id, logistics.id).await.unwrap();

        svc.discard_company(acme.id).await.unwrap();
        let listed = svc.industry_companies(logistics.id, PageRequest::All).await.unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.items[0].id, globex.id);

        svc.discard_industry(logistics.id).await.unwrap();
        assert!(svc.company_industries(globex.id).await.unwrap().is_empty());
        assert!(matches!(
            svc.industry_companies(logistics.id, PageRequest::All).await,
            Err(DatabaseError::NoResult)
        ));
        assert!(matches!(
            svc.link_industry(globex.id, logistics.id).await,
            Err(DatabaseError::NoResult)
        ));
    }
}
