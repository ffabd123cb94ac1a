//! Company repository: CRUD, sorted index, and discard cascade.

use revu_core::entities::Company;
use revu_core::filters::{AllowList, CompanySorter};
use revu_core::validation::{self, MAX_NAME_LENGTH, ValidationErrors};

use crate::error::DatabaseError;
use crate::helpers::{blank_to_none, fmt_datetime, get_datetime, get_opt_datetime, get_opt_string, now};
use crate::pagination::{PageRequest, Paged};
use crate::service::RevuService;
use crate::updates::SetClause;
use crate::updates::company::CompanyUpdate;

pub(crate) const COMPANY_COLUMNS: &str = "id, name, uen, description, url, image, aggregate_score, \
     reviews_count, created_at, updated_at, discarded_at";

pub(crate) fn row_to_company(row: &libsql::Row) -> Result<Company, DatabaseError> {
    Ok(Company {
        id: row.get::<i64>(0)?,
        name: row.get::<String>(1)?,
        uen: get_opt_string(row, 2)?,
        description: get_opt_string(row, 3)?,
        url: get_opt_string(row, 4)?,
        image: get_opt_string(row, 5)?,
        aggregate_score: row.get::<f64>(6)?,
        reviews_count: row.get::<i64>(7)?,
        created_at: get_datetime(row, 8)?,
        updated_at: get_datetime(row, 9)?,
        discarded_at: get_opt_datetime(row, 10)?,
    })
}

/// Attributes accepted when creating a company.
#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    pub name: Option<String>,
    pub uen: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
}

impl RevuService {
    pub async fn create_company(&self, new: NewCompany) -> Result<Company, DatabaseError> {
        let uen = blank_to_none(new.uen);
        let mut errors = ValidationErrors::new();
        errors.require_present("name", new.name.as_deref(), true);
        errors.check_length("name", new.name.as_deref(), MAX_NAME_LENGTH);
        errors.check_url("url", new.url.as_deref());
        self.check_uen_unique(&mut errors, uen.as_deref(), None).await?;
        errors.into_result()?;

        let now = now();
        let name = new.name.unwrap_or_default().trim().to_string();
        let description = new.description;
        let url = blank_to_none(new.url);
        let image = blank_to_none(new.image);

        self.db()
            .execute_with(
                "INSERT INTO companies (name, uen, description, url, image, aggregate_score, reviews_count, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0.0, 0, ?6, ?6)",
                || {
                    libsql::params![
                        name.as_str(),
                        uen.as_deref(),
                        description.as_deref(),
                        url.as_deref(),
                        image.as_deref(),
                        fmt_datetime(now)
                    ]
                },
            )
            .await?;
        let id = self.db().last_insert_id();
        tracing::debug!(id, %name, "company created");

        Ok(Company {
            id,
            name,
            uen,
            description,
            url,
            image,
            aggregate_score: 0.0,
            reviews_count: 0,
            created_at: now,
            updated_at: now,
            discarded_at: None,
        })
    }

    /// Fetch a kept company.
    pub async fn get_company(&self, id: i64) -> Result<Company, DatabaseError> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = ?1 AND discarded_at IS NULL");
        let mut rows = self.db().query_with(&sql, || [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_company(&row)
    }

    /// Kept companies among `ids`, in ascending id order.
    pub(crate) async fn get_companies(&self, ids: &[i64]) -> Result<Vec<Company>, DatabaseError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = (1..=ids.len()).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ");
        let sql = format!(
            "SELECT {COMPANY_COLUMNS} FROM companies
             WHERE id IN ({placeholders}) AND discarded_at IS NULL ORDER BY id"
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(ids.iter().copied()))
            .await?;

        let mut companies = Vec::new();
        while let Some(row) = rows.next().await? {
            companies.push(row_to_company(&row)?);
        }
        Ok(companies)
    }

    /// Kept companies, optionally sorted descending by an allow-listed key.
    /// Unsorted listings are in creation (id) order.
    pub async fn list_companies(
        &self,
        sort: Option<CompanySorter>,
        page: PageRequest,
    ) -> Result<Paged<Company>, DatabaseError> {
        let order = sort.map_or_else(|| "id ASC".to_string(), |s| format!("{} DESC, id DESC", s.key()));
        let sql = format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE discarded_at IS NULL ORDER BY {order}{}",
            page.sql_window()
        );
        let mut rows = self.db().query_with(&sql, || ()).await?;

        let mut companies = Vec::new();
        while let Some(row) = rows.next().await? {
            companies.push(row_to_company(&row)?);
        }
        let total = self
            .db()
            .count_with("SELECT COUNT(*) FROM companies WHERE discarded_at IS NULL", || ())
            .await?;
        Ok(Paged {
            items: companies,
            total,
            request: page,
        })
    }

    pub async fn update_company(&self, id: i64, update: CompanyUpdate) -> Result<Company, DatabaseError> {
        self.get_company(id).await?;

        let uen = update.uen.map(blank_to_none);
        let mut errors = ValidationErrors::new();
        errors.require_present("name", update.name.as_deref(), false);
        errors.check_length("name", update.name.as_deref(), MAX_NAME_LENGTH);
        if let Some(url) = &update.url {
            errors.check_url("url", url.as_deref());
        }
        if let Some(uen) = &uen {
            self.check_uen_unique(&mut errors, uen.as_deref(), Some(id)).await?;
        }
        errors.into_result()?;

        let mut set = SetClause::default();
        if let Some(name) = &update.name {
            set.push("name", name.trim());
        }
        if let Some(uen) = uen {
            set.push("uen", uen);
        }
        if let Some(description) = update.description {
            set.push("description", description);
        }
        if let Some(url) = update.url {
            set.push("url", blank_to_none(url));
        }
        if let Some(image) = update.image {
            set.push("image", blank_to_none(image));
        }
        if set.is_empty() {
            return self.get_company(id).await;
        }

        let (sql, params) = set.into_update("companies", id, now());
        self.db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        self.get_company(id).await
    }

    /// Soft-delete a company and cascade to its join rows.
    ///
    /// The cascade is best effort: a join row that fails to discard is logged
    /// and skipped, and the company stays discarded.
    pub async fn discard_company(&self, id: i64) -> Result<(), DatabaseError> {
        let stamp = fmt_datetime(now());
        let changed = self
            .db()
            .execute_with(
                "UPDATE companies SET discarded_at = ?1 WHERE id = ?2 AND discarded_at IS NULL",
                || libsql::params![stamp.as_str(), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }

        for join in self.list_company_reviewables(id).await? {
            if let Err(e) = self.discard_company_reviewable(join.id).await {
                tracing::warn!(
                    company_id = id,
                    company_reviewable_id = join.id,
                    error = %e,
                    "failed to discard company reviewable"
                );
            }
        }
        if let Err(e) = self.discard_company_industries(id, &stamp).await {
            tracing::warn!(company_id = id, error = %e, "failed to discard industry links");
        }
        tracing::debug!(id, "company discarded");
        Ok(())
    }

    async fn check_uen_unique(
        &self,
        errors: &mut ValidationErrors,
        uen: Option<&str>,
        except_id: Option<i64>,
    ) -> Result<(), DatabaseError> {
        let Some(uen) = uen else {
            return Ok(());
        };
        let taken = self
            .db()
            .count_with("SELECT COUNT(*) FROM companies WHERE uen = ?1 AND id != ?2", || {
                libsql::params![uen, except_id.unwrap_or(0)]
            })
            .await?;
        if taken > 0 {
            errors.add("uen", validation::TAKEN);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{company, offering, test_service};
    use crate::updates::company::CompanyUpdateBuilder;
    use pretty_assertions::assert_eq;
    use revu_core::enums::OfferingKind;

    #[tokio::test]
    async fn create_and_get_company() {
        let svc = test_service().await;
        let created = svc
            .create_company(NewCompany {
                name: Some("Acme Pte Ltd".into()),
                uen: Some("201912345K".into()),
                url: Some("https://acme.example".into()),
                ..NewCompany::default()
            })
            .await
            .unwrap();

        let fetched = svc.get_company(created.id).await.unwrap();
        assert_eq!(fetched.name, "Acme Pte Ltd");
        assert_eq!(fetched.uen.as_deref(), Some("201912345K"));
        assert_eq!(fetched.reviews_count, 0);
        assert!(fetched.aggregate_score.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn create_requires_name_and_valid_url() {
        let svc = test_service().await;
        let err = svc
            .create_company(NewCompany {
                name: Some("   ".into()),
                url: Some("not a url".into()),
                ..NewCompany::default()
            })
            .await
            .unwrap_err();

        let DatabaseError::Invalid(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.get("name").unwrap(), [validation::BLANK]);
        assert_eq!(errors.get("url").unwrap(), [validation::INVALID_URL]);
    }

    #[tokio::test]
    async fn uen_is_unique_but_blank_is_allowed() {
        let svc = test_service().await;
        for name in ["A", "B"] {
            svc.create_company(NewCompany {
                name: Some(name.into()),
                uen: Some(String::new()),
                ..NewCompany::default()
            })
            .await
            .unwrap();
        }

        svc.create_company(NewCompany {
            name: Some("C".into()),
            uen: Some("U1".into()),
            ..NewCompany::default()
        })
        .await
        .unwrap();
        let err = svc
            .create_company(NewCompany {
                name: Some("D".into()),
                uen: Some("U1".into()),
                ..NewCompany::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Invalid(ref e) if e.get("uen").is_some()));
    }

    #[tokio::test]
    async fn update_company_fields() {
        let svc = test_service().await;
        let acme = company(&svc, "Acme").await;

        let updated = svc
            .update_company(
                acme.id,
                CompanyUpdateBuilder::new()
                    .name("Acme Holdings")
                    .description(Some("Widgets".into()))
                    .url(None)
                    .build(),
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Acme Holdings");
        assert_eq!(updated.description.as_deref(), Some("Widgets"));

        let err = svc
            .update_company(acme.id, CompanyUpdateBuilder::new().name("").build())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Invalid(_)));
    }

    #[tokio::test]
    async fn keeping_own_uen_on_update_is_fine() {
        let svc = test_service().await;
        let acme = svc
            .create_company(NewCompany {
                name: Some("Acme".into()),
                uen: Some("U9".into()),
                ..NewCompany::default()
            })
            .await
            .unwrap();
        svc.update_company(acme.id, CompanyUpdateBuilder::new().uen(Some("U9".into())).build())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn discarded_company_is_not_found() {
        let svc = test_service().await;
        let acme = company(&svc, "Acme").await;
        svc.discard_company(acme.id).await.unwrap();

        assert!(matches!(svc.get_company(acme.id).await, Err(DatabaseError::NoResult)));
        assert!(matches!(svc.discard_company(acme.id).await, Err(DatabaseError::NoResult)));
        let listed = svc.list_companies(None, PageRequest::All).await.unwrap();
        assert!(listed.items.is_empty());
    }

    #[tokio::test]
    async fn discard_cascades_to_join_rows() {
        let svc = test_service().await;
        let acme = company(&svc, "Acme").await;
        let cleaning = offering(&svc, &acme, OfferingKind::Service, "Cleaning").await;
        offering(&svc, &acme, OfferingKind::Product, "Mop").await;
        assert_eq!(svc.list_company_reviewables(acme.id).await.unwrap().len(), 2);

        svc.discard_company(acme.id).await.unwrap();

        assert!(svc.list_company_reviewables(acme.id).await.unwrap().is_empty());
        assert!(matches!(
            svc.get_offering(OfferingKind::Service, cleaning.id).await,
            Err(DatabaseError::NoResult)
        ));
    }

    #[tokio::test]
    async fn list_companies_sorted_and_paged() {
        let svc = test_service().await;
        for name in ["Bravo", "Alpha", "Charlie"] {
            company(&svc, name).await;
        }

        let by_name = svc
            .list_companies(CompanySorter::accept(Some("name")), PageRequest::All)
            .await
            .unwrap();
        let names: Vec<_> = by_name.items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Charlie", "Bravo", "Alpha"]);

        let page = svc.list_companies(None, PageRequest::page(2, 2)).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Charlie");
    }
}
