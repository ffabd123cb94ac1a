//! Product, service and project repository.
//!
//! The three kinds share one shape and live in one table each. An offering is
//! reachable only while it is kept and at least one kept join row links it to
//! a kept company; every lookup here applies that rule.

use revu_core::entities::{Company, Offering};
use revu_core::enums::OfferingKind;
use revu_core::filters::OfferingSorter;
use revu_core::validation::{MAX_NAME_LENGTH, ValidationErrors};

use crate::error::DatabaseError;
use crate::helpers::{entity_kind_to_table, fmt_datetime, get_datetime, get_opt_datetime, get_opt_string, now};
use crate::pagination::{PageRequest, Paged};
use crate::repos::company::{COMPANY_COLUMNS, row_to_company};
use crate::repos::company_reviewable::INSERT_JOIN_SQL;
use crate::service::RevuService;
use crate::updates::SetClause;
use crate::updates::offering::OfferingUpdate;

const OFFERING_COLUMNS: &str = "o.id, o.name, o.description, o.reviews_count, o.created_at, o.updated_at, o.discarded_at";

fn row_to_offering(row: &libsql::Row, kind: OfferingKind) -> Result<Offering, DatabaseError> {
    Ok(Offering {
        id: row.get::<i64>(0)?,
        kind,
        name: row.get::<String>(1)?,
        description: get_opt_string(row, 2)?,
        reviews_count: row.get::<i64>(3)?,
        created_at: get_datetime(row, 4)?,
        updated_at: get_datetime(row, 5)?,
        discarded_at: get_opt_datetime(row, 6)?,
    })
}

pub(crate) const fn offering_table(kind: OfferingKind) -> &'static str {
    entity_kind_to_table(kind.kind())
}

/// `WHERE` fragment selecting reachable offerings aliased as `o`.
fn reachable(kind: OfferingKind) -> String {
    format!(
        "o.discarded_at IS NULL AND EXISTS (
             SELECT 1 FROM company_reviewables cr JOIN companies c ON c.id = cr.company_id
             WHERE cr.reviewable_type = '{kind}' AND cr.reviewable_id = o.id
               AND cr.discarded_at IS NULL AND c.discarded_at IS NULL)"
    )
}

/// Attributes accepted when creating an offering.
#[derive(Debug, Clone, Default)]
pub struct NewOffering {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl RevuService {
    /// Create an offering sold by `company_id`.
    ///
    /// The offering row and its join row are written in one transaction.
    pub async fn create_offering(
        &self,
        company_id: i64,
        kind: OfferingKind,
        new: NewOffering,
    ) -> Result<Offering, DatabaseError> {
        self.get_company(company_id).await?;

        let mut errors = ValidationErrors::new();
        errors.require_present("name", new.name.as_deref(), true);
        errors.check_length("name", new.name.as_deref(), MAX_NAME_LENGTH);
        errors.into_result()?;

        let now = now();
        let stamp = fmt_datetime(now);
        let name = new.name.unwrap_or_default().trim().to_string();
        let table = offering_table(kind);

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!(
                "INSERT INTO {table} (name, description, reviews_count, created_at, updated_at)
                 VALUES (?1, ?2, 0, ?3, ?3)"
            ),
            libsql::params![name.as_str(), new.description.as_deref(), stamp.as_str()],
        )
        .await?;
        let id = tx.last_insert_rowid();
        tx.execute(
            INSERT_JOIN_SQL,
            libsql::params![company_id, kind.as_str(), id, stamp.as_str()],
        )
        .await?;
        tx.commit().await?;
        tracing::debug!(id, %kind, company_id, "offering created");

        Ok(Offering {
            id,
            kind,
            name,
            description: new.description,
            reviews_count: 0,
            created_at: now,
            updated_at: now,
            discarded_at: None,
        })
    }

    /// Fetch a reachable offering.
    pub async fn get_offering(&self, kind: OfferingKind, id: i64) -> Result<Offering, DatabaseError> {
        let sql = format!(
            "SELECT {OFFERING_COLUMNS} FROM {} o WHERE o.id = ?1 AND {}",
            offering_table(kind),
            reachable(kind)
        );
        let mut rows = self.db().query_with(&sql, || [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_offering(&row, kind)
    }

    /// Reachable offerings of one kind sold by a kept company, in id order.
    /// A missing or discarded company is `NoResult`.
    pub async fn list_company_offerings(
        &self,
        company_id: i64,
        kind: OfferingKind,
        page: PageRequest,
    ) -> Result<Paged<Offering>, DatabaseError> {
        self.get_company(company_id).await?;

        let from = format!(
            "FROM {} o
             JOIN company_reviewables own ON own.reviewable_type = '{kind}' AND own.reviewable_id = o.id
             JOIN companies oc ON oc.id = own.company_id
             WHERE own.company_id = ?1 AND own.discarded_at IS NULL
               AND oc.discarded_at IS NULL AND o.discarded_at IS NULL",
            offering_table(kind)
        );
        let sql = format!("SELECT {OFFERING_COLUMNS} {from} ORDER BY o.id{}", page.sql_window());
        let mut rows = self.db().query_with(&sql, || [company_id]).await?;

        let mut offerings = Vec::new();
        while let Some(row) = rows.next().await? {
            offerings.push(row_to_offering(&row, kind)?);
        }
        let total = self
            .db()
            .count_with(&format!("SELECT COUNT(*) {from}"), || [company_id])
            .await?;
        Ok(Paged {
            items: offerings,
            total,
            request: page,
        })
    }

    /// All reachable offerings a company sells: products, then services,
    /// then projects. With a sorter the combined list is sorted descending.
    pub async fn company_offerings(
        &self,
        company_id: i64,
        sort: Option<OfferingSorter>,
    ) -> Result<Vec<Offering>, DatabaseError> {
        let mut offerings = Vec::new();
        for kind in OfferingKind::ALL {
            offerings.extend(
                self.list_company_offerings(company_id, *kind, PageRequest::All)
                    .await?
                    .items,
            );
        }
        if let Some(sort) = sort {
            match sort {
                OfferingSorter::Name => offerings.sort_by(|a, b| a.name.cmp(&b.name)),
                OfferingSorter::ReviewsCount => offerings.sort_by_key(|o| o.reviews_count),
                OfferingSorter::CreatedAt => offerings.sort_by_key(|o| o.created_at),
            }
            offerings.reverse();
        }
        Ok(offerings)
    }

    /// Kept companies selling an offering (through kept join rows).
    pub async fn offering_companies(
        &self,
        kind: OfferingKind,
        offering_id: i64,
    ) -> Result<Vec<Company>, DatabaseError> {
        let columns = COMPANY_COLUMNS
            .split(", ")
            .map(|c| format!("c.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {columns} FROM companies c
             JOIN company_reviewables cr ON cr.company_id = c.id
             WHERE cr.reviewable_type = ?1 AND cr.reviewable_id = ?2
               AND cr.discarded_at IS NULL AND c.discarded_at IS NULL
             ORDER BY c.id"
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params![kind.as_str(), offering_id])
            .await?;

        let mut companies = Vec::new();
        while let Some(row) = rows.next().await? {
            companies.push(row_to_company(&row)?);
        }
        Ok(companies)
    }

    pub async fn update_offering(
        &self,
        kind: OfferingKind,
        id: i64,
        update: OfferingUpdate,
    ) -> Result<Offering, DatabaseError> {
        self.get_offering(kind, id).await?;

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
            return self.get_offering(kind, id).await;
        }

        let (sql, params) = set.into_update(offering_table(kind), id, now());
        self.db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        self.get_offering(kind, id).await
    }

    /// Soft-delete an offering. Its reviews stop counting towards the owning
    /// companies' aggregate scores, which are recomputed here.
    pub async fn discard_offering(&self, kind: OfferingKind, id: i64) -> Result<(), DatabaseError> {
        self.get_offering(kind, id).await?;
        let owners = self.offering_companies(kind, id).await?;

        let stamp = fmt_datetime(now());
        let sql = format!(
            "UPDATE {} SET discarded_at = ?1 WHERE id = ?2 AND discarded_at IS NULL",
            offering_table(kind)
        );
        self.db()
            .execute_with(&sql, || libsql::params![stamp.as_str(), id])
            .await?;

        for owner in owners {
            self.refresh_vendor_scores(owner.id).await?;
        }
        tracing::debug!(id, %kind, "offering discarded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{company, offering, test_service};
    use crate::updates::offering::OfferingUpdateBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_links_offering_to_company() {
        let svc = test_service().await;
        let acme = company(&svc, "Acme").await;
        let cleaning = offering(&svc, &acme, OfferingKind::Service, "Cleaning").await;

        let fetched = svc.get_offering(OfferingKind::Service, cleaning.id).await.unwrap();
        assert_eq!(fetched, cleaning);

        let owners = svc.offering_companies(OfferingKind::Service, cleaning.id).await.unwrap();
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].id, acme.id);
    }

    #[tokio::test]
    async fn kinds_are_separate_tables() {
        let svc = test_service().await;
        let acme = company(&svc, "Acme").await;
        let mop = offering(&svc, &acme, OfferingKind::Product, "Mop").await;

        assert!(matches!(
            svc.get_offering(OfferingKind::Service, mop.id).await,
            Err(DatabaseError::NoResult)
        ));
    }

    #[tokio::test]
    async fn create_for_missing_company_writes_nothing() {
        let svc = test_service().await;
        let result = svc
            .create_offering(
                42,
                OfferingKind::Service,
                NewOffering {
                    name: Some("Ghost".into()),
                    description: None,
                },
            )
            .await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));

        let count = svc.db().count_with("SELECT COUNT(*) FROM services", || ()).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn create_requires_name() {
        let svc = test_service().await;
        let acme = company(&svc, "Acme").await;
        let result = svc
            .create_offering(acme.id, OfferingKind::Project, NewOffering::default())
            .await;
        assert!(matches!(result, Err(DatabaseError::Invalid(_))));
    }

    #[tokio::test]
    async fn discarded_offerings_are_excluded() {
        let svc = test_service().await;
        let acme = company(&svc, "Acme").await;
        let cleaning = offering(&svc, &acme, OfferingKind::Service, "Cleaning").await;
        offering(&svc, &acme, OfferingKind::Service, "Catering").await;

        svc.discard_offering(OfferingKind::Service, cleaning.id).await.unwrap();

        let listed = svc
            .list_company_offerings(acme.id, OfferingKind::Service, PageRequest::All)
            .await
            .unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.items[0].name, "Catering");
        assert!(matches!(
            svc.get_offering(OfferingKind::Service, cleaning.id).await,
            Err(DatabaseError::NoResult)
        ));
        assert!(matches!(
            svc.discard_offering(OfferingKind::Service, cleaning.id).await,
            Err(DatabaseError::NoResult)
        ));
    }

    #[tokio::test]
    async fn update_offering_fields() {
        let svc = test_service().await;
        let acme = company(&svc, "Acme").await;
        let mop = offering(&svc, &acme, OfferingKind::Product, "Mop").await;

        let updated = svc
            .update_offering(
                OfferingKind::Product,
                mop.id,
                OfferingUpdateBuilder::new().name("Super Mop").description(None).build(),
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Super Mop");
        assert_eq!(updated.description, None);

        svc.discard_company(acme.id).await.unwrap();
        let result = svc
            .update_offering(OfferingKind::Product, mop.id, OfferingUpdateBuilder::new().name("X").build())
            .await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn company_offerings_concatenates_then_sorts() {
        let svc = test_service().await;
        let acme = company(&svc, "Acme").await;
        offering(&svc, &acme, OfferingKind::Project, "Audit").await;
        offering(&svc, &acme, OfferingKind::Product, "Mop").await;
        offering(&svc, &acme, OfferingKind::Service, "Cleaning").await;

        let natural = svc.company_offerings(acme.id, None).await.unwrap();
        let kinds: Vec<_> = natural.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, [OfferingKind::Product, OfferingKind::Service, OfferingKind::Project]);

        let by_name = svc.company_offerings(acme.id, Some(OfferingSorter::Name)).await.unwrap();
        let names: Vec<_> = by_name.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["Mop", "Cleaning", "Audit"]);
    }
}
