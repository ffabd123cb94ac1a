//! Company/offering join rows.

use revu_core::entities::CompanyReviewable;
use revu_core::enums::OfferingKind;
use revu_core::validation::{self, ValidationErrors};

use crate::error::DatabaseError;
use crate::helpers::{fmt_datetime, get_datetime, get_opt_datetime, now, parse_kind};
use crate::repos::offering::offering_table;
use crate::service::RevuService;

const JOIN_COLUMNS: &str = "id, company_id, reviewable_type, reviewable_id, created_at, discarded_at";

pub(crate) const INSERT_JOIN_SQL: &str = "INSERT INTO company_reviewables (company_id, reviewable_type, reviewable_id, created_at)
     VALUES (?1, ?2, ?3, ?4)";

fn row_to_company_reviewable(row: &libsql::Row) -> Result<CompanyReviewable, DatabaseError> {
    Ok(CompanyReviewable {
        id: row.get::<i64>(0)?,
        company_id: row.get::<i64>(1)?,
        reviewable_type: parse_kind(&row.get::<String>(2)?)?,
        reviewable_id: row.get::<i64>(3)?,
        created_at: get_datetime(row, 4)?,
        discarded_at: get_opt_datetime(row, 5)?,
    })
}

/// Insert a join row, or revive the discarded one for the same triple.
/// Nothing changes when a kept row already exists.
const LINK_SQL: &str = "INSERT INTO company_reviewables (company_id, reviewable_type, reviewable_id, created_at)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT (company_id, reviewable_type, reviewable_id)
     DO UPDATE SET discarded_at = NULL WHERE company_reviewables.discarded_at IS NOT NULL";

impl RevuService {
    /// Link a kept offering to a kept company.
    ///
    /// The offering need not be reachable, so an offering orphaned by a
    /// company discard can be picked up again. Relinking a pair whose join
    /// row was discarded revives that row. A pair that is already linked is
    /// a `reviewable_id` "taken" error.
    pub async fn link_offering(
        &self,
        company_id: i64,
        kind: OfferingKind,
        offering_id: i64,
    ) -> Result<CompanyReviewable, DatabaseError> {
        self.get_company(company_id).await?;
        self.ensure_offering_kept(kind, offering_id).await?;

        let stamp = fmt_datetime(now());
        let changed = self
            .db()
            .execute_with(LINK_SQL, || {
                libsql::params![company_id, kind.as_str(), offering_id, stamp.as_str()]
            })
            .await?;
        if changed == 0 {
            return Err(ValidationErrors::single("reviewable_id", validation::TAKEN).into());
        }
        self.refresh_vendor_scores(company_id).await?;
        tracing::debug!(company_id, %kind, offering_id, "offering linked");

        let sql = format!(
            "SELECT {JOIN_COLUMNS} FROM company_reviewables
             WHERE company_id = ?1 AND reviewable_type = ?2 AND reviewable_id = ?3"
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params![company_id, kind.as_str(), offering_id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_company_reviewable(&row)
    }

    /// Discard the kept join row between a company and an offering. The
    /// offering itself stays; it becomes unreachable once no kept company
    /// sells it.
    pub async fn unlink_offering(
        &self,
        company_id: i64,
        kind: OfferingKind,
        offering_id: i64,
    ) -> Result<(), DatabaseError> {
        self.get_company(company_id).await?;
        let stamp = fmt_datetime(now());
        let changed = self
            .db()
            .execute_with(
                "UPDATE company_reviewables SET discarded_at = ?1
                 WHERE company_id = ?2 AND reviewable_type = ?3 AND reviewable_id = ?4
                   AND discarded_at IS NULL",
                || libsql::params![stamp.as_str(), company_id, kind.as_str(), offering_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.refresh_vendor_scores(company_id).await?;
        tracing::debug!(company_id, %kind, offering_id, "offering unlinked");
        Ok(())
    }

    async fn ensure_offering_kept(&self, kind: OfferingKind, offering_id: i64) -> Result<(), DatabaseError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE id = ?1 AND discarded_at IS NULL",
            offering_table(kind)
        );
        if self.db().count_with(&sql, || [offering_id]).await? == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }

    /// Kept join rows of a company, in id order.
    pub async fn list_company_reviewables(
        &self,
        company_id: i64,
    ) -> Result<Vec<CompanyReviewable>, DatabaseError> {
        let sql = format!(
            "SELECT {JOIN_COLUMNS} FROM company_reviewables
             WHERE company_id = ?1 AND discarded_at IS NULL ORDER BY id"
        );
        let mut rows = self.db().query_with(&sql, || [company_id]).await?;

        let mut joins = Vec::new();
        while let Some(row) = rows.next().await? {
            joins.push(row_to_company_reviewable(&row)?);
        }
        Ok(joins)
    }

    pub async fn discard_company_reviewable(&self, id: i64) -> Result<(), DatabaseError> {
        let stamp = fmt_datetime(now());
        let changed = self
            .db()
            .execute_with(
                "UPDATE company_reviewables SET discarded_at = ?1 WHERE id = ?2 AND discarded_at IS NULL",
                || libsql::params![stamp.as_str(), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }
}
