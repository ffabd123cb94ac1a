//! Vendor review aggregation.
//!
//! A company's reviews-as-vendor are the kept reviews naming it as vendor
//! whose reviewable is one of its own reachable products, services or
//! projects. Derived counters on companies and offerings are recomputed from
//! kept rows whenever a review or offering changes.

use revu_core::entities::Review;
use revu_core::enums::{OfferingKind, Score};
use revu_core::filters::ReviewSorter;

use crate::error::DatabaseError;
use crate::repos::offering::offering_table;
use crate::repos::review::{REVIEW_COLUMNS_R, row_to_review};
use crate::service::RevuService;

impl RevuService {
    /// Reviews-as-vendor, optionally restricted to one offering kind.
    ///
    /// Order is products, then services, then projects; ascending id within
    /// each kind.
    pub async fn get_reviews_as_vendor(
        &self,
        company_id: i64,
        filter: Option<OfferingKind>,
    ) -> Result<Vec<Review>, DatabaseError> {
        let kinds: &[OfferingKind] = match &filter {
            Some(kind) => std::slice::from_ref(kind),
            None => OfferingKind::ALL,
        };

        let mut reviews = Vec::new();
        for kind in kinds {
            let sql = format!(
                "SELECT {REVIEW_COLUMNS_R} FROM reviews r
                 JOIN {} o ON o.id = r.reviewable_id
                 WHERE r.vendor_id = ?1 AND r.reviewable_type = ?2
                   AND r.discarded_at IS NULL AND o.discarded_at IS NULL
                   AND EXISTS (
                       SELECT 1 FROM company_reviewables cr
                       WHERE cr.company_id = ?1 AND cr.reviewable_type = ?2
                         AND cr.reviewable_id = o.id AND cr.discarded_at IS NULL)
                 ORDER BY r.id",
                offering_table(*kind)
            );
            let mut rows = self
                .db()
                .query_with(&sql, || libsql::params![company_id, kind.as_str()])
                .await?;
            while let Some(row) = rows.next().await? {
                reviews.push(row_to_review(&row)?);
            }
        }
        Ok(reviews)
    }

    /// Reviews-as-vendor filtered by verdict and optionally newest first.
    pub async fn reviews_as_vendor(
        &self,
        company_id: i64,
        score: Option<Score>,
        sort: Option<ReviewSorter>,
    ) -> Result<Vec<Review>, DatabaseError> {
        let mut reviews = self.get_reviews_as_vendor(company_id, None).await?;
        if let Some(score) = score {
            reviews.retain(|review| review.score == score);
        }
        if let Some(ReviewSorter::CreatedAt) = sort {
            reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        }
        Ok(reviews)
    }

    /// Recompute `reviews_count` as the number of kept reviews naming the
    /// company as vendor.
    pub async fn set_reviews_count(&self, company_id: i64) -> Result<i64, DatabaseError> {
        let count = self
            .db()
            .count_with(
                "SELECT COUNT(*) FROM reviews WHERE vendor_id = ?1 AND discarded_at IS NULL",
                || [company_id],
            )
            .await?;
        let count = i64::try_from(count).map_err(|e| DatabaseError::InvalidState(e.to_string()))?;
        self.db()
            .execute_with("UPDATE companies SET reviews_count = ?1 WHERE id = ?2", || {
                libsql::params![count, company_id]
            })
            .await?;
        Ok(count)
    }

    /// Recompute `aggregate_score` from the stored `reviews_count` and the
    /// reviews-as-vendor. A company without reviews scores exactly 0.0.
    pub async fn set_aggregate_score(&self, company_id: i64) -> Result<f64, DatabaseError> {
        let mut rows = self
            .db()
            .query_with("SELECT reviews_count FROM companies WHERE id = ?1", || [company_id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let reviews_count = row.get::<i64>(0)?;

        let score = if reviews_count > 0 {
            let reviews = self.get_reviews_as_vendor(company_id, None).await?;
            self.scorer().aggregate(&reviews)
        } else {
            0.0
        };
        if !score.is_finite() {
            return Err(DatabaseError::InvalidState(format!(
                "aggregate score for company {company_id} is not finite"
            )));
        }
        self.db()
            .execute_with("UPDATE companies SET aggregate_score = ?1 WHERE id = ?2", || {
                libsql::params![score, company_id]
            })
            .await?;
        Ok(score)
    }

    /// Recompute both vendor counters, count first.
    pub async fn refresh_vendor_scores(&self, company_id: i64) -> Result<(), DatabaseError> {
        let count = self.set_reviews_count(company_id).await?;
        let score = self.set_aggregate_score(company_id).await?;
        tracing::debug!(company_id, count, score, "vendor scores refreshed");
        Ok(())
    }

    /// Recompute an offering's `reviews_count` from its kept reviews.
    pub async fn refresh_offering_reviews_count(
        &self,
        kind: OfferingKind,
        offering_id: i64,
    ) -> Result<i64, DatabaseError> {
        let count = self
            .db()
            .count_with(
                "SELECT COUNT(*) FROM reviews
                 WHERE reviewable_type = ?1 AND reviewable_id = ?2 AND discarded_at IS NULL",
                || libsql::params![kind.as_str(), offering_id],
            )
            .await?;
        let count = i64::try_from(count).map_err(|e| DatabaseError::InvalidState(e.to_string()))?;
        let sql = format!("UPDATE {} SET reviews_count = ?1 WHERE id = ?2", offering_table(kind));
        self.db()
            .execute_with(&sql, || libsql::params![count, offering_id])
            .await?;
        Ok(count)
    }
}
