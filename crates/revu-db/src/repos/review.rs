//! Review repository.
//!
//! Every write here recounts the vendor's `reviews_count`/`aggregate_score`
//! and the reviewable's `reviews_count` in the same transaction, so a failed
//! recount leaves the review untouched.

use revu_core::entities::Review;
use revu_core::enums::{OfferingKind, ReviewerKind, Score};
use revu_core::validation::{self, MAX_NAME_LENGTH, ValidationErrors};

use crate::error::DatabaseError;
use crate::helpers::{
    fmt_datetime, get_datetime, get_opt_datetime, get_opt_string, now, parse_kind, parse_score, settle,
};
use crate::pagination::{PageRequest, Paged};
use crate::repos::aspect::{INSERT_ASPECT_SQL, NewAspect};
use crate::service::RevuService;
use crate::updates::SetClause;
use crate::updates::review::ReviewUpdate;

pub(crate) const REVIEW_COLUMNS_R: &str = "r.id, r.score, r.content, r.vendor_id, r.reviewer_type, r.reviewer_id, \
     r.reviewable_type, r.reviewable_id, r.grant_id, r.created_at, r.updated_at, r.discarded_at";

pub(crate) fn row_to_review(row: &libsql::Row) -> Result<Review, DatabaseError> {
    Ok(Review {
        id: row.get::<i64>(0)?,
        score: parse_score(row.get::<i64>(1)?)?,
        content: get_opt_string(row, 2)?,
        vendor_id: row.get::<i64>(3)?,
        reviewer_type: parse_kind(&row.get::<String>(4)?)?,
        reviewer_id: row.get::<i64>(5)?,
        reviewable_type: parse_kind(&row.get::<String>(6)?)?,
        reviewable_id: row.get::<i64>(7)?,
        grant_id: row.get::<Option<i64>>(8)?,
        created_at: get_datetime(row, 9)?,
        updated_at: get_datetime(row, 10)?,
        discarded_at: get_opt_datetime(row, 11)?,
    })
}

/// Attributes accepted when creating a review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub score: Option<Score>,
    pub content: Option<String>,
    pub vendor_id: i64,
    pub reviewer: (ReviewerKind, i64),
    pub reviewable: (OfferingKind, i64),
    pub grant_id: Option<i64>,
    pub aspects: Vec<NewAspect>,
}

impl RevuService {
    /// Create a review together with its aspects.
    ///
    /// Vendor, reviewer and reviewable must be kept (`NoResult` otherwise).
    /// The vendor must sell the reviewable and a referenced grant must be
    /// kept; both are reported as field errors.
    pub async fn create_review(&self, new: NewReview) -> Result<Review, DatabaseError> {
        let (reviewer_type, reviewer_id) = new.reviewer;
        let (reviewable_type, reviewable_id) = new.reviewable;

        self.get_company(new.vendor_id).await?;
        self.ensure_kept(reviewer_type.kind(), reviewer_id).await?;
        self.get_offering(reviewable_type, reviewable_id).await?;

        let mut errors = ValidationErrors::new();
        if new.score.is_none() {
            errors.add("score", validation::BLANK);
        }
        if !self.sells(new.vendor_id, reviewable_type, reviewable_id).await? {
            errors.add("vendor_id", validation::INVALID);
        }
        self.check_grant(&mut errors, new.grant_id).await?;
        for aspect in &new.aspects {
            errors.require_present("aspects", aspect.name.as_deref(), true);
            errors.check_length("aspects", aspect.name.as_deref(), MAX_NAME_LENGTH);
        }
        errors.into_result()?;
        let score = new.score.ok_or_else(|| DatabaseError::InvalidState("score checked above".into()))?;

        let now = now();
        let stamp = fmt_datetime(now);
        let tx = self.db().conn().transaction().await?;
        let written = async {
            tx.execute(
                "INSERT INTO reviews (score, content, vendor_id, reviewer_type, reviewer_id,
                                      reviewable_type, reviewable_id, grant_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
                libsql::params![
                    score.value(),
                    new.content.as_deref(),
                    new.vendor_id,
                    reviewer_type.as_str(),
                    reviewer_id,
                    reviewable_type.as_str(),
                    reviewable_id,
                    new.grant_id,
                    stamp.as_str()
                ],
            )
            .await?;
            let id = tx.last_insert_rowid();
            for aspect in &new.aspects {
                let name = aspect.name.as_deref().unwrap_or_default().trim();
                tx.execute(
                    INSERT_ASPECT_SQL,
                    libsql::params![id, name, aspect.description.as_deref(), stamp.as_str()],
                )
                .await?;
            }
            self.refresh_review_counters(new.vendor_id, reviewable_type, reviewable_id)
                .await?;
            Ok::<_, DatabaseError>(id)
        }
        .await;
        let id = settle(tx, written).await?;
        tracing::debug!(id, vendor_id = new.vendor_id, %reviewable_type, reviewable_id, "review created");

        Ok(Review {
            id,
            score,
            content: new.content,
            vendor_id: new.vendor_id,
            reviewer_type,
            reviewer_id,
            reviewable_type,
            reviewable_id,
            grant_id: new.grant_id,
            created_at: now,
            updated_at: now,
            discarded_at: None,
        })
    }

    /// Fetch a kept review.
    pub async fn get_review(&self, id: i64) -> Result<Review, DatabaseError> {
        let sql = format!("SELECT {REVIEW_COLUMNS_R} FROM reviews r WHERE r.id = ?1 AND r.discarded_at IS NULL");
        let mut rows = self.db().query_with(&sql, || [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_review(&row)
    }

    /// Kept reviews of a reachable offering, in id order.
    pub async fn list_offering_reviews(
        &self,
        kind: OfferingKind,
        offering_id: i64,
        page: PageRequest,
    ) -> Result<Paged<Review>, DatabaseError> {
        self.get_offering(kind, offering_id).await?;

        let filter = "r.reviewable_type = ?1 AND r.reviewable_id = ?2 AND r.discarded_at IS NULL";
        let sql = format!(
            "SELECT {REVIEW_COLUMNS_R} FROM reviews r WHERE {filter} ORDER BY r.id{}",
            page.sql_window()
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params![kind.as_str(), offering_id])
            .await?;

        let mut reviews = Vec::new();
        while let Some(row) = rows.next().await? {
            reviews.push(row_to_review(&row)?);
        }
        let total = self
            .db()
            .count_with(&format!("SELECT COUNT(*) FROM reviews r WHERE {filter}"), || {
                libsql::params![kind.as_str(), offering_id]
            })
            .await?;
        Ok(Paged {
            items: reviews,
            total,
            request: page,
        })
    }

    pub async fn update_review(&self, id: i64, update: ReviewUpdate) -> Result<Review, DatabaseError> {
        let review = self.get_review(id).await?;

        let mut errors = ValidationErrors::new();
        if let Some(grant_id) = update.grant_id {
            self.check_grant(&mut errors, grant_id).await?;
        }
        errors.into_result()?;

        let mut set = SetClause::default();
        if let Some(score) = update.score {
            set.push("score", score.value());
        }
        if let Some(content) = update.content {
            set.push("content", content);
        }
        if let Some(grant_id) = update.grant_id {
            set.push("grant_id", grant_id);
        }
        if set.is_empty() {
            return Ok(review);
        }

        let (sql, params) = set.into_update("reviews", id, now());
        let tx = self.db().conn().transaction().await?;
        let written = async {
            self.db()
                .execute_with(&sql, || libsql::params_from_iter(params.clone()))
                .await?;
            if update.score.is_some() {
                self.refresh_vendor_scores(review.vendor_id).await?;
            }
            Ok::<_, DatabaseError>(())
        }
        .await;
        settle(tx, written).await?;
        self.get_review(id).await
    }

    pub async fn discard_review(&self, id: i64) -> Result<(), DatabaseError> {
        let review = self.get_review(id).await?;
        let stamp = fmt_datetime(now());
        let tx = self.db().conn().transaction().await?;
        let written = async {
            self.db()
                .execute_with(
                    "UPDATE reviews SET discarded_at = ?1 WHERE id = ?2 AND discarded_at IS NULL",
                    || libsql::params![stamp.as_str(), id],
                )
                .await?;
            self.refresh_review_counters(review.vendor_id, review.reviewable_type, review.reviewable_id)
                .await
        }
        .await;
        settle(tx, written).await?;
        tracing::debug!(id, "review discarded");
        Ok(())
    }

    /// Recount the vendor and the reviewed offering. Callers run this inside
    /// the transaction that changed the review.
    async fn refresh_review_counters(
        &self,
        vendor_id: i64,
        kind: OfferingKind,
        offering_id: i64,
    ) -> Result<(), DatabaseError> {
        self.refresh_vendor_scores(vendor_id).await?;
        self.refresh_offering_reviews_count(kind, offering_id).await?;
        Ok(())
    }

    /// Whether a kept join row links the company to the offering.
    async fn sells(&self, company_id: i64, kind: OfferingKind, offering_id: i64) -> Result<bool, DatabaseError> {
        let count = self
            .db()
            .count_with(
                "SELECT COUNT(*) FROM company_reviewables
                 WHERE company_id = ?1 AND reviewable_type = ?2 AND reviewable_id = ?3
                   AND discarded_at IS NULL",
                || libsql::params![company_id, kind.as_str(), offering_id],
            )
            .await?;
        Ok(count > 0)
    }

    async fn check_grant(&self, errors: &mut ValidationErrors, grant_id: Option<i64>) -> Result<(), DatabaseError> {
        let Some(grant_id) = grant_id else {
            return Ok(());
        };
        match self.get_grant(grant_id).await {
            Ok(_) => Ok(()),
            Err(DatabaseError::NoResult) => {
                errors.add("grant_id", validation::INVALID);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{company, grant, offering, review, test_service};
    use crate::updates::review::ReviewUpdateBuilder;
    use pretty_assertions::assert_eq;

    fn new_review(vendor: i64, reviewer: i64, kind: OfferingKind, offering: i64) -> NewReview {
        NewReview {
            score: Some(Score::Positive),
            content: Some("Great".into()),
            vendor_id: vendor,
            reviewer: (ReviewerKind::Company, reviewer),
            reviewable: (kind, offering),
            grant_id: None,
            aspects: Vec::new(),
        }
    }

    #[tokio::test]
    async fn create_review_with_aspects() {
        let svc = test_service().await;
        let vendor = company(&svc, "Vendor").await;
        let client = company(&svc, "Client").await;
        let service = offering(&svc, &vendor, OfferingKind::Service, "Cleaning").await;
        let psg = grant(&svc, "Productivity Solutions Grant").await;

        let mut new = new_review(vendor.id, client.id, OfferingKind::Service, service.id);
        new.grant_id = Some(psg.id);
        new.aspects = vec![
            NewAspect {
                name: Some("Reliability".into()),
                description: None,
            },
            NewAspect {
                name: Some("Value".into()),
                description: Some("Fair price".into()),
            },
        ];
        let created = svc.create_review(new).await.unwrap();

        let fetched = svc.get_review(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.grant_id, Some(psg.id));

        let aspects = svc.list_review_aspects(created.id, PageRequest::All).await.unwrap();
        let names: Vec<_> = aspects.items.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Reliability", "Value"]);
    }

    #[tokio::test]
    async fn review_requires_score_and_vendor_link() {
        let svc = test_service().await;
        let vendor = company(&svc, "Vendor").await;
        let other = company(&svc, "Other").await;
        let client = company(&svc, "Client").await;
        let service = offering(&svc, &vendor, OfferingKind::Service, "Cleaning").await;

        let mut new = new_review(other.id, client.id, OfferingKind::Service, service.id);
        new.score = None;
        new.grant_id = Some(999);
        let err = svc.create_review(new).await.unwrap_err();
        let DatabaseError::Invalid(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.get("score").unwrap(), [validation::BLANK]);
        assert_eq!(errors.get("vendor_id").unwrap(), [validation::INVALID]);
        assert_eq!(errors.get("grant_id").unwrap(), [validation::INVALID]);

        let count = svc.db().count_with("SELECT COUNT(*) FROM reviews", || ()).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn discarded_reviewer_cannot_review() {
        let svc = test_service().await;
        let vendor = company(&svc, "Vendor").await;
        let client = company(&svc, "Client").await;
        let service = offering(&svc, &vendor, OfferingKind::Service, "Cleaning").await;
        svc.discard_company(client.id).await.unwrap();

        let result = svc
            .create_review(new_review(vendor.id, client.id, OfferingKind::Service, service.id))
            .await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn update_score_refreshes_vendor() {
        let svc = test_service().await;
        let vendor = company(&svc, "Vendor").await;
        let client = company(&svc, "Client").await;
        let service = offering(&svc, &vendor, OfferingKind::Service, "Cleaning").await;
        let created = review(&svc, &vendor, &client, &service, Score::Positive).await;
        assert!((svc.get_company(vendor.id).await.unwrap().aggregate_score - 1.0).abs() < f64::EPSILON);

        let updated = svc
            .update_review(
                created.id,
                ReviewUpdateBuilder::new().score(Score::Negative).content(None).build(),
            )
            .await
            .unwrap();
        assert_eq!(updated.score, Score::Negative);
        assert_eq!(updated.content, None);
        assert!((svc.get_company(vendor.id).await.unwrap().aggregate_score + 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn failed_rescore_leaves_no_review_behind() {
        let svc = test_service().await.with_aggregator(|_: &[Review]| f64::NAN);
        let vendor = company(&svc, "Vendor").await;
        let client = company(&svc, "Client").await;
        let service = offering(&svc, &vendor, OfferingKind::Service, "Cleaning").await;

        let mut new = new_review(vendor.id, client.id, OfferingKind::Service, service.id);
        new.aspects = vec![NewAspect {
            name: Some("Reliability".into()),
            description: None,
        }];
        let err = svc.create_review(new).await.unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)), "got {err:?}");

        let reviews = svc.db().count_with("SELECT COUNT(*) FROM reviews", || ()).await.unwrap();
        let aspects = svc.db().count_with("SELECT COUNT(*) FROM aspects", || ()).await.unwrap();
        assert_eq!((reviews, aspects), (0, 0));
        let vendor = svc.get_company(vendor.id).await.unwrap();
        assert_eq!(vendor.reviews_count, 0);
        assert_eq!(svc.get_offering(OfferingKind::Service, service.id).await.unwrap().reviews_count, 0);
    }

    #[tokio::test]
    async fn failed_rescore_keeps_review_on_discard() {
        let svc = test_service().await;
        let vendor = company(&svc, "Vendor").await;
        let client = company(&svc, "Client").await;
        let service = offering(&svc, &vendor, OfferingKind::Service, "Cleaning").await;
        let first = review(&svc, &vendor, &client, &service, Score::Positive).await;
        review(&svc, &vendor, &client, &service, Score::Neutral).await;

        let svc = svc.with_aggregator(|_: &[Review]| f64::INFINITY);
        let err = svc.discard_review(first.id).await;
        assert!(matches!(err, Err(DatabaseError::InvalidState(_))));

        assert_eq!(svc.get_review(first.id).await.unwrap(), first);
        assert_eq!(svc.get_company(vendor.id).await.unwrap().reviews_count, 2);
    }

    #[tokio::test]
    async fn list_offering_reviews_skips_discarded() {
        let svc = test_service().await;
        let vendor = company(&svc, "Vendor").await;
        let client = company(&svc, "Client").await;
        let service = offering(&svc, &vendor, OfferingKind::Service, "Cleaning").await;
        let gone = review(&svc, &vendor, &client, &service, Score::Positive).await;
        let kept = review(&svc, &vendor, &client, &service, Score::Neutral).await;
        svc.discard_review(gone.id).await.unwrap();

        let listed = svc
            .list_offering_reviews(OfferingKind::Service, service.id, PageRequest::All)
            .await
            .unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.items[0].id, kept.id);
        assert!(matches!(svc.get_review(gone.id).await, Err(DatabaseError::NoResult)));
    }
}
