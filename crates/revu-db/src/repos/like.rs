//! Like repository.
//!
//! A like links a liker (Company) to a likeable (Review or Comment). Both
//! ends must be kept when the like is created, and a pair holds at most one
//! kept like at a time.

use revu_core::entities::Like;
use revu_core::enums::{LikeableKind, LikerKind};
use revu_core::validation::{self, ValidationErrors};

use crate::error::DatabaseError;
use crate::helpers::{fmt_datetime, get_datetime, get_opt_datetime, now, parse_kind};
use crate::pagination::{PageRequest, Paged};
use crate::service::RevuService;

const LIKE_COLUMNS: &str = "id, liker_type, liker_id, likeable_type, likeable_id, created_at, discarded_at";

fn row_to_like(row: &libsql::Row) -> Result<Like, DatabaseError> {
    Ok(Like {
        id: row.get::<i64>(0)?,
        liker_type: parse_kind(&row.get::<String>(1)?)?,
        liker_id: row.get::<i64>(2)?,
        likeable_type: parse_kind(&row.get::<String>(3)?)?,
        likeable_id: row.get::<i64>(4)?,
        created_at: get_datetime(row, 5)?,
        discarded_at: get_opt_datetime(row, 6)?,
    })
}

fn is_unique_violation(err: &libsql::Error) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}

impl RevuService {
    /// Record that `liker` likes `likeable`.
    ///
    /// Either end missing or discarded is `NoResult`. A second kept like for
    /// the same pair fails validation on `liker_id`.
    pub async fn create_like(
        &self,
        liker_type: LikerKind,
        liker_id: i64,
        likeable_type: LikeableKind,
        likeable_id: i64,
    ) -> Result<Like, DatabaseError> {
        self.ensure_kept(likeable_type.kind(), likeable_id).await?;
        self.ensure_kept(liker_type.kind(), liker_id).await?;

        let existing = self
            .db()
            .count_with(
                "SELECT COUNT(*) FROM likes
                 WHERE liker_type = ?1 AND liker_id = ?2 AND likeable_type = ?3 AND likeable_id = ?4
                   AND discarded_at IS NULL",
                || libsql::params![liker_type.as_str(), liker_id, likeable_type.as_str(), likeable_id],
            )
            .await?;
        if existing > 0 {
            return Err(ValidationErrors::single("liker_id", validation::TAKEN).into());
        }

        let now = now();
        let inserted = self
            .db()
            .execute_with(
                "INSERT INTO likes (liker_type, liker_id, likeable_type, likeable_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                || {
                    libsql::params![
                        liker_type.as_str(),
                        liker_id,
                        likeable_type.as_str(),
                        likeable_id,
                        fmt_datetime(now)
                    ]
                },
            )
            .await;
        match inserted {
            Ok(_) => {}
            Err(DatabaseError::LibSql(e)) if is_unique_violation(&e) => {
                return Err(ValidationErrors::single("liker_id", validation::TAKEN).into());
            }
            Err(e) => return Err(e),
        }
        let id = self.db().last_insert_id();
        tracing::debug!(id, %liker_type, liker_id, %likeable_type, likeable_id, "like created");

        Ok(Like {
            id,
            liker_type,
            liker_id,
            likeable_type,
            likeable_id,
            created_at: now,
            discarded_at: None,
        })
    }

    /// Fetch a kept like.
    pub async fn get_like(&self, id: i64) -> Result<Like, DatabaseError> {
        let sql = format!("SELECT {LIKE_COLUMNS} FROM likes WHERE id = ?1 AND discarded_at IS NULL");
        let mut rows = self.db().query_with(&sql, || [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_like(&row)
    }

    /// Kept likes of a kept likeable, in id order.
    pub async fn list_likes(
        &self,
        likeable_type: LikeableKind,
        likeable_id: i64,
        page: PageRequest,
    ) -> Result<Paged<Like>, DatabaseError> {
        self.ensure_kept(likeable_type.kind(), likeable_id).await?;

        let filter = "likeable_type = ?1 AND likeable_id = ?2 AND discarded_at IS NULL";
        let sql = format!(
            "SELECT {LIKE_COLUMNS} FROM likes WHERE {filter} ORDER BY id{}",
            page.sql_window()
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params![likeable_type.as_str(), likeable_id])
            .await?;

        let mut likes = Vec::new();
        while let Some(row) = rows.next().await? {
            likes.push(row_to_like(&row)?);
        }
        let total = self
            .db()
            .count_with(&format!("SELECT COUNT(*) FROM likes WHERE {filter}"), || {
                libsql::params![likeable_type.as_str(), likeable_id]
            })
            .await?;
        Ok(Paged {
            items: likes,
            total,
            request: page,
        })
    }

    /// Soft-delete a like. The pair may be liked again afterwards.
    pub async fn discard_like(&self, id: i64) -> Result<(), DatabaseError> {
        let stamp = fmt_datetime(now());
        let changed = self
            .db()
            .execute_with(
                "UPDATE likes SET discarded_at = ?1 WHERE id = ?2 AND discarded_at IS NULL",
                || libsql::params![stamp.as_str(), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        tracing::debug!(id, "like discarded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{company, offering, review, test_service};
    use pretty_assertions::assert_eq;
    use revu_core::entities::{Company, Review};
    use revu_core::enums::{OfferingKind, Score};

    async fn reviewed(svc: &RevuService) -> (Company, Review) {
        let vendor = company(svc, "Vendor").await;
        let client = company(svc, "Client").await;
        let service = offering(svc, &vendor, OfferingKind::Service, "Cleaning").await;
        let review = review(svc, &vendor, &client, &service, Score::Positive).await;
        (client, review)
    }

    #[tokio::test]
    async fn like_a_review() {
        let svc = test_service().await;
        let (client, review) = reviewed(&svc).await;

        let like = svc
            .create_like(LikerKind::Company, client.id, LikeableKind::Review, review.id)
            .await
            .unwrap();
        assert_eq!(svc.get_like(like.id).await.unwrap(), like);

        let listed = svc.list_likes(LikeableKind::Review, review.id, PageRequest::All).await.unwrap();
        assert_eq!(listed.total, 1);
        assert_eq!(listed.items[0].liker_id, client.id);
    }

    #[tokio::test]
    async fn duplicate_kept_like_is_taken() {
        let svc = test_service().await;
        let (client, review) = reviewed(&svc).await;
        svc.create_like(LikerKind::Company, client.id, LikeableKind::Review, review.id)
            .await
            .unwrap();

        let err = svc
            .create_like(LikerKind::Company, client.id, LikeableKind::Review, review.id)
            .await
            .unwrap_err();
        let DatabaseError::Invalid(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.get("liker_id").unwrap(), [validation::TAKEN]);
    }

    #[tokio::test]
    async fn relike_after_discard() {
        let svc = test_service().await;
        let (client, review) = reviewed(&svc).await;
        let first = svc
            .create_like(LikerKind::Company, client.id, LikeableKind::Review, review.id)
            .await
            .unwrap();
        svc.discard_like(first.id).await.unwrap();

        let second = svc
            .create_like(LikerKind::Company, client.id, LikeableKind::Review, review.id)
            .await
            .unwrap();
        assert!(second.id > first.id);
        assert!(matches!(svc.get_like(first.id).await, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn discarded_liker_or_likeable_is_not_found() {
        let svc = test_service().await;
        let (client, review) = reviewed(&svc).await;

        let missing = svc
            .create_like(LikerKind::Company, client.id, LikeableKind::Comment, 42)
            .await;
        assert!(matches!(missing, Err(DatabaseError::NoResult)));

        svc.discard_company(client.id).await.unwrap();
        let gone = svc
            .create_like(LikerKind::Company, client.id, LikeableKind::Review, review.id)
            .await;
        assert!(matches!(gone, Err(DatabaseError::NoResult)));

        let count = svc.db().count_with("SELECT COUNT(*) FROM likes", || ()).await.unwrap();
        assert_eq!(count, 0);
    }
}
