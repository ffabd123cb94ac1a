//! Vendor statistics derived from reviews-as-vendor: clients, the
//! industries those clients work in, grants and aspects.

use std::collections::HashMap;

use revu_core::entities::{Aspect, Company, Grant, Industry};
use revu_core::enums::{OfferingKind, Score};
use revu_core::filters::{AspectSorter, GrantSorter, ReviewableSorter};
use serde::Serialize;

use crate::error::DatabaseError;
use crate::repos::aspect::{ASPECT_COLUMNS, row_to_aspect};
use crate::repos::grant::{GRANT_COLUMNS, row_to_grant};
use crate::repos::industry::{INDUSTRY_COLUMNS, row_to_industry};
use crate::service::RevuService;

/// An aspect name with how often it occurs. `aspect` is the first
/// occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AspectCount {
    pub aspect: Aspect,
    pub count: u64,
}

/// Result of [`RevuService::vendor_aspects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorAspects {
    Plain(Vec<Aspect>),
    Counted(Vec<AspectCount>),
}

impl VendorAspects {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Plain(aspects) => aspects.len(),
            Self::Counted(counts) => counts.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn placeholders(n: usize) -> String {
    (1..=n).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ")
}

/// First-seen order, duplicates dropped.
fn dedup_ids(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    let mut seen = Vec::new();
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

impl RevuService {
    /// Kept companies that reviewed this vendor, each listed once.
    ///
    /// Without a sorter the list is in id order. With one it is ascending
    /// unless `desc` is set; ties fall back to id order.
    pub async fn clients(
        &self,
        company_id: i64,
        filter: Option<OfferingKind>,
        sort: Option<ReviewableSorter>,
        desc: bool,
    ) -> Result<Vec<Company>, DatabaseError> {
        self.get_company(company_id).await?;
        let reviews = self.get_reviews_as_vendor(company_id, filter).await?;
        let ids = dedup_ids(reviews.iter().map(|review| review.reviewer_id));
        let mut clients = self.get_companies(&ids).await?;

        if let Some(sort) = sort {
            match sort {
                ReviewableSorter::ReviewsCount => clients.sort_by_key(|c| c.reviews_count),
                ReviewableSorter::CreatedAt => clients.sort_by_key(|c| c.created_at),
            }
            if desc {
                clients.reverse();
            }
        }
        Ok(clients)
    }

    /// Kept industries that this vendor's kept clients are filed under, in
    /// id order.
    pub async fn client_industries(
        &self,
        company_id: i64,
        filter: Option<OfferingKind>,
    ) -> Result<Vec<Industry>, DatabaseError> {
        self.get_company(company_id).await?;
        let reviews = self.get_reviews_as_vendor(company_id, filter).await?;
        let reviewer_ids = dedup_ids(reviews.iter().map(|review| review.reviewer_id));
        if reviewer_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {INDUSTRY_COLUMNS} FROM industries i
             WHERE i.discarded_at IS NULL AND i.id IN (
                 SELECT ic.industry_id FROM industry_companies ic
                 JOIN companies c ON c.id = ic.company_id
                 WHERE ic.discarded_at IS NULL AND c.discarded_at IS NULL
                   AND ic.company_id IN ({}))
             ORDER BY i.id",
            placeholders(reviewer_ids.len())
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(reviewer_ids.iter().copied()))
            .await?;
        let mut industries = Vec::new();
        while let Some(row) = rows.next().await? {
            industries.push(row_to_industry(&row)?);
        }
        Ok(industries)
    }

    /// Kept grants referenced by this vendor's reviews, each listed once.
    ///
    /// The `reviews_count` sorter orders grants by how many of the reviews
    /// reference them: least referenced first, or most referenced first when
    /// `desc` is set.
    pub async fn vendor_grants(
        &self,
        company_id: i64,
        filter: Option<OfferingKind>,
        sort: Option<GrantSorter>,
        desc: bool,
    ) -> Result<Vec<Grant>, DatabaseError> {
        self.get_company(company_id).await?;
        let reviews = self.get_reviews_as_vendor(company_id, filter).await?;
        let references: Vec<i64> = reviews.iter().filter_map(|review| review.grant_id).collect();
        let ids = dedup_ids(references.iter().copied());
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {GRANT_COLUMNS} FROM grants g
             WHERE g.id IN ({}) AND g.discarded_at IS NULL ORDER BY g.id",
            placeholders(ids.len())
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(ids.iter().copied()))
            .await?;
        let mut grants = Vec::new();
        while let Some(row) = rows.next().await? {
            grants.push(row_to_grant(&row)?);
        }

        if let Some(GrantSorter::ReviewsCount) = sort {
            let frequency = |grant: &Grant| references.iter().filter(|id| **id == grant.id).count();
            grants.sort_by(|a, b| frequency(b).cmp(&frequency(a)).then(a.id.cmp(&b.id)));
            if !desc {
                grants.reverse();
            }
        }
        Ok(grants)
    }

    /// Kept aspects of this vendor's reviews, optionally restricted to one
    /// verdict.
    ///
    /// With the `aspects_count` sorter, aspects are grouped by name and the
    /// groups ordered largest first; `count` selects whether each group is
    /// reported with its size or as its first aspect.
    pub async fn vendor_aspects(
        &self,
        company_id: i64,
        score: Option<Score>,
        sort: Option<AspectSorter>,
        count: bool,
    ) -> Result<VendorAspects, DatabaseError> {
        self.get_company(company_id).await?;
        let reviews = self.reviews_as_vendor(company_id, score, None).await?;
        let review_ids: Vec<i64> = reviews.iter().map(|review| review.id).collect();
        let aspects = self.kept_aspects_in_review_order(&review_ids).await?;

        let Some(AspectSorter::AspectsCount) = sort else {
            return Ok(VendorAspects::Plain(aspects));
        };

        let mut groups: Vec<AspectCount> = Vec::new();
        for aspect in aspects {
            match groups.iter_mut().find(|group| group.aspect.name == aspect.name) {
                Some(group) => group.count += 1,
                None => groups.push(AspectCount { aspect, count: 1 }),
            }
        }
        groups.sort_by(|a, b| b.count.cmp(&a.count));

        if count {
            Ok(VendorAspects::Counted(groups))
        } else {
            Ok(VendorAspects::Plain(groups.into_iter().map(|group| group.aspect).collect()))
        }
    }

    /// Kept aspects of the given reviews, grouped by review in the order
    /// given and by id within a review.
    async fn kept_aspects_in_review_order(&self, review_ids: &[i64]) -> Result<Vec<Aspect>, DatabaseError> {
        if review_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {ASPECT_COLUMNS} FROM aspects a
             WHERE a.review_id IN ({}) AND a.discarded_at IS NULL ORDER BY a.id",
            placeholders(review_ids.len())
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(review_ids.iter().copied()))
            .await?;

        let mut by_review: HashMap<i64, Vec<Aspect>> = HashMap::new();
        while let Some(row) = rows.next().await? {
            let aspect = row_to_aspect(&row)?;
            by_review.entry(aspect.review_id).or_default().push(aspect);
        }
        Ok(review_ids
            .iter()
            .filter_map(|id| by_review.remove(id))
            .flatten()
            .collect())
    }
}
