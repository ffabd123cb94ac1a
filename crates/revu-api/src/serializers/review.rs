use chrono::{DateTime, Utc};
use revu_core::entities::{Aspect, Review};
use revu_core::hashid::HashidCodec;
use schemars::JsonSchema;
use serde::Serialize;

use super::{AspectJson, PolymorphicRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ReviewJson {
    pub id: String,
    /// `POSITIVE`, `NEUTRAL` or `NEGATIVE`.
    pub score: String,
    pub content: Option<String>,
    pub vendor_id: String,
    pub reviewer: PolymorphicRef,
    pub reviewable: PolymorphicRef,
    pub grant_id: Option<String>,
    pub aspects: Vec<AspectJson>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewJson {
    #[must_use]
    pub fn new(review: &Review, aspects: &[Aspect], hashids: &HashidCodec) -> Self {
        Self {
            id: hashids.encode(review.id),
            score: review.score.as_str().to_string(),
            content: review.content.clone(),
            vendor_id: hashids.encode(review.vendor_id),
            reviewer: PolymorphicRef::new(review.reviewer_type, review.reviewer_id, hashids),
            reviewable: PolymorphicRef::new(review.reviewable_type, review.reviewable_id, hashids),
            grant_id: review.grant_id.map(|id| hashids.encode(id)),
            aspects: aspects.iter().map(|a| AspectJson::new(a, hashids)).collect(),
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}
