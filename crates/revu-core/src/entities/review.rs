use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{OfferingKind, ReviewerKind, Score};

/// A verdict on an offering, written by a reviewer about a vendor company.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Review {
    pub id: i64,
    pub score: Score,
    pub content: Option<String>,
    pub vendor_id: i64,
    pub reviewer_type: ReviewerKind,
    pub reviewer_id: i64,
    pub reviewable_type: OfferingKind,
    pub reviewable_id: i64,
    pub grant_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub discarded_at: Option<DateTime<Utc>>,
}
