use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::OfferingKind;

/// Join row linking a company to an offering it sells.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompanyReviewable {
    pub id: i64,
    pub company_id: i64,
    pub reviewable_type: OfferingKind,
    pub reviewable_id: i64,
    pub created_at: DateTime<Utc>,
    pub discarded_at: Option<DateTime<Utc>>,
}
