use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A vendor and/or reviewer organisation.
///
/// `reviews_count` counts kept reviews naming this company as vendor;
/// `aggregate_score` is derived from its reviews-as-vendor. Both are
/// recomputed by the service layer, never written by clients.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub uen: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub aggregate_score: f64,
    pub reviews_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub discarded_at: Option<DateTime<Utc>>,
}
