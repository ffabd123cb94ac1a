use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{LikeableKind, LikerKind};

/// A liker endorsing a likeable. At most one kept like per pair.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Like {
    pub id: i64,
    pub liker_type: LikerKind,
    pub liker_id: i64,
    pub likeable_type: LikeableKind,
    pub likeable_id: i64,
    pub created_at: DateTime<Utc>,
    pub discarded_at: Option<DateTime<Utc>>,
}
