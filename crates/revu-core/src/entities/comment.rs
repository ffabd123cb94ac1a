use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{CommentableKind, CommenterKind};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub commenter_type: CommenterKind,
    pub commenter_id: i64,
    pub commentable_type: CommentableKind,
    pub commentable_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub discarded_at: Option<DateTime<Utc>>,
}
