use chrono::{DateTime, Utc};
use revu_core::entities::Aspect;
use revu_core::hashid::HashidCodec;
use revu_db::repos::stats::AspectCount;
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AspectJson {
    pub id: String,
    pub review_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AspectJson {
    #[must_use]
    pub fn new(aspect: &Aspect, hashids: &HashidCodec) -> Self {
        Self {
            id: hashids.encode(aspect.id),
            review_id: hashids.encode(aspect.review_id),
            name: aspect.name.clone(),
            description: aspect.description.clone(),
            created_at: aspect.created_at,
        }
    }
}

/// An aspect name and how many vendor reviews mention it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AspectCountJson {
    pub aspect: AspectJson,
    pub count: u64,
}

impl AspectCountJson {
    #[must_use]
    pub fn new(counted: &AspectCount, hashids: &HashidCodec) -> Self {
        Self {
            aspect: AspectJson::new(&counted.aspect, hashids),
            count: counted.count,
        }
    }
}
