use chrono::{DateTime, Utc};
use revu_core::entities::Grant;
use revu_core::hashid::HashidCodec;
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct GrantJson {
    pub id: String,
    pub name: String,
    pub acronym: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GrantJson {
    #[must_use]
    pub fn new(grant: &Grant, hashids: &HashidCodec) -> Self {
        Self {
            id: hashids.encode(grant.id),
            name: grant.name.clone(),
            acronym: grant.acronym.clone(),
            description: grant.description.clone(),
            created_at: grant.created_at,
        }
    }
}
