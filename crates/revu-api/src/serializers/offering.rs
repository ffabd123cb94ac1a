use chrono::{DateTime, Utc};
use revu_core::entities::{Company, Offering};
use revu_core::hashid::HashidCodec;
use schemars::JsonSchema;
use serde::Serialize;

use super::CompanyRef;

/// A product, service or project together with the companies selling it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct OfferingJson {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub reviews_count: i64,
    pub companies: Vec<CompanyRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OfferingJson {
    #[must_use]
    pub fn new(offering: &Offering, companies: &[Company], hashids: &HashidCodec) -> Self {
        Self {
            kind: offering.kind.as_str().to_string(),
            id: hashids.encode(offering.id),
            name: offering.name.clone(),
            description: offering.description.clone(),
            reviews_count: offering.reviews_count,
            companies: companies.iter().map(|c| CompanyRef::new(c, hashids)).collect(),
            created_at: offering.created_at,
            updated_at: offering.updated_at,
        }
    }
}
