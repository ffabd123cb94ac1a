use chrono::{DateTime, Utc};
use revu_core::entities::Company;
use revu_core::hashid::HashidCodec;
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct CompanyJson {
    pub id: String,
    pub name: String,
    pub uen: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub aggregate_score: f64,
    pub reviews_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyJson {
    #[must_use]
    pub fn new(company: &Company, hashids: &HashidCodec) -> Self {
        Self {
            id: hashids.encode(company.id),
            name: company.name.clone(),
            uen: company.uen.clone(),
            description: company.description.clone(),
            url: company.url.clone(),
            image: company.image.clone(),
            aggregate_score: company.aggregate_score,
            reviews_count: company.reviews_count,
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }
}

/// Short form of a company nested inside another record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CompanyRef {
    pub id: String,
    pub name: String,
}

impl CompanyRef {
    #[must_use]
    pub fn new(company: &Company, hashids: &HashidCodec) -> Self {
        Self {
            id: hashids.encode(company.id),
            name: company.name.clone(),
        }
    }
}
