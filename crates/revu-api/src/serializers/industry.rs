use chrono::{DateTime, Utc};
use revu_core::entities::{Agency, Industry};
use revu_core::hashid::HashidCodec;
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct IndustryJson {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl IndustryJson {
    #[must_use]
    pub fn new(industry: &Industry, hashids: &HashidCodec) -> Self {
        Self {
            id: hashids.encode(industry.id),
            name: industry.name.clone(),
            description: industry.description.clone(),
            created_at: industry.created_at,
        }
    }
}

/// An agency with its contact details. `image` is the logo URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AgencyJson {
    pub id: String,
    pub name: String,
    pub acronym: Option<String>,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AgencyJson {
    #[must_use]
    pub fn new(agency: &Agency, hashids: &HashidCodec) -> Self {
        Self {
            id: hashids.encode(agency.id),
            name: agency.name.clone(),
            acronym: agency.acronym.clone(),
            kind: agency.kind.clone(),
            description: agency.description.clone(),
            phone_number: agency.phone_number.clone(),
            email: agency.email.clone(),
            image: agency.image.clone(),
            created_at: agency.created_at,
        }
    }
}
