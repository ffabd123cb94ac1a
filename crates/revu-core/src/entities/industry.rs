use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A business sector companies can be filed under.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Industry {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub discarded_at: Option<DateTime<Utc>>,
}

/// Join row filing a company under an industry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IndustryCompany {
    pub id: i64,
    pub industry_id: i64,
    pub company_id: i64,
    pub created_at: DateTime<Utc>,
    pub discarded_at: Option<DateTime<Utc>>,
}
