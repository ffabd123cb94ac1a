use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A public agency, listed with its contact details.
///
/// `kind` is a free-form label such as "statutory board".
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Agency {
    pub id: i64,
    pub name: String,
    pub acronym: Option<String>,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub discarded_at: Option<DateTime<Utc>>,
}
