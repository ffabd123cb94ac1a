//! JSON shapes returned by the API.
//!
//! Every id is rendered as a hashid; polymorphic ends render as
//! `{"type": "Company", "id": "<hashid>"}`.

mod aspect;
mod company;
mod grant;
mod industry;
mod like;
mod offering;
mod review;

pub use aspect::{AspectCountJson, AspectJson};
pub use company::{CompanyJson, CompanyRef};
pub use grant::GrantJson;
pub use industry::{AgencyJson, IndustryJson};
pub use like::{CommentJson, LikeJson};
pub use offering::OfferingJson;
pub use review::ReviewJson;

use revu_core::enums::EntityKind;
use revu_core::hashid::HashidCodec;
use schemars::JsonSchema;
use serde::Serialize;

/// One end of a polymorphic association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct PolymorphicRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl PolymorphicRef {
    #[must_use]
    pub fn new(kind: impl Into<EntityKind>, id: i64, hashids: &HashidCodec) -> Self {
        Self {
            kind: kind.into().as_str().to_string(),
            id: hashids.encode(id),
        }
    }
}
