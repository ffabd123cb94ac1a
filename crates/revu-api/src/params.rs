//! Request body DTOs.
//!
//! Each body nests its attributes under one root key (`{"like": {...}}`).
//! Only the fields declared here are read; anything else in the body is
//! ignored. Ids are hashids and stay strings until a handler decodes them.

use revu_core::enums::Score;
use revu_db::repos::agency::NewAgency;
use revu_db::repos::aspect::NewAspect;
use revu_db::repos::company::NewCompany;
use revu_db::repos::grant::NewGrant;
use revu_db::repos::industry::NewIndustry;
use revu_db::repos::offering::NewOffering;
use revu_db::updates::agency::AgencyUpdate;
use revu_db::updates::aspect::AspectUpdate;
use revu_db::updates::comment::CommentUpdate;
use revu_db::updates::company::CompanyUpdate;
use revu_db::updates::grant::GrantUpdate;
use revu_db::updates::industry::IndustryUpdate;
use revu_db::updates::offering::OfferingUpdate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ApiError;
use crate::i18n::t;

/// Extract and deserialize the attributes under `root`.
///
/// A missing body, or a root that is missing, `null` or an empty object, is
/// `MissingParameter` naming `model`; attributes of the wrong shape are `InvalidParameter`
/// under `root`.
///
/// # Errors
///
/// See above.
pub fn extract<T: DeserializeOwned>(body: Option<Value>, root: &str, model: &str) -> Result<T, ApiError> {
    let attrs = body
        .and_then(|mut body| body.get_mut(root).map(Value::take))
        .filter(|attrs| !is_blank(attrs))
        .ok_or_else(|| ApiError::missing(model))?;
    serde_json::from_value(attrs).map_err(|e| {
        tracing::debug!(root, error = %e, "rejected request attributes");
        ApiError::invalid(root)
    })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Present and non-blank.
fn given(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Accept an id as a string or a bare number.
fn lenient_id<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_nullable_id<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_id(de).map(Some)
}

// ---------------------------------------------------------------------------
// Polymorphic actor
// ---------------------------------------------------------------------------

/// The `from_type`/`from_id` pair naming who acts (liker, commenter,
/// reviewer).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorParams {
    #[serde(default)]
    pub from_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub from_id: Option<String>,
}

impl ActorParams {
    /// Both halves, or `MissingParameter` naming the pair.
    ///
    /// # Errors
    ///
    /// `MissingParameter { model: "from_id/from_type" }` when either is
    /// absent or blank.
    pub fn require(&self) -> Result<(&str, &str), ApiError> {
        match (given(self.from_type.as_deref()), given(self.from_id.as_deref())) {
            (Some(from_type), Some(from_id)) => Ok((from_type, from_id)),
            _ => Err(ApiError::missing(format!(
                "{}/{}",
                t("general_error.from_id_key"),
                t("general_error.from_type_key")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Likes and comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LikeParams {
    #[serde(flatten)]
    pub actor: ActorParams,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentParams {
    #[serde(flatten)]
    pub actor: ActorParams,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentUpdateParams {
    #[serde(default)]
    pub content: Option<String>,
}

impl From<CommentUpdateParams> for CommentUpdate {
    fn from(params: CommentUpdateParams) -> Self {
        Self { content: params.content }
    }
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// A score given as its label (`"POSITIVE"`) or value (`1`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ScoreParam {
    Value(i64),
    Label(String),
}

impl ScoreParam {
    #[must_use]
    pub fn to_score(&self) -> Option<Score> {
        match self {
            Self::Value(value) => Score::from_value(*value),
            Self::Label(label) => Score::parse(label),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewParams {
    #[serde(flatten)]
    pub actor: ActorParams,
    #[serde(default)]
    pub score: Option<ScoreParam>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub vendor_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub grant_id: Option<String>,
    #[serde(default)]
    pub aspects: Vec<AspectParams>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewUpdateParams {
    #[serde(default)]
    pub score: Option<ScoreParam>,
    #[serde(default, deserialize_with = "double_option")]
    pub content: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient_nullable_id")]
    pub grant_id: Option<Option<String>>,
}

// ---------------------------------------------------------------------------
// Companies and offerings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub uen: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<CompanyParams> for NewCompany {
    fn from(params: CompanyParams) -> Self {
        Self {
            name: params.name,
            uen: params.uen,
            description: params.description,
            url: params.url,
            image: params.image,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyUpdateParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub uen: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
}

impl From<CompanyUpdateParams> for CompanyUpdate {
    fn from(params: CompanyUpdateParams) -> Self {
        Self {
            name: params.name,
            uen: params.uen,
            description: params.description,
            url: params.url,
            image: params.image,
        }
    }
}

/// Body of a product, service or project. The root key is the singular
/// kind (`{"service": {...}}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferingParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<OfferingParams> for NewOffering {
    fn from(params: OfferingParams) -> Self {
        Self {
            name: params.name,
            description: params.description,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferingUpdateParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl From<OfferingUpdateParams> for OfferingUpdate {
    fn from(params: OfferingUpdateParams) -> Self {
        Self {
            name: params.name,
            description: params.description,
        }
    }
}

// ---------------------------------------------------------------------------
// Aspects and grants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AspectParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<AspectParams> for NewAspect {
    fn from(params: AspectParams) -> Self {
        Self {
            name: params.name,
            description: params.description,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AspectUpdateParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl From<AspectUpdateParams> for AspectUpdate {
    fn from(params: AspectUpdateParams) -> Self {
        Self {
            name: params.name,
            description: params.description,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrantParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub acronym: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<GrantParams> for NewGrant {
    fn from(params: GrantParams) -> Self {
        Self {
            name: params.name,
            acronym: params.acronym,
            description: params.description,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrantUpdateParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub acronym: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl From<GrantUpdateParams> for GrantUpdate {
    fn from(params: GrantUpdateParams) -> Self {
        Self {
            name: params.name,
            acronym: params.acronym,
            description: params.description,
        }
    }
}

// ---------------------------------------------------------------------------
// Industries and agencies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndustryParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<IndustryParams> for NewIndustry {
    fn from(params: IndustryParams) -> Self {
        Self {
            name: params.name,
            description: params.description,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndustryUpdateParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl From<IndustryUpdateParams> for IndustryUpdate {
    fn from(params: IndustryUpdateParams) -> Self {
        Self {
            name: params.name,
            description: params.description,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgencyParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub acronym: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<AgencyParams> for NewAgency {
    fn from(params: AgencyParams) -> Self {
        Self {
            name: params.name,
            acronym: params.acronym,
            kind: params.kind,
            description: params.description,
            phone_number: params.phone_number,
            email: params.email,
            image: params.image,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgencyUpdateParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub acronym: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub kind: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
}

impl From<AgencyUpdateParams> for AgencyUpdate {
    fn from(params: AgencyUpdateParams) -> Self {
        Self {
            name: params.name,
            acronym: params.acronym,
            kind: params.kind,
            description: params.description,
            phone_number: params.phone_number,
            email: params.email,
            image: params.image,
        }
    }
}
