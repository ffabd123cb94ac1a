//! Reviews of products, services and projects.

use revu_core::entities::Review;
use revu_core::enums::{EntityKind, OfferingKind, ReviewerKind, Score};
use revu_core::validation::{self, ValidationErrors};
use revu_db::pagination::{PageRequest, Paged};
use revu_db::repos::aspect::NewAspect;
use revu_db::repos::review::NewReview;
use revu_db::updates::review::ReviewUpdate;

use super::{location, path_id};
use crate::error::{ApiError, OrNotFound, model_key};
use crate::i18n::t;
use crate::pagination::{page_request, paginated};
use crate::params::{ReviewParams, ReviewUpdateParams, ScoreParam, extract};
use crate::request::ApiRequest;
use crate::resolver::{classify_role, decode_id};
use crate::response::ApiResponse;
use crate::serializers::ReviewJson;
use crate::state::AppState;

const KIND: EntityKind = EntityKind::Review;

/// Render a review with its kept aspects.
pub(crate) async fn review_json(state: &AppState, review: &Review) -> Result<ReviewJson, ApiError> {
    let aspects = state
        .service()
        .list_review_aspects(review.id, PageRequest::All)
        .await?;
    Ok(ReviewJson::new(review, &aspects.items, &state.hashids))
}

/// A given score must be a known label or value; an absent one is left to
/// the repository's presence check.
fn parse_score(score: Option<&ScoreParam>) -> Result<Option<Score>, ApiError> {
    match score {
        None => Ok(None),
        Some(param) => param
            .to_score()
            .map(Some)
            .ok_or_else(|| ApiError::Validation(ValidationErrors::single("score", validation::INVALID))),
    }
}

/// An undecodable grant hashid is a field error, like a discarded grant.
fn parse_grant(state: &AppState, raw: &str) -> Result<i64, ApiError> {
    state
        .hashids
        .decode(raw.trim())
        .ok_or_else(|| ApiError::Validation(ValidationErrors::single("grant_id", validation::INVALID)))
}

pub async fn index(
    state: &AppState,
    req: &ApiRequest,
    kind: OfferingKind,
    raw_offering_id: &str,
) -> Result<ApiResponse, ApiError> {
    let offering_id = path_id(state, raw_offering_id, kind.kind())?;
    let page = page_request(req, &state.pagination);
    let reviews = state
        .service()
        .list_offering_reviews(kind, offering_id, page)
        .await
        .or_not_found_kind(kind.kind())?;

    let mut items = Vec::with_capacity(reviews.items.len());
    for review in &reviews.items {
        items.push(review_json(state, review).await?);
    }
    Ok(paginated(&Paged {
        items,
        total: reviews.total,
        request: reviews.request,
    }))
}

/// `POST /{products,services,projects}/:id/reviews`
pub async fn create(
    state: &AppState,
    req: &ApiRequest,
    kind: OfferingKind,
    raw_offering_id: &str,
) -> Result<ApiResponse, ApiError> {
    let params: ReviewParams = extract(req.json_body()?, KIND.singular(), &model_key(KIND))?;
    let (from_type, from_id) = params.actor.require()?;
    let reviewer_kind: ReviewerKind = classify_role(from_type, &t("general_error.from_type_key"))?;
    let raw_vendor_id = params
        .vendor_id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::missing("vendor_id"))?;

    let service = state.service();
    let offering_id = path_id(state, raw_offering_id, kind.kind())?;
    service
        .get_offering(kind, offering_id)
        .await
        .or_not_found_kind(kind.kind())?;

    let vendor_id = decode_id(&state.hashids, raw_vendor_id, "vendor_id")?;
    service.get_company(vendor_id).await.or_not_found("vendor_id")?;

    let from_id_key = t("general_error.from_id_key");
    let reviewer_id = decode_id(&state.hashids, from_id, &from_id_key)?;
    service
        .ensure_kept(reviewer_kind.kind(), reviewer_id)
        .await
        .or_not_found(from_id_key)?;

    let score = parse_score(params.score.as_ref())?;
    let grant_id = params
        .grant_id
        .as_deref()
        .filter(|g| !g.trim().is_empty())
        .map(|raw| parse_grant(state, raw))
        .transpose()?;

    let review = service
        .create_review(NewReview {
            score,
            content: params.content,
            vendor_id,
            reviewer: (reviewer_kind, reviewer_id),
            reviewable: (kind, offering_id),
            grant_id,
            aspects: params.aspects.into_iter().map(NewAspect::from).collect(),
        })
        .await?;
    let json = review_json(state, &review).await?;
    Ok(ApiResponse::created(&location(KIND, &json.id), &json))
}

pub async fn show(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let review = state.service().get_review(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::ok(&review_json(state, &review).await?))
}

/// Score, content and grant are editable; vendor, reviewer and reviewable
/// are fixed at creation.
pub async fn update(state: &AppState, req: &ApiRequest, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let params: ReviewUpdateParams = extract(req.json_body()?, KIND.singular(), &model_key(KIND))?;

    let grant_id = match params.grant_id {
        None => None,
        Some(None) => Some(None),
        Some(Some(raw)) if raw.trim().is_empty() => Some(None),
        Some(Some(raw)) => Some(Some(parse_grant(state, &raw)?)),
    };
    let update = ReviewUpdate {
        score: parse_score(params.score.as_ref())?,
        content: params.content,
        grant_id,
    };
    let review = state
        .service()
        .update_review(id, update)
        .await
        .or_not_found_kind(KIND)?;
    Ok(ApiResponse::ok(&review_json(state, &review).await?))
}

/// Discarding a review refreshes the vendor's count and aggregate score.
pub async fn destroy(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    state.service().discard_review(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::no_content())
}
