//! Likes on reviews and comments.
//!
//! Creation checks run in a fixed order and stop at the first failure:
//! parameters present, liker type acceptable, likeable kept, liker kept,
//! then the write. Nothing touches the database until the parameters have
//! been checked.

use revu_core::enums::{EntityKind, LikeableKind, LikerKind};

use super::{location, path_id};
use crate::error::{ApiError, OrNotFound};
use crate::i18n::t;
use crate::pagination::{page_request, paginated};
use crate::params::{LikeParams, extract};
use crate::request::ApiRequest;
use crate::resolver::{classify_role, decode_id};
use crate::response::ApiResponse;
use crate::serializers::LikeJson;
use crate::state::AppState;

const KIND: EntityKind = EntityKind::Like;

/// `POST /{reviews,comments}/:id/likes`
pub async fn create(
    state: &AppState,
    req: &ApiRequest,
    likeable_kind: LikeableKind,
    raw_likeable_id: &str,
) -> Result<ApiResponse, ApiError> {
    let params: LikeParams = extract(req.json_body()?, KIND.singular(), &t("like.key_id"))?;
    let (from_type, from_id) = params.actor.require()?;
    let liker_kind: LikerKind = classify_role(from_type, &t("general_error.from_type_key"))?;

    let service = state.service();
    let likeable_id = path_id(state, raw_likeable_id, likeable_kind.kind())?;
    service
        .ensure_kept(likeable_kind.kind(), likeable_id)
        .await
        .or_not_found_kind(likeable_kind.kind())?;

    let from_id_key = t("general_error.from_id_key");
    let liker_id = decode_id(&state.hashids, from_id, &from_id_key)?;
    service
        .ensure_kept(liker_kind.kind(), liker_id)
        .await
        .or_not_found(from_id_key)?;

    let like = service
        .create_like(liker_kind, liker_id, likeable_kind, likeable_id)
        .await?;
    let json = LikeJson::new(&like, &state.hashids);
    tracing::debug!(like = %json.id, likeable = %likeable_kind, "like recorded");
    Ok(ApiResponse::created(&location(KIND, &json.id), &json))
}

pub async fn index(
    state: &AppState,
    req: &ApiRequest,
    likeable_kind: LikeableKind,
    raw_likeable_id: &str,
) -> Result<ApiResponse, ApiError> {
    let likeable_id = path_id(state, raw_likeable_id, likeable_kind.kind())?;
    let page = page_request(req, &state.pagination);
    let likes = state
        .service()
        .list_likes(likeable_kind, likeable_id, page)
        .await
        .or_not_found_kind(likeable_kind.kind())?;
    Ok(paginated(&likes.map(|l| LikeJson::new(&l, &state.hashids))))
}

pub async fn show(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let like = state.service().get_like(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::ok(&LikeJson::new(&like, &state.hashids)))
}

pub async fn destroy(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    state.service().discard_like(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::no_content())
}
