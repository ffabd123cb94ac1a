//! Comments on reviews. Creation follows the same ordered checks as likes,
//! then requires `content`.

use revu_core::enums::{CommentableKind, CommenterKind, EntityKind};

use super::{location, path_id};
use crate::error::{ApiError, OrNotFound, model_key};
use crate::i18n::t;
use crate::pagination::{page_request, paginated};
use crate::params::{CommentParams, CommentUpdateParams, extract};
use crate::request::ApiRequest;
use crate::resolver::{classify_role, decode_id};
use crate::response::ApiResponse;
use crate::serializers::CommentJson;
use crate::state::AppState;

const KIND: EntityKind = EntityKind::Comment;

/// `POST /reviews/:review_id/comments`
pub async fn create(state: &AppState, req: &ApiRequest, raw_review_id: &str) -> Result<ApiResponse, ApiError> {
    let params: CommentParams = extract(req.json_body()?, KIND.singular(), &model_key(KIND))?;
    let (from_type, from_id) = params.actor.require()?;
    let commenter_kind: CommenterKind = classify_role(from_type, &t("general_error.from_type_key"))?;

    let service = state.service();
    let review_id = path_id(state, raw_review_id, EntityKind::Review)?;
    service
        .ensure_kept(EntityKind::Review, review_id)
        .await
        .or_not_found_kind(EntityKind::Review)?;

    let from_id_key = t("general_error.from_id_key");
    let commenter_id = decode_id(&state.hashids, from_id, &from_id_key)?;
    service
        .ensure_kept(commenter_kind.kind(), commenter_id)
        .await
        .or_not_found(from_id_key)?;

    let comment = service
        .create_comment(
            commenter_kind,
            commenter_id,
            CommentableKind::Review,
            review_id,
            params.content,
        )
        .await?;
    let json = CommentJson::new(&comment, &state.hashids);
    Ok(ApiResponse::created(&location(KIND, &json.id), &json))
}

pub async fn index(state: &AppState, req: &ApiRequest, raw_review_id: &str) -> Result<ApiResponse, ApiError> {
    let review_id = path_id(state, raw_review_id, EntityKind::Review)?;
    let page = page_request(req, &state.pagination);
    let comments = state
        .service()
        .list_comments(CommentableKind::Review, review_id, page)
        .await
        .or_not_found_kind(EntityKind::Review)?;
    Ok(paginated(&comments.map(|c| CommentJson::new(&c, &state.hashids))))
}

pub async fn show(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let comment = state.service().get_comment(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::ok(&CommentJson::new(&comment, &state.hashids)))
}

pub async fn update(state: &AppState, req: &ApiRequest, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let params: CommentUpdateParams = extract(req.json_body()?, KIND.singular(), &model_key(KIND))?;
    let comment = state
        .service()
        .update_comment(id, params.into())
        .await
        .or_not_found_kind(KIND)?;
    Ok(ApiResponse::ok(&CommentJson::new(&comment, &state.hashids)))
}

pub async fn destroy(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    state.service().discard_comment(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::no_content())
}
