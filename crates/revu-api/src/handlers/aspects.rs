use revu_core::enums::EntityKind;

use super::{location, path_id};
use crate::error::{ApiError, OrNotFound, model_key};
use crate::pagination::{page_request, paginated};
use crate::params::{AspectParams, AspectUpdateParams, extract};
use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::serializers::AspectJson;
use crate::state::AppState;

const KIND: EntityKind = EntityKind::Aspect;

pub async fn index(state: &AppState, req: &ApiRequest, raw_review_id: &str) -> Result<ApiResponse, ApiError> {
    let review_id = path_id(state, raw_review_id, EntityKind::Review)?;
    let page = page_request(req, &state.pagination);
    let aspects = state
        .service()
        .list_review_aspects(review_id, page)
        .await
        .or_not_found_kind(EntityKind::Review)?;
    Ok(paginated(&aspects.map(|a| AspectJson::new(&a, &state.hashids))))
}

pub async fn create(state: &AppState, req: &ApiRequest, raw_review_id: &str) -> Result<ApiResponse, ApiError> {
    let review_id = path_id(state, raw_review_id, EntityKind::Review)?;
    let params: AspectParams = extract(req.json_body()?, KIND.singular(), &model_key(KIND))?;
    let aspect = state
        .service()
        .create_aspect(review_id, params.into())
        .await
        .or_not_found_kind(EntityKind::Review)?;
    let json = AspectJson::new(&aspect, &state.hashids);
    Ok(ApiResponse::created(&location(KIND, &json.id), &json))
}

pub async fn show(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let aspect = state.service().get_aspect(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::ok(&AspectJson::new(&aspect, &state.hashids)))
}

pub async fn update(state: &AppState, req: &ApiRequest, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let params: AspectUpdateParams = extract(req.json_body()?, KIND.singular(), &model_key(KIND))?;
    let aspect = state
        .service()
        .update_aspect(id, params.into())
        .await
        .or_not_found_kind(KIND)?;
    Ok(ApiResponse::ok(&AspectJson::new(&aspect, &state.hashids)))
}

pub async fn destroy(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    state.service().discard_aspect(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::no_content())
}
