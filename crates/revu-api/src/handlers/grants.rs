use revu_core::enums::EntityKind;

use super::{location, path_id};
use crate::error::{ApiError, OrNotFound, model_key};
use crate::pagination::{page_request, paginated};
use crate::params::{GrantParams, GrantUpdateParams, extract};
use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::serializers::GrantJson;
use crate::state::AppState;

const KIND: EntityKind = EntityKind::Grant;

pub async fn index(state: &AppState, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let page = page_request(req, &state.pagination);
    let grants = state.service().list_grants(page).await?;
    Ok(paginated(&grants.map(|g| GrantJson::new(&g, &state.hashids))))
}

pub async fn create(state: &AppState, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let params: GrantParams = extract(req.json_body()?, KIND.singular(), &model_key(KIND))?;
    let grant = state.service().create_grant(params.into()).await?;
    let json = GrantJson::new(&grant, &state.hashids);
    Ok(ApiResponse::created(&location(KIND, &json.id), &json))
}

pub async fn show(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let grant = state.service().get_grant(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::ok(&GrantJson::new(&grant, &state.hashids)))
}

pub async fn update(state: &AppState, req: &ApiRequest, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let params: GrantUpdateParams = extract(req.json_body()?, KIND.singular(), &model_key(KIND))?;
    let grant = state
        .service()
        .update_grant(id, params.into())
        .await
        .or_not_found_kind(KIND)?;
    Ok(ApiResponse::ok(&GrantJson::new(&grant, &state.hashids)))
}

pub async fn destroy(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    state.service().discard_grant(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::no_content())
}
