use revu_core::enums::EntityKind;

use super::{location, path_id};
use crate::error::{ApiError, OrNotFound, model_key};
use crate::pagination::{page_request, paginated};
use crate::params::{AgencyParams, AgencyUpdateParams, extract};
use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::serializers::AgencyJson;
use crate::state::AppState;

const KIND: EntityKind = EntityKind::Agency;

pub async fn index(state: &AppState, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let page = page_request(req, &state.pagination);
    let agencies = state.service().list_agencies(page).await?;
    Ok(paginated(&agencies.map(|a| AgencyJson::new(&a, &state.hashids))))
}

pub async fn create(state: &AppState, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let params: AgencyParams = extract(req.json_body()?, KIND.singular(), &model_key(KIND))?;
    let agency = state.service().create_agency(params.into()).await?;
    let json = AgencyJson::new(&agency, &state.hashids);
    Ok(ApiResponse::created(&location(KIND, &json.id), &json))
}

pub async fn show(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let agency = state.service().get_agency(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::ok(&AgencyJson::new(&agency, &state.hashids)))
}

pub async fn update(state: &AppState, req: &ApiRequest, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let params: AgencyUpdateParams = extract(req.json_body()?, KIND.singular(), &model_key(KIND))?;
    let agency = state
        .service()
        .update_agency(id, params.into())
        .await
        .or_not_found_kind(KIND)?;
    Ok(ApiResponse::ok(&AgencyJson::new(&agency, &state.hashids)))
}

pub async fn destroy(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    state.service().discard_agency(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::no_content())
}
