//! `/industries` and the company/industry links.

use revu_core::enums::EntityKind;

use super::{location, path_id};
use crate::error::{ApiError, OrNotFound, model_key};
use crate::pagination::{page_request, paginated};
use crate::params::{IndustryParams, IndustryUpdateParams, extract};
use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::serializers::{CompanyJson, IndustryJson};
use crate::state::AppState;

const KIND: EntityKind = EntityKind::Industry;

pub async fn index(state: &AppState, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let page = page_request(req, &state.pagination);
    let industries = state.service().list_industries(page).await?;
    Ok(paginated(&industries.map(|i| IndustryJson::new(&i, &state.hashids))))
}

pub async fn create(state: &AppState, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let params: IndustryParams = extract(req.json_body()?, KIND.singular(), &model_key(KIND))?;
    let industry = state.service().create_industry(params.into()).await?;
    let json = IndustryJson::new(&industry, &state.hashids);
    Ok(ApiResponse::created(&location(KIND, &json.id), &json))
}

pub async fn show(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let industry = state.service().get_industry(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::ok(&IndustryJson::new(&industry, &state.hashids)))
}

pub async fn update(state: &AppState, req: &ApiRequest, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let params: IndustryUpdateParams = extract(req.json_body()?, KIND.singular(), &model_key(KIND))?;
    let industry = state
        .service()
        .update_industry(id, params.into())
        .await
        .or_not_found_kind(KIND)?;
    Ok(ApiResponse::ok(&IndustryJson::new(&industry, &state.hashids)))
}

pub async fn destroy(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    state.service().discard_industry(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::no_content())
}

/// `GET /industries/:id/companies`
pub async fn companies(state: &AppState, req: &ApiRequest, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let page = page_request(req, &state.pagination);
    let companies = state
        .service()
        .industry_companies(id, page)
        .await
        .or_not_found_kind(KIND)?;
    Ok(paginated(&companies.map(|c| CompanyJson::new(&c, &state.hashids))))
}

/// `PUT /companies/:id/industries/:industry_id`, answered with the
/// company's industries.
pub async fn link(state: &AppState, raw_company_id: &str, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let company_id = path_id(state, raw_company_id, EntityKind::Company)?;
    let id = path_id(state, raw_id, KIND)?;
    let service = state.service();
    service
        .get_company(company_id)
        .await
        .or_not_found_kind(EntityKind::Company)?;
    service.link_industry(company_id, id).await.or_not_found_kind(KIND)?;

    let industries = service.company_industries(company_id).await?;
    let json: Vec<_> = industries.iter().map(|i| IndustryJson::new(i, &state.hashids)).collect();
    Ok(ApiResponse::ok(&json))
}

/// `DELETE /companies/:id/industries/:industry_id`
pub async fn unlink(state: &AppState, raw_company_id: &str, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let company_id = path_id(state, raw_company_id, EntityKind::Company)?;
    let id = path_id(state, raw_id, KIND)?;
    let service = state.service();
    service
        .get_company(company_id)
        .await
        .or_not_found_kind(EntityKind::Company)?;
    service.unlink_industry(company_id, id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::no_content())
}
