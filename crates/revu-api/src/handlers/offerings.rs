//! Products, services and projects.
//!
//! Collections are nested under the selling company
//! (`/companies/:id/services`); members are addressed directly
//! (`/services/:id`).

use revu_core::entities::Offering;
use revu_core::enums::{EntityKind, OfferingKind};
use revu_db::pagination::Paged;

use super::{location, path_id};
use crate::error::{ApiError, OrNotFound, model_key};
use crate::pagination::{page_request, paginated};
use crate::params::{OfferingParams, OfferingUpdateParams, extract};
use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::serializers::OfferingJson;
use crate::state::AppState;

/// Render an offering with the kept companies selling it.
pub(crate) async fn offering_json(state: &AppState, offering: &Offering) -> Result<OfferingJson, ApiError> {
    let companies = state.service().offering_companies(offering.kind, offering.id).await?;
    Ok(OfferingJson::new(offering, &companies, &state.hashids))
}

pub async fn index(
    state: &AppState,
    req: &ApiRequest,
    raw_company_id: &str,
    kind: OfferingKind,
) -> Result<ApiResponse, ApiError> {
    let company_id = path_id(state, raw_company_id, EntityKind::Company)?;
    let page = page_request(req, &state.pagination);
    let offerings = state
        .service()
        .list_company_offerings(company_id, kind, page)
        .await
        .or_not_found_kind(EntityKind::Company)?;

    let mut items = Vec::with_capacity(offerings.items.len());
    for offering in &offerings.items {
        items.push(offering_json(state, offering).await?);
    }
    Ok(paginated(&Paged {
        items,
        total: offerings.total,
        request: offerings.request,
    }))
}

pub async fn create(
    state: &AppState,
    req: &ApiRequest,
    raw_company_id: &str,
    kind: OfferingKind,
) -> Result<ApiResponse, ApiError> {
    let company_id = path_id(state, raw_company_id, EntityKind::Company)?;
    let params: OfferingParams = extract(req.json_body()?, kind.kind().singular(), &model_key(kind.kind()))?;
    let offering = state
        .service()
        .create_offering(company_id, kind, params.into())
        .await
        .or_not_found_kind(EntityKind::Company)?;
    let json = offering_json(state, &offering).await?;
    Ok(ApiResponse::created(&location(kind.kind(), &json.id), &json))
}

pub async fn show(state: &AppState, kind: OfferingKind, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, kind.kind())?;
    let offering = state
        .service()
        .get_offering(kind, id)
        .await
        .or_not_found_kind(kind.kind())?;
    Ok(ApiResponse::ok(&offering_json(state, &offering).await?))
}

pub async fn update(
    state: &AppState,
    req: &ApiRequest,
    kind: OfferingKind,
    raw_id: &str,
) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, kind.kind())?;
    let params: OfferingUpdateParams = extract(req.json_body()?, kind.kind().singular(), &model_key(kind.kind()))?;
    let offering = state
        .service()
        .update_offering(kind, id, params.into())
        .await
        .or_not_found_kind(kind.kind())?;
    Ok(ApiResponse::ok(&offering_json(state, &offering).await?))
}

pub async fn destroy(state: &AppState, kind: OfferingKind, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, kind.kind())?;
    state
        .service()
        .discard_offering(kind, id)
        .await
        .or_not_found_kind(kind.kind())?;
    Ok(ApiResponse::no_content())
}

/// `PUT /companies/:id/{products,services,projects}/:offering_id`
///
/// Adds the company as a seller of an existing offering.
pub async fn link(
    state: &AppState,
    raw_company_id: &str,
    kind: OfferingKind,
    raw_id: &str,
) -> Result<ApiResponse, ApiError> {
    let company_id = path_id(state, raw_company_id, EntityKind::Company)?;
    let id = path_id(state, raw_id, kind.kind())?;
    let service = state.service();
    service
        .get_company(company_id)
        .await
        .or_not_found_kind(EntityKind::Company)?;
    service
        .link_offering(company_id, kind, id)
        .await
        .or_not_found_kind(kind.kind())?;

    let offering = service.get_offering(kind, id).await.or_not_found_kind(kind.kind())?;
    Ok(ApiResponse::ok(&offering_json(state, &offering).await?))
}

/// `DELETE /companies/:id/{products,services,projects}/:offering_id`
pub async fn unlink(
    state: &AppState,
    raw_company_id: &str,
    kind: OfferingKind,
    raw_id: &str,
) -> Result<ApiResponse, ApiError> {
    let company_id = path_id(state, raw_company_id, EntityKind::Company)?;
    let id = path_id(state, raw_id, kind.kind())?;
    let service = state.service();
    service
        .get_company(company_id)
        .await
        .or_not_found_kind(EntityKind::Company)?;
    service
        .unlink_offering(company_id, kind, id)
        .await
        .or_not_found_kind(kind.kind())?;
    Ok(ApiResponse::no_content())
}
