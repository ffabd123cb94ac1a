//! `/companies` and the vendor statistics nested under a company.

use revu_core::enums::{EntityKind, OfferingKind, Score};
use revu_core::filters::{
    AllowList, AspectSorter, CompanySorter, GrantSorter, OfferingSorter, ReviewSorter, ReviewableSorter,
    flag_is_set,
};
use revu_db::pagination::Paged;
use revu_db::repos::stats::VendorAspects;

use super::offerings::offering_json;
use super::reviews::review_json;
use super::{location, path_id};
use crate::error::{ApiError, OrNotFound, model_key};
use crate::pagination::{page_request, paginated};
use crate::params::{CompanyParams, CompanyUpdateParams, extract};
use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::serializers::{AspectCountJson, AspectJson, CompanyJson, GrantJson, IndustryJson};
use crate::state::AppState;

const KIND: EntityKind = EntityKind::Company;

/// Read-only listings derived from a company's reviews-as-vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyStat {
    Reviews,
    Aspects,
    Clients,
    Grants,
    Offerings,
    Industries,
    ClientIndustries,
}

impl CompanyStat {
    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "reviews" => Some(Self::Reviews),
            "aspects" => Some(Self::Aspects),
            "clients" => Some(Self::Clients),
            "grants" => Some(Self::Grants),
            "offerings" => Some(Self::Offerings),
            "industries" => Some(Self::Industries),
            "client_industries" => Some(Self::ClientIndustries),
            _ => None,
        }
    }
}

/// `GET /companies?sort_by=`
pub async fn index(state: &AppState, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let sort = CompanySorter::accept(req.query("sort_by"));
    let page = page_request(req, &state.pagination);
    let companies = state.service().list_companies(sort, page).await?;
    Ok(paginated(&companies.map(|c| CompanyJson::new(&c, &state.hashids))))
}

pub async fn show(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let company = state.service().get_company(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::ok(&CompanyJson::new(&company, &state.hashids)))
}

pub async fn create(state: &AppState, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let params: CompanyParams = extract(req.json_body()?, KIND.singular(), &model_key(KIND))?;
    let company = state.service().create_company(params.into()).await?;
    let json = CompanyJson::new(&company, &state.hashids);
    Ok(ApiResponse::created(&location(KIND, &json.id), &json))
}

pub async fn update(state: &AppState, req: &ApiRequest, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let params: CompanyUpdateParams = extract(req.json_body()?, KIND.singular(), &model_key(KIND))?;
    let company = state
        .service()
        .update_company(id, params.into())
        .await
        .or_not_found_kind(KIND)?;
    Ok(ApiResponse::ok(&CompanyJson::new(&company, &state.hashids)))
}

/// Discards the company and, through the repository, its join rows.
pub async fn destroy(state: &AppState, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    state.service().discard_company(id).await.or_not_found_kind(KIND)?;
    Ok(ApiResponse::no_content())
}

/// `GET /companies/:id/{reviews,aspects,clients,grants,offerings}` and the
/// industry listings.
///
/// Filter and sort keys outside their allow-lists are ignored.
pub async fn stat(
    state: &AppState,
    req: &ApiRequest,
    raw_id: &str,
    stat: CompanyStat,
) -> Result<ApiResponse, ApiError> {
    let id = path_id(state, raw_id, KIND)?;
    let page = page_request(req, &state.pagination);
    let service = state.service();
    let hashids = &state.hashids;

    match stat {
        CompanyStat::Reviews => {
            service.get_company(id).await.or_not_found_kind(KIND)?;
            let reviews = service
                .reviews_as_vendor(
                    id,
                    Score::accept(req.query("filter_by_score")),
                    ReviewSorter::accept(req.query("sort_by")),
                )
                .await?;
            let paged = Paged::from_vec(reviews, page);
            let mut items = Vec::with_capacity(paged.items.len());
            for review in &paged.items {
                items.push(review_json(state, review).await?);
            }
            Ok(paginated(&Paged {
                items,
                total: paged.total,
                request: page,
            }))
        }
        CompanyStat::Aspects => {
            let aspects = service
                .vendor_aspects(
                    id,
                    Score::accept(req.query("filter_by_score")),
                    AspectSorter::accept(req.query("sort_by")),
                    flag_is_set(req.query("count")),
                )
                .await
                .or_not_found_kind(KIND)?;
            Ok(match aspects {
                VendorAspects::Plain(aspects) => {
                    paginated(&Paged::from_vec(aspects, page).map(|a| AspectJson::new(&a, hashids)))
                }
                VendorAspects::Counted(counts) => {
                    paginated(&Paged::from_vec(counts, page).map(|c| AspectCountJson::new(&c, hashids)))
                }
            })
        }
        CompanyStat::Clients => {
            let clients = service
                .clients(
                    id,
                    OfferingKind::accept(req.query("filter_by")),
                    ReviewableSorter::accept(req.query("sort_by")),
                    flag_is_set(req.query("desc")),
                )
                .await
                .or_not_found_kind(KIND)?;
            Ok(paginated(&Paged::from_vec(clients, page).map(|c| CompanyJson::new(&c, hashids))))
        }
        CompanyStat::Grants => {
            let grants = service
                .vendor_grants(
                    id,
                    OfferingKind::accept(req.query("filter_by")),
                    GrantSorter::accept(req.query("sort_by")),
                    flag_is_set(req.query("desc")),
                )
                .await
                .or_not_found_kind(KIND)?;
            Ok(paginated(&Paged::from_vec(grants, page).map(|g| GrantJson::new(&g, hashids))))
        }
        CompanyStat::Offerings => {
            let offerings = service
                .company_offerings(id, OfferingSorter::accept(req.query("sort_by")))
                .await
                .or_not_found_kind(KIND)?;
            let paged = Paged::from_vec(offerings, page);
            let mut items = Vec::with_capacity(paged.items.len());
            for offering in &paged.items {
                items.push(offering_json(state, offering).await?);
            }
            Ok(paginated(&Paged {
                items,
                total: paged.total,
                request: page,
            }))
        }
        CompanyStat::Industries => {
            let industries = service.company_industries(id).await.or_not_found_kind(KIND)?;
            Ok(paginated(&Paged::from_vec(industries, page).map(|i| IndustryJson::new(&i, hashids))))
        }
        CompanyStat::ClientIndustries => {
            let industries = service
                .client_industries(id, OfferingKind::accept(req.query("filter_by")))
                .await
                .or_not_found_kind(KIND)?;
            Ok(paginated(&Paged::from_vec(industries, page).map(|i| IndustryJson::new(&i, hashids))))
        }
    }
}
