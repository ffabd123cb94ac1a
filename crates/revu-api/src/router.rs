//! Route table and request dispatch.
//!
//! A request is matched to a [`Route`] first, then authorized (reads need a
//! read scope, everything else a write scope), then handed to its handler.

use std::time::Instant;

use revu_core::enums::{EntityKind, LikeableKind, OfferingKind, Scope};

use crate::API_PREFIX;
use crate::error::ApiError;
use crate::handlers::companies::CompanyStat;
use crate::handlers::{agencies, aspects, comments, companies, grants, industries, likes, offerings, reviews};
use crate::request::{ApiRequest, Method};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Index,
    Create,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    Show,
    Update,
    Destroy,
}

/// Adding or removing a company from a many-to-many join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    Attach,
    Detach,
}

impl Collection {
    const fn for_method(method: Method) -> Option<Self> {
        match method {
            Method::Get => Some(Self::Index),
            Method::Post => Some(Self::Create),
            _ => None,
        }
    }
}

impl Link {
    const fn for_method(method: Method) -> Option<Self> {
        match method {
            Method::Put => Some(Self::Attach),
            Method::Delete => Some(Self::Detach),
            _ => None,
        }
    }
}

impl Member {
    const fn for_method(method: Method) -> Option<Self> {
        match method {
            Method::Get => Some(Self::Show),
            Method::Put | Method::Patch => Some(Self::Update),
            Method::Delete => Some(Self::Destroy),
            Method::Post => None,
        }
    }
}

/// Every route the API serves. Path ids are still raw hashids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Companies(Collection),
    Company(&'a str, Member),
    CompanyStat(&'a str, CompanyStat),
    CompanyOfferings(&'a str, OfferingKind, Collection),
    CompanyOffering(&'a str, OfferingKind, &'a str, Link),
    CompanyIndustry(&'a str, &'a str, Link),
    Offering(OfferingKind, &'a str, Member),
    OfferingReviews(OfferingKind, &'a str, Collection),
    Review(&'a str, Member),
    Likes(LikeableKind, &'a str, Collection),
    Like(&'a str, Member),
    ReviewComments(&'a str, Collection),
    Comment(&'a str, Member),
    ReviewAspects(&'a str, Collection),
    Aspect(&'a str, Member),
    Grants(Collection),
    Grant(&'a str, Member),
    Industries(Collection),
    Industry(&'a str, Member),
    IndustryCompanies(&'a str),
    Agencies(Collection),
    Agency(&'a str, Member),
}

fn offering_kind(segment: &str) -> Option<OfferingKind> {
    EntityKind::from_collection(segment).and_then(|kind| OfferingKind::try_from(kind).ok())
}

fn likeable_kind(segment: &str) -> Option<LikeableKind> {
    EntityKind::from_collection(segment).and_then(|kind| LikeableKind::try_from(kind).ok())
}

impl<'a> Route<'a> {
    /// Match a method and a path below [`API_PREFIX`].
    #[must_use]
    pub fn parse(method: Method, path: &'a str) -> Option<Self> {
        let rest = path.strip_prefix(API_PREFIX)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        let segments: Vec<&'a str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        let collection = Collection::for_method(method);
        let member = Member::for_method(method);
        let link = Link::for_method(method);

        let route = match segments[..] {
            ["companies"] => Self::Companies(collection?),
            ["companies", id] => Self::Company(id, member?),
            ["companies", id, sub] => match CompanyStat::from_segment(sub) {
                Some(stat) if method == Method::Get => Self::CompanyStat(id, stat),
                Some(_) => return None,
                None => Self::CompanyOfferings(id, offering_kind(sub)?, collection?),
            },
            ["companies", id, "industries", industry] => Self::CompanyIndustry(id, industry, link?),
            ["companies", id, sub, target] => Self::CompanyOffering(id, offering_kind(sub)?, target, link?),
            ["reviews", id] => Self::Review(id, member?),
            ["likes", id] => match member? {
                Member::Update => return None,
                action => Self::Like(id, action),
            },
            ["comments", id] => Self::Comment(id, member?),
            ["aspects", id] => Self::Aspect(id, member?),
            ["grants"] => Self::Grants(collection?),
            ["grants", id] => Self::Grant(id, member?),
            ["industries"] => Self::Industries(collection?),
            ["industries", id] => Self::Industry(id, member?),
            ["industries", id, "companies"] if method == Method::Get => Self::IndustryCompanies(id),
            ["agencies"] => Self::Agencies(collection?),
            ["agencies", id] => Self::Agency(id, member?),
            [coll, id] => Self::Offering(offering_kind(coll)?, id, member?),
            ["reviews", id, "comments"] => Self::ReviewComments(id, collection?),
            ["reviews", id, "aspects"] => Self::ReviewAspects(id, collection?),
            [coll, id, "likes"] => Self::Likes(likeable_kind(coll)?, id, collection?),
            [coll, id, "reviews"] => Self::OfferingReviews(offering_kind(coll)?, id, collection?),
            _ => return None,
        };
        Some(route)
    }

    async fn call(self, state: &AppState, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
        use Collection::{Create, Index};
        use Member::{Destroy, Show, Update};

        match self {
            Self::Companies(Index) => companies::index(state, req).await,
            Self::Companies(Create) => companies::create(state, req).await,
            Self::Company(id, Show) => companies::show(state, id).await,
            Self::Company(id, Update) => companies::update(state, req, id).await,
            Self::Company(id, Destroy) => companies::destroy(state, id).await,
            Self::CompanyStat(id, stat) => companies::stat(state, req, id, stat).await,

            Self::CompanyOfferings(company, kind, Index) => offerings::index(state, req, company, kind).await,
            Self::CompanyOfferings(company, kind, Create) => offerings::create(state, req, company, kind).await,
            Self::CompanyOffering(company, kind, id, Link::Attach) => offerings::link(state, company, kind, id).await,
            Self::CompanyOffering(company, kind, id, Link::Detach) => {
                offerings::unlink(state, company, kind, id).await
            }
            Self::Offering(kind, id, Show) => offerings::show(state, kind, id).await,
            Self::Offering(kind, id, Update) => offerings::update(state, req, kind, id).await,
            Self::Offering(kind, id, Destroy) => offerings::destroy(state, kind, id).await,

            Self::OfferingReviews(kind, id, Index) => reviews::index(state, req, kind, id).await,
            Self::OfferingReviews(kind, id, Create) => reviews::create(state, req, kind, id).await,
            Self::Review(id, Show) => reviews::show(state, id).await,
            Self::Review(id, Update) => reviews::update(state, req, id).await,
            Self::Review(id, Destroy) => reviews::destroy(state, id).await,

            Self::Likes(kind, id, Index) => likes::index(state, req, kind, id).await,
            Self::Likes(kind, id, Create) => likes::create(state, req, kind, id).await,
            Self::Like(id, Show) => likes::show(state, id).await,
            Self::Like(id, Destroy) => likes::destroy(state, id).await,
            Self::Like(_, Update) => Err(ApiError::RouteNotFound),

            Self::ReviewComments(id, Index) => comments::index(state, req, id).await,
            Self::ReviewComments(id, Create) => comments::create(state, req, id).await,
            Self::Comment(id, Show) => comments::show(state, id).await,
            Self::Comment(id, Update) => comments::update(state, req, id).await,
            Self::Comment(id, Destroy) => comments::destroy(state, id).await,

            Self::ReviewAspects(id, Index) => aspects::index(state, req, id).await,
            Self::ReviewAspects(id, Create) => aspects::create(state, req, id).await,
            Self::Aspect(id, Show) => aspects::show(state, id).await,
            Self::Aspect(id, Update) => aspects::update(state, req, id).await,
            Self::Aspect(id, Destroy) => aspects::destroy(state, id).await,

            Self::Grants(Index) => grants::index(state, req).await,
            Self::Grants(Create) => grants::create(state, req).await,
            Self::Grant(id, Show) => grants::show(state, id).await,
            Self::Grant(id, Update) => grants::update(state, req, id).await,
            Self::Grant(id, Destroy) => grants::destroy(state, id).await,

            Self::Industries(Index) => industries::index(state, req).await,
            Self::Industries(Create) => industries::create(state, req).await,
            Self::Industry(id, Show) => industries::show(state, id).await,
            Self::Industry(id, Update) => industries::update(state, req, id).await,
            Self::Industry(id, Destroy) => industries::destroy(state, id).await,
            Self::IndustryCompanies(id) => industries::companies(state, req, id).await,
            Self::CompanyIndustry(company, id, Link::Attach) => industries::link(state, company, id).await,
            Self::CompanyIndustry(company, id, Link::Detach) => industries::unlink(state, company, id).await,

            Self::Agencies(Index) => agencies::index(state, req).await,
            Self::Agencies(Create) => agencies::create(state, req).await,
            Self::Agency(id, Show) => agencies::show(state, id).await,
            Self::Agency(id, Update) => agencies::update(state, req, id).await,
            Self::Agency(id, Destroy) => agencies::destroy(state, id).await,
        }
    }
}

async fn dispatch(state: &AppState, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let route = Route::parse(req.method, &req.path).ok_or(ApiError::RouteNotFound)?;
    let accepted = if req.method.is_read() { Scope::READ } else { Scope::WRITE };
    let identity = state.tokens.authorize(req.header("Authorization"), accepted)?;
    tracing::debug!(client = %identity.client, ?route, "authorized");
    route.call(state, req).await
}

/// Serve one request. Errors are rendered, never propagated.
pub async fn handle(state: &AppState, req: ApiRequest) -> ApiResponse {
    let started = Instant::now();
    let response = dispatch(state, &req)
        .await
        .unwrap_or_else(ApiError::into_response);
    tracing::info!(
        method = %req.method,
        path = %req.path,
        status = response.status,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "request"
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Method::Get, "/api/v1/companies", Some(Route::Companies(Collection::Index)))]
    #[case(Method::Patch, "/api/v1/companies/abc", Some(Route::Company("abc", Member::Update)))]
    #[case(Method::Get, "/api/v1/companies/abc/clients", Some(Route::CompanyStat("abc", CompanyStat::Clients)))]
    #[case(Method::Post, "/api/v1/companies/abc/clients", None)]
    #[case(
        Method::Post,
        "/api/v1/companies/abc/services",
        Some(Route::CompanyOfferings("abc", OfferingKind::Service, Collection::Create))
    )]
    #[case(Method::Get, "/api/v1/projects/xyz", Some(Route::Offering(OfferingKind::Project, "xyz", Member::Show)))]
    #[case(
        Method::Post,
        "/api/v1/products/xyz/reviews",
        Some(Route::OfferingReviews(OfferingKind::Product, "xyz", Collection::Create))
    )]
    #[case(
        Method::Post,
        "/api/v1/comments/c1/likes",
        Some(Route::Likes(LikeableKind::Comment, "c1", Collection::Create))
    )]
    #[case(Method::Post, "/api/v1/companies/c1/likes", None)]
    #[case(Method::Put, "/api/v1/likes/l1", None)]
    #[case(Method::Delete, "/api/v1/likes/l1", Some(Route::Like("l1", Member::Destroy)))]
    #[case(Method::Get, "/api/v1/reviews/r1/comments", Some(Route::ReviewComments("r1", Collection::Index)))]
    #[case(Method::Post, "/api/v1/reviews/r1/aspects", Some(Route::ReviewAspects("r1", Collection::Create)))]
    #[case(Method::Delete, "/api/v1/grants/g1", Some(Route::Grant("g1", Member::Destroy)))]
    #[case(
        Method::Put,
        "/api/v1/companies/abc/services/s1",
        Some(Route::CompanyOffering("abc", OfferingKind::Service, "s1", Link::Attach))
    )]
    #[case(Method::Post, "/api/v1/companies/abc/services/s1", None)]
    #[case(Method::Put, "/api/v1/companies/abc/grants/g1", None)]
    #[case(
        Method::Delete,
        "/api/v1/companies/abc/industries/i1",
        Some(Route::CompanyIndustry("abc", "i1", Link::Detach))
    )]
    #[case(
        Method::Get,
        "/api/v1/companies/abc/industries",
        Some(Route::CompanyStat("abc", CompanyStat::Industries))
    )]
    #[case(
        Method::Get,
        "/api/v1/companies/abc/client_industries",
        Some(Route::CompanyStat("abc", CompanyStat::ClientIndustries))
    )]
    #[case(Method::Post, "/api/v1/industries", Some(Route::Industries(Collection::Create)))]
    #[case(Method::Get, "/api/v1/industries/i1/companies", Some(Route::IndustryCompanies("i1")))]
    #[case(Method::Post, "/api/v1/industries/i1/companies", None)]
    #[case(Method::Patch, "/api/v1/agencies/a1", Some(Route::Agency("a1", Member::Update)))]
    #[case(Method::Get, "/api/v1/users", None)]
    #[case(Method::Get, "/api/v2/companies", None)]
    #[case(Method::Get, "/api/v1companies", None)]
    fn route_table(#[case] method: Method, #[case] path: &str, #[case] expected: Option<Route<'static>>) {
        assert_eq!(Route::parse(method, path), expected);
    }
}
