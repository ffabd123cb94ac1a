//! `page` / `per_page` query parameters and the paging response headers.

use revu_config::PaginationConfig;
use revu_db::pagination::{PageRequest, Paged};
use serde::Serialize;

use crate::request::ApiRequest;
use crate::response::ApiResponse;

/// Read the page window from the query string.
///
/// `page=all` disables paging. Unparseable numbers fall back to the first
/// page and the configured default size; `per_page` is capped at the
/// configured maximum.
#[must_use]
pub fn page_request(req: &ApiRequest, config: &PaginationConfig) -> PageRequest {
    if req.query("page").is_some_and(|p| p.eq_ignore_ascii_case("all")) {
        return PageRequest::All;
    }
    let page = req.query("page").and_then(|p| p.parse::<u32>().ok()).unwrap_or(1);
    let per_page = req
        .query("per_page")
        .and_then(|p| p.parse::<u32>().ok())
        .map_or(config.default_per_page, |n| n.min(config.max_per_page));
    PageRequest::page(page, per_page)
}

/// `200 OK` with the page's items as a JSON array and `Total`, `Per-Page`
/// and `Page` headers.
#[must_use]
pub fn paginated<T: Serialize>(paged: &Paged<T>) -> ApiResponse {
    let (page, per_page) = match paged.request {
        PageRequest::All => (1, paged.total),
        PageRequest::Page { page, per_page } => (page, u64::from(per_page)),
    };
    ApiResponse::ok(&paged.items)
        .with_header("Total", paged.total.to_string())
        .with_header("Per-Page", per_page.to_string())
        .with_header("Page", page.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Method;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn config() -> PaginationConfig {
        PaginationConfig {
            default_per_page: 25,
            max_per_page: 100,
        }
    }

    #[rstest]
    #[case("/companies", PageRequest::page(1, 25))]
    #[case("/companies?page=3", PageRequest::page(3, 25))]
    #[case("/companies?page=2&per_page=10", PageRequest::page(2, 10))]
    #[case("/companies?per_page=5000", PageRequest::page(1, 100))]
    #[case("/companies?page=abc&per_page=-1", PageRequest::page(1, 25))]
    #[case("/companies?page=all", PageRequest::All)]
    fn parses_window(#[case] target: &str, #[case] expected: PageRequest) {
        let req = ApiRequest::new(Method::Get, target);
        assert_eq!(page_request(&req, &config()), expected);
    }

    #[test]
    fn headers_describe_the_window() {
        let paged = Paged::from_vec(vec![1, 2, 3, 4, 5], PageRequest::page(2, 2));
        let res = paginated(&paged);
        assert_eq!(res.header("Total"), Some("5"));
        assert_eq!(res.header("Per-Page"), Some("2"));
        assert_eq!(res.header("Page"), Some("2"));
        assert_eq!(res.body_json(), serde_json::json!([3, 4]));

        let all = paginated(&Paged::from_vec(vec!['a'], PageRequest::All));
        assert_eq!(all.header("Per-Page"), Some("1"));
        assert_eq!(all.header("Page"), Some("1"));
    }
}
