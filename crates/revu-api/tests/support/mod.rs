//! Shared fixtures for revu-api integration tests.
#![allow(dead_code)]

use revu_api::{API_PREFIX, ApiRequest, ApiResponse, AppState, Method, handle};
use revu_auth::TokenRegistry;
use revu_config::{AuthConfig, PaginationConfig, TokenConfig};
use revu_core::enums::Scope;
use revu_core::hashid::HashidCodec;
use revu_db::service::RevuService;
use serde_json::{Value, json};

pub const READ_TOKEN: &str = "reader-secret";
pub const WRITE_TOKEN: &str = "writer-secret";
pub const ADMIN_TOKEN: &str = "admin-secret";

fn token(name: &str, secret: &str, scopes: Vec<Scope>) -> TokenConfig {
    TokenConfig {
        name: name.to_string(),
        token: secret.to_string(),
        scopes,
        expires_at: None,
    }
}

/// App over an in-memory database with one token per scope.
pub async fn app() -> AppState {
    let service = RevuService::new_local(":memory:").await.unwrap();
    let auth = AuthConfig {
        tokens: vec![
            token("reader", READ_TOKEN, vec![Scope::ReadOnly]),
            token("writer", WRITE_TOKEN, vec![Scope::WriteOnly]),
            token("admin", ADMIN_TOKEN, vec![Scope::ReadWrite]),
        ],
    };
    AppState::new(
        service,
        HashidCodec::new("integration salt", 8),
        TokenRegistry::from_config(&auth),
        PaginationConfig::default(),
    )
}

pub async fn call_as(
    state: &AppState,
    token: Option<&str>,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> ApiResponse {
    let mut req = ApiRequest::new(method, &format!("{API_PREFIX}{path}"));
    if let Some(token) = token {
        req = req.with_header("Authorization", &format!("Bearer {token}"));
    }
    if let Some(body) = body {
        req = req.with_json(&body);
    }
    handle(state, req).await
}

/// Call with a read/write token.
pub async fn call(state: &AppState, method: Method, path: &str, body: Option<Value>) -> ApiResponse {
    call_as(state, Some(ADMIN_TOKEN), method, path, body).await
}

pub async fn get(state: &AppState, path: &str) -> ApiResponse {
    call(state, Method::Get, path, None).await
}

pub async fn post(state: &AppState, path: &str, body: Value) -> ApiResponse {
    call(state, Method::Post, path, Some(body)).await
}

pub async fn delete(state: &AppState, path: &str) -> ApiResponse {
    call(state, Method::Delete, path, None).await
}

/// Hashid of the record in a response body.
pub fn id_of(res: &ApiResponse) -> String {
    res.body_json()["id"].as_str().unwrap().to_string()
}

pub async fn company(state: &AppState, name: &str) -> String {
    let res = post(state, "/companies", json!({"company": {"name": name}})).await;
    assert_eq!(res.status, 201, "company create: {:?}", res.body);
    id_of(&res)
}

/// Create an offering sold by `company`. `collection` is `products`,
/// `services` or `projects`.
pub async fn offering(state: &AppState, company: &str, collection: &str, name: &str) -> String {
    let root = collection.trim_end_matches('s');
    let mut body = serde_json::Map::new();
    body.insert(
        root.to_string(),
        json!({"name": name, "description": format!("{name} description")}),
    );
    let res = post(state, &format!("/companies/{company}/{collection}"), Value::Object(body)).await;
    assert_eq!(res.status, 201, "offering create: {:?}", res.body);
    id_of(&res)
}

pub async fn review(
    state: &AppState,
    collection: &str,
    offering: &str,
    vendor: &str,
    reviewer: &str,
    score: &str,
) -> String {
    let res = post(
        state,
        &format!("/{collection}/{offering}/reviews"),
        json!({"review": {
            "score": score,
            "content": "Delivered as promised",
            "vendor_id": vendor,
            "from_type": "Company",
            "from_id": reviewer,
        }}),
    )
    .await;
    assert_eq!(res.status, 201, "review create: {:?}", res.body);
    id_of(&res)
}

/// Vendor, client, one service sold by the vendor and one positive review
/// of it written by the client.
pub struct Reviewed {
    pub vendor: String,
    pub client: String,
    pub service: String,
    pub review: String,
}

pub async fn reviewed(state: &AppState) -> Reviewed {
    let vendor = company(state, "Vendor Pte Ltd").await;
    let client = company(state, "Client Agency").await;
    let service = offering(state, &vendor, "services", "Cleaning").await;
    let review = review(state, "services", &service, &vendor, &client, "POSITIVE").await;
    Reviewed {
        vendor,
        client,
        service,
        review,
    }
}
