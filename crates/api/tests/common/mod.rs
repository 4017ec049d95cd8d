//! Shared fixtures for the router tests.
//!
//! The app runs against the in-memory store with a static key source, so
//! these tests need no database or identity server.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use catalog_api::{
    app::{create_app, AppState},
    config::Config,
    services::{KeyFetchError, KeyMaterial, KeySource, VideoStatsSource},
};
use chrono::Utc;
use domain::models::VideoStats;
use domain::store::InMemoryCatalogStore;
use fake::faker::company::en::{Buzzword, CompanyName};
use fake::Fake;
use jsonwebtoken::Algorithm;
use serde_json::{json, Value};
use shared::jwt::{encode_claims, BusinessClaims, ClaimId};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-shared-secret";

/// Key source that serves a fixed secret and counts fetches.
#[derive(Default)]
pub struct StaticKeySource {
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl StaticKeySource {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn fetch_key(&self) -> Result<KeyMaterial, KeyFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(KeyFetchError::Network("connection refused".to_string()));
        }
        Ok(KeyMaterial::hs256(TEST_SECRET))
    }
}

/// Stats source returning fixed counters.
pub struct FixedStats(pub VideoStats);

#[async_trait]
impl VideoStatsSource for FixedStats {
    async fn stats(&self, _video_id: &str) -> VideoStats {
        self.0
    }
}

pub struct TestApp {
    pub router: Router,
    pub keys: Arc<StaticKeySource>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_stats(VideoStats::default())
    }

    pub fn with_stats(stats: VideoStats) -> Self {
        let keys = Arc::new(StaticKeySource::default());
        let state = AppState::new(
            test_config(),
            Arc::new(InMemoryCatalogStore::new()),
            keys.clone(),
            Arc::new(FixedStats(stats)),
        );
        Self {
            router: create_app(state),
            keys,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (axum::http::StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, parse_response_body(response).await)
    }
}

pub fn test_config() -> Config {
    Config::load_for_test(&[]).expect("Failed to load test config")
}

/// Claims shaped like the identity server's business tokens.
pub fn business_claims(business_id: i64) -> BusinessClaims {
    BusinessClaims {
        usertype: Some("business".to_string()),
        id: Some(ClaimId::Number(business_id * 10)),
        user_id: Some(ClaimId::Number(business_id * 100)),
        name: Some(CompanyName().fake()),
        business_id: Some(ClaimId::Number(business_id)),
        business_name: Some(CompanyName().fake()),
        exp: Utc::now().timestamp() + 3600,
        iat: Some(Utc::now().timestamp()),
    }
}

pub fn sign(claims: &BusinessClaims) -> String {
    encode_claims(claims, TEST_SECRET, Algorithm::HS256).unwrap()
}

pub fn business_token(business_id: i64) -> String {
    sign(&business_claims(business_id))
}

/// A category name that will not collide with others in the same test.
pub fn unique_category_name() -> String {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let word: String = Buzzword().fake();
    format!("{} {}", word, n)
}

pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

pub fn category_body(name: &str) -> Value {
    json!({
        "name": name,
        "slug": slugify(name),
        "description": "Test category"
    })
}

/// Creates a category through the API and returns its body.
pub async fn create_category(app: &TestApp, token: &str) -> Value {
    let name = unique_category_name();
    let (status, body) = app
        .send(json_request_with_auth(
            Method::POST,
            "/api/categories/",
            category_body(&name),
            token,
        ))
        .await;
    assert_eq!(status, 201, "category create failed: {}", body);
    body
}

/// Creates a product in `category_id` through the API and returns its body.
pub async fn create_product(app: &TestApp, token: &str, category_id: i64, extra: Value) -> Value {
    let mut body = json!({
        "category": category_id,
        "name": format!("{} kit", unique_category_name()),
        "price": "49.90"
    });
    if let (Some(target), Some(fields)) = (body.as_object_mut(), extra.as_object()) {
        for (k, v) in fields {
            target.insert(k.clone(), v.clone());
        }
    }

    let (status, body) = app
        .send(json_request_with_auth(
            Method::POST,
            "/api/products/",
            body,
            token,
        ))
        .await;
    assert_eq!(status, 201, "product create failed: {}", body);
    body
}

/// Build a JSON request with authentication.
pub fn json_request_with_auth(method: Method, uri: &str, body: Value, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a JSON request without authentication.
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a GET request with authentication.
pub fn get_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Build a GET request with a raw Authorization header value.
pub fn get_request_with_header(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a DELETE request with authentication.
pub fn delete_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Parse JSON response body; empty bodies become `Null`.
pub async fn parse_response_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}
