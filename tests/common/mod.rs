#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate};
use jobfinder_backend::{
    database::memory::MemoryStore, middleware::auth::Claims, routes, utils::time::ManualClock,
    AppState,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

pub const SECRET: &str = "test_identity_secret";

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

pub fn days_from_start(days: i64) -> String {
    (start_date() + Duration::days(days)).to_string()
}

pub fn token_for(identity: Uuid) -> String {
    let claims = Claims {
        sub: identity.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("encode token")
}

pub struct TestApp {
    pub router: Router,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::starting_on(start_date()));
        let state = AppState::new(Arc::new(MemoryStore::new()), clock.clone(), SECRET);
        Self {
            router: routes::router(state),
            clock,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<JsonValue>,
    ) -> (StatusCode, JsonValue) {
        send(self.router.clone(), method, uri, token, body).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, JsonValue) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: JsonValue) -> (StatusCode, JsonValue) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: JsonValue) -> (StatusCode, JsonValue) {
        self.send(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, JsonValue) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Registers a company profile for a fresh identity and returns its token.
    pub async fn company(&self, name: &str) -> String {
        let token = token_for(Uuid::new_v4());
        let (status, body) = self
            .post(
                "/api/companies",
                &token,
                json!({
                    "name": name,
                    "description": "We build things",
                    "location": "Lisbon",
                    "phone": "+351 210 000 000",
                    "website": "https://example.com"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        token
    }

    pub async fn candidate(&self) -> String {
        let token = token_for(Uuid::new_v4());
        let (status, body) = self
            .post(
                "/api/candidates",
                &token,
                json!({
                    "phone": "+351 910 000 000",
                    "location": "Porto",
                    "skills": "rust, sql",
                    "experience": "4 years backend"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        token
    }

    pub async fn publish(&self, token: &str, title: &str, category: &str, deadline: &str) -> String {
        let (status, body) = self
            .post(
                "/api/offers",
                token,
                json!({
                    "title": title,
                    "description": format!("{title} wanted"),
                    "category": category,
                    "location": "Remote",
                    "salary": "4200.00",
                    "requirements": "Experience shipping to production",
                    "deadline": deadline
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().expect("offer id").to_string()
    }

    pub async fn apply(&self, token: &str, offer_id: &str) -> (StatusCode, JsonValue) {
        self.post(
            &format!("/api/offers/{offer_id}/applications"),
            token,
            json!({ "cover_letter": "I would love to join the team" }),
        )
        .await
    }
}

pub async fn send(
    router: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, body)
}
