use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::AppState;

pub mod applications;
pub mod health;
pub mod offers;
pub mod profiles;
pub mod reports;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/categories", get(offers::list_categories))
        .route(
            "/api/me",
            get(profiles::current_role).delete(profiles::remove_profile),
        )
        .route("/api/companies", post(profiles::register_company))
        .route("/api/companies/me", patch(profiles::update_company))
        .route("/api/candidates", post(profiles::register_candidate))
        .route("/api/candidates/me", patch(profiles::update_candidate))
        .route(
            "/api/offers",
            get(offers::list_open_offers).post(offers::publish_offer),
        )
        .route("/api/offers/recent", get(offers::recent_offers))
        .route("/api/offers/expiring-soon", get(reports::expiring_soon))
        .route("/api/offers/by-category", get(reports::offers_by_category))
        .route(
            "/api/offers/:id",
            get(offers::get_offer)
                .patch(offers::update_offer)
                .delete(offers::retract_offer),
        )
        .route(
            "/api/offers/:id/applications",
            post(applications::apply_to_offer).get(applications::list_offer_applications),
        )
        .route("/api/applications/mine", get(applications::my_applications))
        .route(
            "/api/applications/:id",
            delete(applications::withdraw_application),
        )
        .route(
            "/api/applications/:id/status",
            post(applications::update_application_status),
        )
        .route("/api/company/dashboard", get(reports::company_dashboard))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use chrono::NaiveDate;
    use serde_json::Value as JsonValue;
    use tower::ServiceExt;

    use super::router;
    use crate::database::{MockStore, StoreError};
    use crate::utils::time::ManualClock;
    use crate::AppState;

    #[tokio::test]
    async fn failing_store_renders_a_generic_500() {
        let mut store = MockStore::new();
        store
            .expect_list_offers()
            .returning(|_| Err(StoreError::Unavailable("connection reset".into())));
        let clock = ManualClock::starting_on(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        let app = router(AppState::new(Arc::new(store), Arc::new(clock), "secret"));

        let response = app
            .oneshot(Request::builder().uri("/api/offers").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let raw = String::from_utf8(bytes.to_vec()).unwrap();
        let body: JsonValue = serde_json::from_str(&raw).unwrap();
        assert_eq!(body["code"], "internal");
        assert_eq!(body["error"], "An unexpected error occurred");
        assert!(!raw.contains("connection reset"), "{raw}");
    }
}
