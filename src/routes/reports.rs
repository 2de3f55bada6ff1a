use axum::{
    extract::State,
    response::IntoResponse,
};

use crate::{
    dto::{
        offer_dto::{ExpiringOffersQuery, JobOfferResponse},
        report_dto::{CategoryCountResponse, DashboardResponse},
    },
    error::Result,
    middleware::extract::{Json, Query},
    models::identity::IdentityRef,
    AppState,
};

#[axum::debug_handler]
pub async fn offers_by_category(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let counts = state.report_service.category_counts().await?;
    let body: Vec<CategoryCountResponse> = counts
        .into_iter()
        .map(|(category, count)| CategoryCountResponse {
            category,
            label: category.label().to_string(),
            count,
        })
        .collect();
    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn expiring_soon(
    State(state): State<AppState>,
    Query(query): Query<ExpiringOffersQuery>,
) -> Result<impl IntoResponse> {
    let days = query.days.unwrap_or(state.listing.expiring_soon_days);
    let offers = state.report_service.expiring_within(days).await?;
    Ok(Json(JobOfferResponse::list(offers, state.clock.today())))
}

#[axum::debug_handler]
pub async fn company_dashboard(
    State(state): State<AppState>,
    identity: IdentityRef,
) -> Result<impl IntoResponse> {
    let company = state
        .profile_service
        .require_company(identity, "view the company dashboard")
        .await?;
    let dashboard = state.report_service.dashboard(&company).await?;
    Ok(Json(DashboardResponse::new(dashboard, state.clock.today())))
}
