use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    dto::application_dto::{ApplyPayload, UpdateStatusPayload},
    error::Result,
    middleware::extract::{Json, Path},
    models::identity::IdentityRef,
    AppState,
};

#[axum::debug_handler]
pub async fn apply_to_offer(
    State(state): State<AppState>,
    identity: IdentityRef,
    Path(offer_id): Path<Uuid>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    let candidate = state
        .profile_service
        .require_candidate(identity, "apply to job offers")
        .await?;
    let application = state
        .application_service
        .apply(&candidate, offer_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[axum::debug_handler]
pub async fn list_offer_applications(
    State(state): State<AppState>,
    identity: IdentityRef,
    Path(offer_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let company = state
        .profile_service
        .require_company(identity, "review applications")
        .await?;
    let applications = state
        .application_service
        .for_offer(offer_id, &company)
        .await?;
    Ok(Json(applications))
}

#[axum::debug_handler]
pub async fn my_applications(
    State(state): State<AppState>,
    identity: IdentityRef,
) -> Result<impl IntoResponse> {
    let candidate = state
        .profile_service
        .require_candidate(identity, "list their applications")
        .await?;
    let applications = state.application_service.for_candidate(&candidate).await?;
    Ok(Json(applications))
}

#[axum::debug_handler]
pub async fn withdraw_application(
    State(state): State<AppState>,
    identity: IdentityRef,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let candidate = state
        .profile_service
        .require_candidate(identity, "withdraw applications")
        .await?;
    state.application_service.withdraw(id, &candidate).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    identity: IdentityRef,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    let company = state
        .profile_service
        .require_company(identity, "review applications")
        .await?;
    let application = state
        .application_service
        .set_status(id, &company, payload.status)
        .await?;
    Ok(Json(application))
}
