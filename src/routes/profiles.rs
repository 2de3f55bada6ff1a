use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    dto::profile_dto::{
        RegisterCandidatePayload, RegisterCompanyPayload, RoleResponse, UpdateCandidatePayload,
        UpdateCompanyPayload,
    },
    error::{Error, Result},
    middleware::extract::Json,
    models::identity::IdentityRef,
    AppState,
};

#[axum::debug_handler]
pub async fn current_role(
    State(state): State<AppState>,
    identity: IdentityRef,
) -> Result<impl IntoResponse> {
    let role = state.profile_service.role_of(identity).await?;
    Ok(Json(RoleResponse::from(role)))
}

#[axum::debug_handler]
pub async fn register_company(
    State(state): State<AppState>,
    identity: IdentityRef,
    Json(payload): Json<RegisterCompanyPayload>,
) -> Result<impl IntoResponse> {
    let company = state
        .profile_service
        .register_company(identity, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(company)))
}

#[axum::debug_handler]
pub async fn update_company(
    State(state): State<AppState>,
    identity: IdentityRef,
    Json(payload): Json<UpdateCompanyPayload>,
) -> Result<impl IntoResponse> {
    let company = state.profile_service.update_company(identity, payload).await?;
    Ok(Json(company))
}

#[axum::debug_handler]
pub async fn register_candidate(
    State(state): State<AppState>,
    identity: IdentityRef,
    Json(payload): Json<RegisterCandidatePayload>,
) -> Result<impl IntoResponse> {
    let candidate = state
        .profile_service
        .register_candidate(identity, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

#[axum::debug_handler]
pub async fn update_candidate(
    State(state): State<AppState>,
    identity: IdentityRef,
    Json(payload): Json<UpdateCandidatePayload>,
) -> Result<impl IntoResponse> {
    let candidate = state
        .profile_service
        .update_candidate(identity, payload)
        .await?;
    Ok(Json(candidate))
}

#[axum::debug_handler]
pub async fn remove_profile(
    State(state): State<AppState>,
    identity: IdentityRef,
) -> Result<impl IntoResponse> {
    if !state.profile_service.remove_profile(identity).await? {
        return Err(Error::NotFound(
            "No profile exists for this identity".to_string(),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}
