use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    dto::offer_dto::{
        CategoryResponse, CreateOfferPayload, JobOfferResponse, OfferDetailResponse,
        OfferListQuery, RecentOffersQuery, UpdateOfferPayload,
    },
    error::Result,
    middleware::extract::{Json, Path, Query},
    models::{identity::IdentityRef, job_offer::Category},
    AppState,
};

#[axum::debug_handler]
pub async fn list_categories() -> impl IntoResponse {
    let categories: Vec<CategoryResponse> =
        Category::ALL.into_iter().map(CategoryResponse::from).collect();
    Json(categories)
}

/// Open offers, newest first. `search` matches title, description or company name.
#[axum::debug_handler]
pub async fn list_open_offers(
    State(state): State<AppState>,
    Query(query): Query<OfferListQuery>,
) -> Result<impl IntoResponse> {
    let offers = state.offer_service.list_open(query).await?;
    Ok(Json(JobOfferResponse::list(offers, state.offer_service.today())))
}

#[axum::debug_handler]
pub async fn recent_offers(
    State(state): State<AppState>,
    Query(query): Query<RecentOffersQuery>,
) -> Result<impl IntoResponse> {
    let limit = query.limit.unwrap_or(state.listing.recent_offers_limit);
    let offers = state.offer_service.recent(limit).await?;
    Ok(Json(JobOfferResponse::list(offers, state.offer_service.today())))
}

#[utoipa::path(
    post,
    path = "/api/offers",
    request_body = CreateOfferPayload,
    responses(
        (status = 201, description = "Job offer published", body = Json<JobOfferResponse>),
        (status = 403, description = "Caller is not a company"),
        (status = 422, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn publish_offer(
    State(state): State<AppState>,
    identity: IdentityRef,
    Json(payload): Json<CreateOfferPayload>,
) -> Result<impl IntoResponse> {
    let company = state
        .profile_service
        .require_company(identity, "publish job offers")
        .await?;
    let offer = state.offer_service.publish(&company, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(JobOfferResponse::new(offer, state.offer_service.today())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/offers/{id}",
    params(
        ("id" = Uuid, Path, description = "Job offer ID")
    ),
    responses(
        (status = 200, description = "Job offer with the caller's application state", body = Json<OfferDetailResponse>),
        (status = 404, description = "Job offer not found")
    )
)]
#[axum::debug_handler]
pub async fn get_offer(
    State(state): State<AppState>,
    identity: Option<IdentityRef>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state.offer_service.detail(id, identity).await?;
    Ok(Json(OfferDetailResponse::new(
        detail,
        state.offer_service.today(),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/offers/{id}",
    params(
        ("id" = Uuid, Path, description = "Job offer ID")
    ),
    request_body = UpdateOfferPayload,
    responses(
        (status = 200, description = "Job offer updated", body = Json<JobOfferResponse>),
        (status = 403, description = "Offer belongs to another company"),
        (status = 404, description = "Job offer not found"),
        (status = 422, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn update_offer(
    State(state): State<AppState>,
    identity: IdentityRef,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOfferPayload>,
) -> Result<impl IntoResponse> {
    let company = state
        .profile_service
        .require_company(identity, "edit job offers")
        .await?;
    let offer = state.offer_service.update(id, &company, payload).await?;
    Ok(Json(JobOfferResponse::new(offer, state.offer_service.today())))
}

#[utoipa::path(
    delete,
    path = "/api/offers/{id}",
    params(
        ("id" = Uuid, Path, description = "Job offer ID")
    ),
    responses(
        (status = 204, description = "Job offer and its applications deleted"),
        (status = 403, description = "Offer belongs to another company"),
        (status = 404, description = "Job offer not found")
    )
)]
#[axum::debug_handler]
pub async fn retract_offer(
    State(state): State<AppState>,
    identity: IdentityRef,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let company = state
        .profile_service
        .require_company(identity, "delete job offers")
        .await?;
    state.offer_service.retract(id, &company).await?;
    Ok(StatusCode::NO_CONTENT)
}
