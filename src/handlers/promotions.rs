// src/handlers/promotions.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{RequireRole, Staff},
    },
    models::promotion::{PromotionListing, PromotionPayload, PromotionResponse},
};

fn validate_payload(payload: &PromotionPayload) -> Result<(), AppError> {
    payload.validate()?;
    payload.validate_consistency()?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/admin/promotions",
    tag = "Promotions",
    responses(
        (status = 200, description = "Vínculos produto/promoção", body = Vec<PromotionListing>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_promotions(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
) -> Result<impl IntoResponse, ApiError> {
    let promotions = app_state
        .promotion_service
        .list_promotions()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(promotions))
}

#[utoipa::path(
    post,
    path = "/api/admin/promotions",
    tag = "Promotions",
    request_body = PromotionPayload,
    responses(
        (status = 201, description = "Promoção criada e vinculada", body = PromotionResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_promotion(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Json(payload): Json<PromotionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let promotion = app_state
        .promotion_service
        .create_promotion(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(promotion)))
}

#[utoipa::path(
    put,
    path = "/api/admin/promotions/{id}",
    tag = "Promotions",
    request_body = PromotionPayload,
    responses(
        (status = 200, description = "Promoção atualizada", body = PromotionResponse),
        (status = 404, description = "Promoção não encontrada")
    ),
    params(
        ("id" = i32, Path, description = "ID da promoção")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_promotion(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<i32>,
    Json(payload): Json<PromotionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let promotion = app_state
        .promotion_service
        .update_promotion(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(promotion))
}

#[utoipa::path(
    delete,
    path = "/api/admin/promotions/{id}",
    tag = "Promotions",
    responses(
        (status = 204, description = "Promoção removida"),
        (status = 404, description = "Promoção não encontrada")
    ),
    params(
        ("id" = i32, Path, description = "ID da promoção")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_promotion(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .promotion_service
        .delete_promotion(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
