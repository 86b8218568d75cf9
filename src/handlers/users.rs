// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{AdminOnly, RequireRole, Staff},
    },
    models::auth::{UpdateUserPayload, UserProfile},
    models::rbac::Role,
};

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Users",
    responses(
        (status = 200, description = "Usuários", body = Vec<UserProfile>),
        (status = 403, description = "Só administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, ApiError> {
    let users = app_state
        .user_service
        .list_users()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário", body = UserProfile),
        (status = 404, description = "Usuário não encontrado")
    ),
    params(
        ("id" = i32, Path, description = "ID do usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .user_service
        .get_user(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "Users",
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Usuário atualizado", body = UserProfile),
        (status = 404, description = "Usuário ou papel não encontrado")
    ),
    params(
        ("id" = i32, Path, description = "ID do usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let user = app_state
        .user_service
        .update_user(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/api/admin/roles",
    tag = "Users",
    responses(
        (status = 200, description = "Papéis", body = Vec<Role>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_roles(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
) -> Result<impl IntoResponse, ApiError> {
    let roles = app_state
        .user_service
        .list_roles()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(roles))
}
