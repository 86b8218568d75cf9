// src/handlers/products.rs

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
    models::product::{
        AddColorVariantPayload, ColorVariant, CreateProductPayload, ProductDetail, UpdateProductPayload,
    },
};

// ---
// Handler: create_product
// ---
#[utoipa::path(
    post,
    path = "/api/admin/products",
    tag = "Products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = ProductDetail),
        (status = 404, description = "Categoria, material ou marca inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_service
        .create_product(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(product)))
}

// ---
// Handler: update_product (parcial, com estoques e imagens por cor)
// ---
#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    tag = "Products",
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = ProductDetail),
        (status = 404, description = "Produto não encontrado")
    ),
    params(
        ("id" = i32, Path, description = "ID do produto")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    // Regras que o derive não cobre
    payload
        .validate_consistency()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_service
        .update_product(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    tag = "Products",
    responses(
        (status = 204, description = "Produto removido com vínculos, variantes e imagens"),
        (status = 404, description = "Produto não encontrado")
    ),
    params(
        ("id" = i32, Path, description = "ID do produto")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .product_service
        .delete_product(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// Variantes de cor
// ---

#[utoipa::path(
    get,
    path = "/api/admin/products/{id}/colors",
    tag = "Products",
    responses(
        (status = 200, description = "Imagem e estoque por cor", body = Vec<ColorVariant>),
        (status = 404, description = "Produto não encontrado")
    ),
    params(
        ("id" = i32, Path, description = "ID do produto")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_color_variants(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let variants = app_state
        .product_service
        .list_color_variants(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(variants))
}

#[utoipa::path(
    post,
    path = "/api/admin/products/{id}/colors",
    tag = "Products",
    request_body = AddColorVariantPayload,
    responses(
        (status = 201, description = "Variante criada", body = ColorVariant),
        (status = 409, description = "Já existe imagem para esta cor")
    ),
    params(
        ("id" = i32, Path, description = "ID do produto")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_color_variant(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<i32>,
    Json(payload): Json<AddColorVariantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let variant = app_state
        .product_service
        .add_color_variant(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(variant)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}/colors/{color_id}",
    tag = "Products",
    responses(
        (status = 204, description = "Variante removida"),
        (status = 404, description = "Variante não encontrada")
    ),
    params(
        ("id" = i32, Path, description = "ID do produto"),
        ("color_id" = i32, Path, description = "ID da cor")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_color_variant(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path((id, color_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .product_service
        .delete_color_variant(id, color_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
