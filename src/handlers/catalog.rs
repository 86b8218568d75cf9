// src/handlers/catalog.rs
// Vitrine pública e os cadastros simples do painel (categorias, materiais, marcas, cores).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    db::catalog_repo::NamedTable,
    middleware::{
        i18n::Locale,
        rbac::{RequireRole, Staff},
    },
    models::catalog::{Brand, BrandPayload, Category, Color, ColorPayload, Material, NamePayload},
    models::product::{ProductDetail, ProductFilter},
};

// ---
// Públicos
// ---

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Catalog",
    responses(
        (status = 200, description = "Produtos da vitrine, com preço e estoque já calculados", body = Vec<ProductDetail>)
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<ProductFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .product_service
        .list_products(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Catalog",
    responses(
        (status = 200, description = "Detalhe do produto", body = ProductDetail),
        (status = 404, description = "Produto não encontrado")
    ),
    params(
        ("id" = i32, Path, description = "ID do produto")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let product = app_state
        .product_service
        .get_product(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(product))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Catalog",
    responses(
        (status = 200, description = "Categorias", body = Vec<Category>)
    )
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let categories = app_state
        .catalog_service
        .list_categories()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/api/materials",
    tag = "Catalog",
    responses(
        (status = 200, description = "Materiais", body = Vec<Material>)
    )
)]
pub async fn list_materials(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let materials = app_state
        .catalog_service
        .list_materials()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(materials))
}

#[utoipa::path(
    get,
    path = "/api/brands",
    tag = "Catalog",
    responses(
        (status = 200, description = "Marcas", body = Vec<Brand>)
    )
)]
pub async fn list_brands(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let brands = app_state
        .catalog_service
        .list_brands()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(brands))
}

#[utoipa::path(
    get,
    path = "/api/colors",
    tag = "Catalog",
    responses(
        (status = 200, description = "Cores", body = Vec<Color>)
    )
)]
pub async fn list_colors(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let colors = app_state
        .catalog_service
        .list_colors()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Json(colors))
}

// ---
// Categorias (painel)
// ---

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    tag = "Catalog Admin",
    request_body = NamePayload,
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 409, description = "Nome já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .catalog_service
        .create_category(&payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    tag = "Catalog Admin",
    request_body = NamePayload,
    responses(
        (status = 200, description = "Categoria renomeada", body = Category),
        (status = 404, description = "Categoria não encontrada")
    ),
    params(
        ("id" = i32, Path, description = "ID da categoria")
    ),
    security(("api_jwt" = []))
)]
pub async fn rename_category(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<i32>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .catalog_service
        .rename_category(id, &payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    tag = "Catalog Admin",
    responses(
        (status = 204, description = "Categoria removida"),
        (status = 409, description = "Categoria em uso por produtos")
    ),
    params(
        ("id" = i32, Path, description = "ID da categoria")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_named(NamedTable::Categories, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// Materiais (painel)
// ---

#[utoipa::path(
    post,
    path = "/api/admin/materials",
    tag = "Catalog Admin",
    request_body = NamePayload,
    responses(
        (status = 201, description = "Material criado", body = Material),
        (status = 409, description = "Nome já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_material(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let material = app_state
        .catalog_service
        .create_material(&payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(material)))
}

#[utoipa::path(
    put,
    path = "/api/admin/materials/{id}",
    tag = "Catalog Admin",
    request_body = NamePayload,
    responses(
        (status = 200, description = "Material renomeado", body = Material),
        (status = 404, description = "Material não encontrado")
    ),
    params(
        ("id" = i32, Path, description = "ID do material")
    ),
    security(("api_jwt" = []))
)]
pub async fn rename_material(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<i32>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let material = app_state
        .catalog_service
        .rename_material(id, &payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(material))
}

#[utoipa::path(
    delete,
    path = "/api/admin/materials/{id}",
    tag = "Catalog Admin",
    responses(
        (status = 204, description = "Material removido"),
        (status = 409, description = "Material em uso por produtos")
    ),
    params(
        ("id" = i32, Path, description = "ID do material")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_material(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_named(NamedTable::Materials, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// Marcas (painel)
// ---

#[utoipa::path(
    post,
    path = "/api/admin/brands",
    tag = "Catalog Admin",
    request_body = BrandPayload,
    responses(
        (status = 201, description = "Marca criada", body = Brand)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Json(payload): Json<BrandPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let brand = app_state
        .catalog_service
        .create_brand(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(brand)))
}

#[utoipa::path(
    put,
    path = "/api/admin/brands/{id}",
    tag = "Catalog Admin",
    request_body = BrandPayload,
    responses(
        (status = 200, description = "Marca atualizada", body = Brand),
        (status = 404, description = "Marca não encontrada")
    ),
    params(
        ("id" = i32, Path, description = "ID da marca")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<i32>,
    Json(payload): Json<BrandPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let brand = app_state
        .catalog_service
        .update_brand(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(brand))
}

#[utoipa::path(
    delete,
    path = "/api/admin/brands/{id}",
    tag = "Catalog Admin",
    responses(
        (status = 204, description = "Marca removida (o logo sai do disco)"),
        (status = 409, description = "Marca em uso por produtos")
    ),
    params(
        ("id" = i32, Path, description = "ID da marca")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_brand(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// Cores (painel)
// ---

#[utoipa::path(
    post,
    path = "/api/admin/colors",
    tag = "Catalog Admin",
    request_body = ColorPayload,
    responses(
        (status = 201, description = "Cor criada", body = Color)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_color(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Json(payload): Json<ColorPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let color = app_state
        .catalog_service
        .create_color(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(color)))
}

#[utoipa::path(
    put,
    path = "/api/admin/colors/{id}",
    tag = "Catalog Admin",
    request_body = ColorPayload,
    responses(
        (status = 200, description = "Cor atualizada", body = Color),
        (status = 404, description = "Cor não encontrada")
    ),
    params(
        ("id" = i32, Path, description = "ID da cor")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_color(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<i32>,
    Json(payload): Json<ColorPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let color = app_state
        .catalog_service
        .update_color(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(color))
}

#[utoipa::path(
    delete,
    path = "/api/admin/colors/{id}",
    tag = "Catalog Admin",
    responses(
        (status = 204, description = "Cor removida"),
        (status = 409, description = "Cor em uso por variantes")
    ),
    params(
        ("id" = i32, Path, description = "ID da cor")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_color(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<Staff>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_color(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
