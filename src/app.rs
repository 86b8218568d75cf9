// src/app.rs
// Montagem do Router: rotas públicas, de autenticação e do painel.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    common::error::AppError,
    config::{AppState, CorsConfig},
    docs::ApiDoc,
    handlers,
    middleware::auth::auth_guard,
};

fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, AppError> {
    if config.allowed_origins.is_empty() {
        tracing::warn!("FRONTEND_URL não definida: CORS permissivo");
        return Ok(CorsLayer::permissive());
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Origem CORS inválida: {}", origin)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Com origens explícitas o navegador pode mandar o cookie de sessão.
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT_LANGUAGE])
        .allow_credentials(true))
}

pub fn build_router(app_state: AppState) -> Result<Router, AppError> {
    let config = app_state.config.clone();

    // Vitrine pública
    let catalog_routes = Router::new()
        .route("/products", get(handlers::catalog::list_products))
        .route("/products/{id}", get(handlers::catalog::get_product))
        .route("/categories", get(handlers::catalog::list_categories))
        .route("/materials", get(handlers::catalog::list_materials))
        .route("/brands", get(handlers::catalog::list_brands))
        .route("/colors", get(handlers::catalog::list_colors));

    // Autenticação: só /me exige sessão
    let auth_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout));

    // Painel: sessão obrigatória; o papel é conferido em cada handler (RequireRole)
    let admin_routes = Router::new()
        .route("/categories", post(handlers::catalog::create_category))
        .route(
            "/categories/{id}",
            put(handlers::catalog::rename_category).delete(handlers::catalog::delete_category),
        )
        .route("/materials", post(handlers::catalog::create_material))
        .route(
            "/materials/{id}",
            put(handlers::catalog::rename_material).delete(handlers::catalog::delete_material),
        )
        .route("/brands", post(handlers::catalog::create_brand))
        .route(
            "/brands/{id}",
            put(handlers::catalog::update_brand).delete(handlers::catalog::delete_brand),
        )
        .route("/colors", post(handlers::catalog::create_color))
        .route(
            "/colors/{id}",
            put(handlers::catalog::update_color).delete(handlers::catalog::delete_color),
        )
        .route("/products", post(handlers::products::create_product))
        .route(
            "/products/{id}",
            put(handlers::products::update_product).delete(handlers::products::delete_product),
        )
        .route(
            "/products/{id}/colors",
            get(handlers::products::list_color_variants).post(handlers::products::add_color_variant),
        )
        .route(
            "/products/{id}/colors/{color_id}",
            axum::routing::delete(handlers::products::delete_color_variant),
        )
        .route(
            "/promotions",
            get(handlers::promotions::list_promotions).post(handlers::promotions::create_promotion),
        )
        .route(
            "/promotions/{id}",
            put(handlers::promotions::update_promotion).delete(handlers::promotions::delete_promotion),
        )
        .route("/users", get(handlers::users::list_users))
        .route(
            "/users/{id}",
            get(handlers::users::get_user).put(handlers::users::update_user),
        )
        .route("/roles", get(handlers::users::list_roles))
        .route(
            "/uploads",
            post(handlers::uploads::upload_image)
                .layer(DefaultBodyLimit::max(config.uploads.max_bytes)),
        )
        .route(
            "/uploads/{file_name}",
            axum::routing::delete(handlers::uploads::delete_image),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", catalog_routes)
        .nest("/api/auth", auth_routes)
        .nest("/api/admin", admin_routes)
        .nest_service(&config.uploads.public_path, ServeDir::new(&config.uploads.dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors)?)
        .with_state(app_state);

    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_origins_build_a_credentialed_layer() {
        let config = CorsConfig {
            allowed_origins: vec!["http://localhost:3001".into()],
        };
        assert!(cors_layer(&config).is_ok());
    }

    #[test]
    fn malformed_origin_is_a_config_error() {
        let config = CorsConfig {
            allowed_origins: vec!["http://bad\norigin".into()],
        };
        assert!(matches!(cors_layer(&config), Err(AppError::ConfigError(_))));
    }
}
