// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Vitrine ---
        handlers::catalog::list_products,
        handlers::catalog::get_product,
        handlers::catalog::list_categories,
        handlers::catalog::list_materials,
        handlers::catalog::list_brands,
        handlers::catalog::list_colors,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_me,

        // --- Cadastros do painel ---
        handlers::catalog::create_category,
        handlers::catalog::rename_category,
        handlers::catalog::delete_category,
        handlers::catalog::create_material,
        handlers::catalog::rename_material,
        handlers::catalog::delete_material,
        handlers::catalog::create_brand,
        handlers::catalog::update_brand,
        handlers::catalog::delete_brand,
        handlers::catalog::create_color,
        handlers::catalog::update_color,
        handlers::catalog::delete_color,

        // --- Produtos ---
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::products::list_color_variants,
        handlers::products::add_color_variant,
        handlers::products::delete_color_variant,

        // --- Promoções ---
        handlers::promotions::list_promotions,
        handlers::promotions::create_promotion,
        handlers::promotions::update_promotion,
        handlers::promotions::delete_promotion,

        // --- Usuários ---
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::list_roles,

        // --- Uploads ---
        handlers::uploads::upload_image,
        handlers::uploads::delete_image,
    ),
    components(
        schemas(
            // --- Catálogo ---
            models::catalog::Category,
            models::catalog::Material,
            models::catalog::Brand,
            models::catalog::Color,
            models::catalog::NamePayload,
            models::catalog::BrandPayload,
            models::catalog::ColorPayload,

            // --- Produtos ---
            models::product::ProductRow,
            models::product::ProductDetail,
            models::product::ColorImage,
            models::product::ColorStock,
            models::product::ProductPromotion,
            models::product::ColorVariant,
            models::product::CreateProductPayload,
            models::product::UpdateProductPayload,
            models::product::ColorStockUpdate,
            models::product::ColorImageUpdate,
            models::product::AddColorVariantPayload,
            services::pricing::PriceTag,
            services::pricing::StockDisplay,
            services::pricing::ColorSwatch,

            // --- Promoções ---
            models::promotion::Promotion,
            models::promotion::PromotionLink,
            models::promotion::PromotionListing,
            models::promotion::PromotionResponse,
            models::promotion::PromotionPayload,

            // --- Auth / Usuários ---
            models::auth::UserProfile,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::AuthResponse,
            models::rbac::Role,

            // --- Uploads ---
            models::upload::UploadResponse,
            models::upload::UploadForm,
        )
    ),
    tags(
        (name = "Catalog", description = "Vitrine pública"),
        (name = "Auth", description = "Registro, login e sessão"),
        (name = "Catalog Admin", description = "Categorias, materiais, marcas e cores"),
        (name = "Products", description = "Produtos e variantes de cor"),
        (name = "Promotions", description = "Descontos por produto"),
        (name = "Users", description = "Usuários e papéis (painel)"),
        (name = "Uploads", description = "Imagens do catálogo")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_admin_operation_requires_the_jwt_scheme() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = json["paths"].as_object().unwrap();

        let admin: Vec<_> = paths.iter().filter(|(path, _)| path.starts_with("/api/admin")).collect();
        assert!(admin.len() >= 15);
        for (path, item) in admin {
            for (method, operation) in item.as_object().unwrap() {
                assert!(operation["security"].is_array(), "{} {} sem security", method, path);
            }
        }
        assert!(json["components"]["securitySchemes"]["api_jwt"].is_object());
    }

    #[test]
    fn storefront_routes_are_public() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let list = &json["paths"]["/api/products"]["get"];
        assert!(list.is_object());
        assert!(list["security"].is_null());
        assert!(json["components"]["schemas"]["ProductDetail"].is_object());
    }
}
