pub mod auth;
pub mod catalog_service;
pub mod image_store;
pub mod pricing;
pub mod product_service;
pub mod promotion_service;
pub mod user_service;
