pub mod user_repo;
pub use user_repo::UserRepository;
pub mod rbac_repo;
pub use rbac_repo::RbacRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod promotion_repo;
pub use promotion_repo::PromotionRepository;

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use crate::config::DatabaseConfig;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.url)
        .await
}

/// Pool que só conecta no primeiro uso. Serve para montar o estado sem banco (testes).
pub fn lazy_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect_lazy(&config.url)
}
