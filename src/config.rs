// src/config.rs

use sqlx::PgPool;
use std::{env, sync::Arc};

use crate::{
    common::{error::AppError, i18n::I18nStore},
    db::{self, CatalogRepository, ProductRepository, PromotionRepository, RbacRepository, UserRepository},
    services::{
        auth::{AuthService, SessionTokens},
        catalog_service::CatalogService,
        image_store::{ImageStore, LocalImageStore},
        product_service::ProductService,
        promotion_service::PromotionService,
        user_service::UserService,
    },
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub uploads: UploadConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_days: i64,
}

// O segredo nunca vai para o log.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***")
            .field("session_days", &self.session_days)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: String,
    pub public_path: String,
    pub max_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Vazio = CORS permissivo (desenvolvimento).
    pub allowed_origins: Vec<String>,
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, AppError> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::ConfigError(format!("{} deve ser definida", key)))
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::ConfigError(format!("Valor inválido para {}: '{}'", key, raw))),
        None => Ok(default),
    }
}

/// Prefixo onde o diretório de imagens é montado: `/algo`, sem barra final.
fn public_path(lookup: &impl Fn(&str) -> Option<String>) -> Result<String, AppError> {
    let raw = lookup("PUBLIC_IMAGES_PATH").unwrap_or_else(|| "/images".to_string());
    let path = raw.trim().trim_end_matches('/');

    let valid = path.starts_with('/')
        && path.len() > 1
        && !path.contains(|c: char| matches!(c, '{' | '}' | '*') || c.is_whitespace());
    if !valid {
        return Err(AppError::ConfigError(format!(
            "Valor inválido para PUBLIC_IMAGES_PATH: '{}' (use algo como /images)",
            raw
        )));
    }
    Ok(path.to_string())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de qualquer fonte chave -> valor.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        Ok(Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parsed(&lookup, "PORT", 3000)?,
            },
            database: DatabaseConfig {
                url: required(&lookup, "DATABASE_URL")?,
                max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            },
            auth: AuthConfig {
                jwt_secret: required(&lookup, "JWT_SECRET")?,
                session_days: parsed(&lookup, "SESSION_DAYS", 30)?,
            },
            uploads: UploadConfig {
                dir: lookup("UPLOAD_DIR").unwrap_or_else(|| "public/images".to_string()),
                public_path: public_path(&lookup)?,
                max_bytes: parsed(&lookup, "MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
            },
            cors: CorsConfig {
                allowed_origins: lookup("FRONTEND_URL")
                    .map(|urls| {
                        urls.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub product_service: ProductService,
    pub promotion_service: PromotionService,
    pub user_service: UserService,
    pub image_store: Arc<dyn ImageStore>,
    pub i18n_store: Arc<I18nStore>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = db::create_pool(&config.database).await?;
        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Self::with_pool(config, db_pool)
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(config: AppConfig, db_pool: PgPool) -> anyhow::Result<Self> {
        let i18n_store = Arc::new(I18nStore::embedded()?);
        let image_store: Arc<dyn ImageStore> = Arc::new(LocalImageStore::new(
            &config.uploads.dir,
            &config.uploads.public_path,
        ));

        let user_repo = UserRepository::new(db_pool.clone());
        let rbac_repo = RbacRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let promotion_repo = PromotionRepository::new(db_pool.clone());

        let tokens = SessionTokens::new(config.auth.jwt_secret.clone(), config.auth.session_days);
        let auth_service = AuthService::new(user_repo.clone(), tokens, db_pool.clone());
        let catalog_service = CatalogService::new(catalog_repo, image_store.clone());
        let product_service = ProductService::new(db_pool.clone(), product_repo, image_store.clone());
        let promotion_service = PromotionService::new(db_pool.clone(), promotion_repo);
        let user_service = UserService::new(db_pool.clone(), user_repo, rbac_repo);

        Ok(Self {
            db_pool,
            config: Arc::new(config),
            auth_service,
            catalog_service,
            product_service,
            promotion_service,
            user_service,
            image_store,
            i18n_store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const MINIMAL: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/yeka"),
        ("JWT_SECRET", "segredo"),
    ];

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let config = config_from(&MINIMAL).unwrap();
        assert_eq!(config.server_address(), "0.0.0.0:3000");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.auth.session_days, 30);
        assert_eq!(config.uploads.dir, "public/images");
        assert_eq!(config.uploads.public_path, "/images");
        assert_eq!(config.uploads.max_bytes, 5_242_880);
        assert!(config.cors.allowed_origins.is_empty());
    }

    #[test]
    fn missing_secret_is_a_config_error() {
        let err = config_from(&[("DATABASE_URL", "postgres://x")]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(msg) if msg.contains("JWT_SECRET")));
    }

    #[test]
    fn bad_port_is_a_config_error() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("PORT", "tres-mil"));
        assert!(matches!(config_from(&pairs), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn frontend_urls_are_split_and_trimmed() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("FRONTEND_URL", "http://localhost:3001, https://yeka.pe ,"));
        let config = config_from(&pairs).unwrap();
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://localhost:3001", "https://yeka.pe"]
        );
    }

    #[test]
    fn images_path_must_be_a_mountable_prefix() {
        for bad in ["/", "images", "", "/img/{file}", "/a b"] {
            let mut pairs = MINIMAL.to_vec();
            pairs.push(("PUBLIC_IMAGES_PATH", bad));
            assert!(
                matches!(config_from(&pairs), Err(AppError::ConfigError(_))),
                "'{}' deveria ser rejeitado",
                bad
            );
        }

        let mut pairs = MINIMAL.to_vec();
        pairs.push(("PUBLIC_IMAGES_PATH", "/static/img/"));
        assert_eq!(config_from(&pairs).unwrap().uploads.public_path, "/static/img");
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let config = config_from(&MINIMAL).unwrap();
        assert!(!format!("{:?}", config).contains("segredo"));
    }
}
