use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

/// Entidades que podem aparecer numa mensagem de "não encontrado" ou "em uso".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Product,
    Category,
    Material,
    Brand,
    Color,
    ColorVariant,
    Promotion,
    User,
    Role,
    File,
}

impl Resource {
    pub fn key(self) -> &'static str {
        match self {
            Resource::Product => "resource.product",
            Resource::Category => "resource.category",
            Resource::Material => "resource.material",
            Resource::Brand => "resource.brand",
            Resource::Color => "resource.color",
            Resource::ColorVariant => "resource.color_variant",
            Resource::Promotion => "resource.promotion",
            Resource::User => "resource.user",
            Resource::Role => "resource.role",
            Resource::File => "resource.file",
        }
    }
}

// Nosso tipo de erro, com `thiserror` para a ergonomia dos `From`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Não encontrado: {0:?}")]
    ResourceNotFound(Resource),

    #[error("Em uso: {0:?}")]
    ResourceInUse(Resource),

    #[error("Nome já existe: {0}")]
    NameAlreadyExists(String),

    #[error("Já existe imagem para esta cor neste produto")]
    ColorVariantAlreadyExists,

    #[error("Nome de arquivo inválido: {0}")]
    InvalidFileName(String),

    #[error("Tipo de arquivo não suportado: {0}")]
    UnsupportedFileType(String),

    #[error("Nenhum arquivo enviado")]
    MissingUpload,

    #[error("Arquivo maior que o limite")]
    UploadTooLarge,

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    #[error("Erro de configuração: {0}")]
    ConfigError(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de E/S: {0}")]
    IoError(#[from] std::io::Error),

    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidFileName(_)
            | AppError::UnsupportedFileType(_)
            | AppError::MissingUpload
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UploadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists
            | AppError::ResourceInUse(_)
            | AppError::NameAlreadyExists(_)
            | AppError::ColorVariantAlreadyExists => StatusCode::CONFLICT,
            AppError::ConfigError(_)
            | AppError::DatabaseError(_)
            | AppError::IoError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "error.validation",
            AppError::EmailAlreadyExists => "error.email_taken",
            AppError::InvalidCredentials => "error.invalid_credentials",
            AppError::InvalidToken => "error.invalid_token",
            AppError::Forbidden => "error.forbidden",
            AppError::ResourceNotFound(_) => "error.not_found",
            AppError::ResourceInUse(_) => "error.in_use",
            AppError::NameAlreadyExists(_) => "error.name_taken",
            AppError::ColorVariantAlreadyExists => "error.color_variant_exists",
            AppError::InvalidFileName(_) => "error.invalid_file_name",
            AppError::UnsupportedFileType(_) => "error.unsupported_file_type",
            AppError::MissingUpload => "error.missing_upload",
            AppError::UploadTooLarge => "error.upload_too_large",
            AppError::BadRequest(_) => "error.bad_request",
            _ => "error.internal",
        }
    }

    /// Converte o erro na resposta final, já traduzida para o idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();
        let lang = locale.0.as_str();

        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let arg = match &self {
            AppError::ResourceNotFound(resource) | AppError::ResourceInUse(resource) => {
                Some(store.translate(lang, resource.key()))
            }
            AppError::NameAlreadyExists(value)
            | AppError::InvalidFileName(value)
            | AppError::UnsupportedFileType(value)
            | AppError::BadRequest(value) => Some(value.clone()),
            _ => None,
        };

        let error = match arg {
            Some(arg) => store.format(lang, self.message_key(), &[arg.as_str()]),
            None => store.translate(lang, self.message_key()),
        };

        let details = match self {
            AppError::ValidationError(errors) => Some(validation_details(&errors)),
            _ => None,
        };

        ApiError { status, error, details }
    }
}

// Retorna todos os detalhes da validação, campo a campo.
fn validation_details(errors: &validator::ValidationErrors) -> Value {
    let mut details = HashMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        details.insert(field.to_string(), messages);
    }
    json!(details)
}

/// O erro já pronto para ir para o cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    fn store() -> I18nStore {
        I18nStore::embedded().expect("catálogos embutidos")
    }

    #[test]
    fn not_found_is_localized_with_resource_name() {
        let api = AppError::ResourceNotFound(Resource::Product)
            .to_api_error(&Locale("es".into()), &store());
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Producto no encontrado.");

        let api = AppError::ResourceNotFound(Resource::Product)
            .to_api_error(&Locale("en".into()), &store());
        assert_eq!(api.error, "Product not found.");
    }

    #[test]
    fn conflicts_map_to_409() {
        assert_eq!(AppError::EmailAlreadyExists.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::ColorVariantAlreadyExists.status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::ResourceInUse(Resource::Category).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn internal_errors_hide_details() {
        let api = AppError::ConfigError("JWT_SECRET ausente".into())
            .to_api_error(&Locale("es".into()), &store());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("JWT_SECRET"));
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("range");
        err.message = Some("El precio debe ser mayor que cero.".into());
        errors.add("price", err);

        let api = AppError::ValidationError(errors).to_api_error(&Locale("es".into()), &store());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("detalhes");
        assert_eq!(details["price"][0], "El precio debe ser mayor que cero.");
    }
}
