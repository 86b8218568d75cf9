// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::rbac::RoleKind;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub first_names: String,
    pub last_names: String,
    pub phone: Option<String>,
    pub country_code: Option<String>,
    pub role_id: i32,
    pub created_at: DateTime<Utc>,
}

// O que vai para o frontend: sem hash, com o nome do papel.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i32,
    pub email: String,
    pub first_names: String,
    pub last_names: String,
    pub phone: Option<String>,
    pub country_code: Option<String>,
    pub role_id: i32,
    pub role_name: String,
    pub created_at: DateTime<Utc>,
}

/// Só letras (inclusive acentuadas) e espaços.
pub fn validate_person_name(value: &str) -> Result<(), ValidationError> {
    let has_letters = value.chars().any(char::is_alphabetic);
    let only_letters = value.chars().all(|c| c.is_alphabetic() || c.is_whitespace());
    if !has_letters || !only_letters {
        let mut err = ValidationError::new("person_name");
        err.message = Some("Los nombres y apellidos solo pueden contener letras.".into());
        return Err(err);
    }
    Ok(())
}

/// "mARÍA   josé" -> "María José"
pub fn capitalize_words(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(custom(function = "validate_person_name"))]
    pub first_names: String,

    #[validate(custom(function = "validate_person_name"))]
    pub last_names: String,

    #[validate(email(message = "El correo proporcionado es inválido."))]
    #[schema(example = "ana.quispe@correo.pe")]
    pub email: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,

    #[validate(length(max = 20, message = "El celular es demasiado largo."))]
    pub phone: Option<String>,

    #[validate(length(max = 5, message = "El código de país es inválido."))]
    pub country_code: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "El correo proporcionado es inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "La contraseña es obligatoria."))]
    pub password: String,
}

// Edição feita pelo administrador na tela de usuários
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(custom(function = "validate_person_name"))]
    pub first_names: Option<String>,

    #[validate(custom(function = "validate_person_name"))]
    pub last_names: Option<String>,

    #[validate(length(max = 20, message = "El celular es demasiado largo."))]
    pub phone: Option<String>,

    #[validate(length(max = 5, message = "El código de país es inválido."))]
    pub country_code: Option<String>,

    pub role_id: Option<i32>,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,      // Subject (ID do usuário)
    pub email: String,
    pub role: i32,     // ID do papel, para o guard não precisar ir ao banco
    pub exp: usize,    // Expiration time
    pub iat: usize,    // Issued At
}

/// O usuário da requisição atual, montado a partir das claims.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: i32,
    pub email: String,
    pub role: RoleKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_each_word_and_collapses_spaces() {
        assert_eq!(capitalize_words("mARÍA   josé"), "María José");
        assert_eq!(capitalize_words("  quispe huamán "), "Quispe Huamán");
    }

    #[test]
    fn names_reject_digits_and_symbols() {
        assert!(validate_person_name("Ana Lucía").is_ok());
        assert!(validate_person_name("Ana2").is_err());
        assert!(validate_person_name("   ").is_err());
        assert!(validate_person_name("Ana_Lucía").is_err());
    }

    #[test]
    fn register_payload_reports_each_bad_field() {
        let payload = RegisterUserPayload {
            first_names: "R2D2".into(),
            last_names: "Pérez".into(),
            email: "no-es-correo".into(),
            password: "123".into(),
            phone: None,
            country_code: None,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_names") || fields.contains_key("firstNames"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("last_names") && !fields.contains_key("lastNames"));
    }
}
