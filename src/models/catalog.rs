// src/models/catalog.rs
// Tabelas auxiliares do catálogo: categorias, materiais, marcas e cores.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: i32,
    pub name: String,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub id: i32,
    pub name: String,
    pub code: String,
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("El campo es obligatorio.".into());
        return Err(err);
    }
    Ok(())
}

/// Aceita `#RGB` e `#RRGGBB`.
pub fn validate_color_code(value: &str) -> Result<(), ValidationError> {
    let hex = value.trim().strip_prefix('#').unwrap_or("");
    let valid_len = hex.len() == 3 || hex.len() == 6;
    if !valid_len || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        let mut err = ValidationError::new("color_code");
        err.message = Some("El código de color debe tener el formato #RRGGBB.".into());
        return Err(err);
    }
    Ok(())
}

// Payload usado por categorias e materiais (só têm nome).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NamePayload {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Chalinas")]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    pub logo: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColorPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_color_code"))]
    #[schema(example = "#B22222")]
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_codes() {
        assert!(validate_color_code("#FF00aa").is_ok());
        assert!(validate_color_code("#fff").is_ok());
        assert!(validate_color_code("FF00AA").is_err());
        assert!(validate_color_code("#GG0000").is_err());
        assert!(validate_color_code("#FF00A").is_err());
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(NamePayload { name: "  ".into() }.validate().is_err());
        assert!(NamePayload { name: "Lana de alpaca".into() }.validate().is_ok());
    }
}
