// src/models/promotion.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::catalog::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: i32,
    pub name: String,
    pub discount_percent: Decimal,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
}

// Linha da tela de "Descuentos": vínculo + promoção + produto.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionListing {
    pub link_id: i32,
    pub active: bool,
    pub promotion_id: i32,
    pub name: String,
    pub discount_percent: Decimal,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub product_id: i32,
    pub product_name: String,
    pub product_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionLink {
    pub id: i32,
    pub product_id: i32,
    pub promotion_id: i32,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionResponse {
    #[serde(flatten)]
    pub promotion: Promotion,
    pub links: Vec<PromotionLink>,
}

/// 0 < desconto <= 100
pub fn validate_discount(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO || *val > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.add_param("max".into(), &100.0);
        err.message = Some("El descuento debe estar entre 0 y 100.".into());
        return Err(err);
    }
    Ok(())
}

// Criação e edição usam o mesmo formato (a tela manda todos os campos).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(custom(function = "validate_discount"))]
    #[schema(example = 20)]
    pub discount_percent: Decimal,

    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,

    #[validate(required(message = "El campo 'productId' es obligatorio."))]
    pub product_id: Option<i32>,

    /// Na edição, ausente mantém o estado de cada vínculo.
    pub active: Option<bool>,
}

impl PromotionPayload {
    pub fn validate_consistency(&self) -> Result<(), ValidationErrors> {
        if self.starts_on > self.ends_on {
            let mut errors = ValidationErrors::new();
            let mut err = ValidationError::new("date_range");
            err.message = Some("La fecha de inicio no puede ser posterior a la fecha de fin.".into());
            errors.add("endsOn", err);
            return Err(errors);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(discount: i64, starts: &str, ends: &str) -> PromotionPayload {
        PromotionPayload {
            name: "Invierno".into(),
            discount_percent: Decimal::from(discount),
            starts_on: starts.parse().unwrap(),
            ends_on: ends.parse().unwrap(),
            product_id: Some(1),
            active: None,
        }
    }

    #[test]
    fn discount_must_be_within_0_and_100() {
        assert!(payload(0, "2024-06-01", "2024-06-30").validate().is_err());
        assert!(payload(101, "2024-06-01", "2024-06-30").validate().is_err());
        assert!(payload(100, "2024-06-01", "2024-06-30").validate().is_ok());
    }

    #[test]
    fn start_after_end_is_rejected() {
        assert!(payload(10, "2024-07-01", "2024-06-30").validate_consistency().is_err());
        assert!(payload(10, "2024-06-30", "2024-06-30").validate_consistency().is_ok());
    }

    #[test]
    fn accepts_camel_case_json() {
        let parsed: PromotionPayload = serde_json::from_str(
            r#"{"name":"Día de la madre","discountPercent":15,"startsOn":"2024-05-01","endsOn":"2024-05-12","productId":4}"#,
        )
        .unwrap();
        assert_eq!(parsed.product_id, Some(4));
        assert_eq!(parsed.discount_percent, Decimal::from(15));
        assert_eq!(parsed.active, None);
    }
}
