// src/models/product.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::catalog::validate_not_blank;
use crate::services::pricing::{PriceTag, StockDisplay};

// --- Linha do produto, já com os nomes das tabelas relacionadas ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub price: Decimal,
    pub stock: Option<i32>, // Estoque "plano". NULL -> estoque por cor.
    pub category_id: i32,
    pub category_name: String,
    pub material_id: Option<i32>,
    pub material_name: Option<String>,
    pub brand_id: Option<i32>,
    pub brand_name: Option<String>,
    pub brand_logo: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- Imagem de um produto numa cor ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColorImage {
    pub id: i32,
    pub product_id: i32,
    pub color_id: i32,
    pub color_name: String,
    pub color_code: String,
    pub image: String,
}

// --- Estoque de um produto numa cor ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColorStock {
    pub id: i32,
    pub product_id: i32,
    pub color_id: i32,
    pub color_name: String,
    pub color_code: String,
    pub quantity: i32,
}

// --- Vínculo produto <-> promoção, com os dados da promoção ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPromotion {
    pub id: i32,
    pub product_id: i32,
    pub promotion_id: i32,
    pub active: bool,
    pub name: String,
    pub discount_percent: Decimal,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
}

/// Resposta do catálogo: o produto com tudo o que a página de detalhe precisa.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductRow,
    pub color_images: Vec<ColorImage>,
    pub color_stocks: Vec<ColorStock>,
    pub promotions: Vec<ProductPromotion>,
    pub price_tag: PriceTag,
    pub stock_display: StockDisplay,
}

impl ProductDetail {
    pub fn assemble(
        product: ProductRow,
        color_images: Vec<ColorImage>,
        color_stocks: Vec<ColorStock>,
        promotions: Vec<ProductPromotion>,
    ) -> Self {
        let price_tag = PriceTag::for_product(product.price, &promotions);
        let stock_display = StockDisplay::for_product(product.stock, &color_stocks);
        Self {
            product,
            color_images,
            color_stocks,
            promotions,
            price_tag,
            stock_display,
        }
    }
}

// Filtros do catálogo público (?categoryId=1&maxPrice=120)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// Só produtos desta categoria
    pub category_id: Option<i32>,
    /// Preço máximo (inclusive)
    #[param(value_type = Option<f64>)]
    pub max_price: Option<Decimal>,
}

pub fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("El precio debe ser un número mayor que cero.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: CreateProduct
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = 89.9)]
    pub price: Decimal,

    #[validate(range(min = 0, message = "El stock no puede ser negativo."))]
    pub stock: Option<i32>,

    #[validate(required(message = "El campo 'categoryId' es obligatorio."))]
    pub category_id: Option<i32>,

    pub material_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColorStockUpdate {
    pub color_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColorImageUpdate {
    pub color_id: i32,
    pub image: String,
}

// Distingue "campo ausente" (None) de "campo null" (Some(None)).
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ---
// Payload: UpdateProduct (parcial)
// ---
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_positive"))]
    pub price: Option<Decimal>,

    /// `"stock": null` limpa o estoque plano e passa o produto para estoque por cor.
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i32>)]
    pub stock: Option<Option<i32>>,

    pub category_id: Option<i32>,
    pub material_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub image: Option<String>,

    pub color_stocks: Option<Vec<ColorStockUpdate>>,
    pub color_images: Option<Vec<ColorImageUpdate>>,
}

impl UpdateProductPayload {
    // Regras que o derive não cobre: campos aninhados e o estoque "duplo Option".
    pub fn validate_consistency(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(Some(stock)) = self.stock {
            if stock < 0 {
                let mut err = ValidationError::new("range");
                err.message = Some("El stock no puede ser negativo.".into());
                errors.add("stock", err);
            }
        }

        if let Some(stocks) = &self.color_stocks {
            if stocks.iter().any(|s| s.quantity < 0) {
                let mut err = ValidationError::new("range");
                err.message = Some("La cantidad por color no puede ser negativa.".into());
                errors.add("colorStocks", err);
            }
        }

        if let Some(images) = &self.color_images {
            if images.iter().any(|i| i.image.trim().is_empty()) {
                let mut err = ValidationError::new("required");
                err.message = Some("La imagen del color es obligatoria.".into());
                errors.add("colorImages", err);
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

// ---
// Payload: AddColorVariant (imagem + estoque de uma cor)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddColorVariantPayload {
    #[validate(required(message = "El campo 'colorId' es obligatorio."))]
    pub color_id: Option<i32>,

    #[validate(custom(function = "validate_not_blank"))]
    pub image: String,

    #[validate(range(min = 0, message = "La cantidad no puede ser negativa."))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColorVariant {
    pub image: ColorImage,
    pub stock: Option<ColorStock>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_null_is_distinguished_from_absent() {
        let absent: UpdateProductPayload = serde_json::from_str(r#"{"name":"Chalina"}"#).unwrap();
        assert_eq!(absent.stock, None);

        let cleared: UpdateProductPayload = serde_json::from_str(r#"{"stock":null}"#).unwrap();
        assert_eq!(cleared.stock, Some(None));

        let set: UpdateProductPayload = serde_json::from_str(r#"{"stock":7}"#).unwrap();
        assert_eq!(set.stock, Some(Some(7)));
    }

    #[test]
    fn negative_quantities_fail_consistency() {
        let payload: UpdateProductPayload = serde_json::from_str(
            r#"{"stock":-1,"colorStocks":[{"colorId":1,"quantity":-3}]}"#,
        )
        .unwrap();
        let errors = payload.validate_consistency().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("stock"));
        assert!(fields.contains_key("colorStocks"));
    }

    #[test]
    fn create_payload_requires_positive_price_and_category() {
        let payload = CreateProductPayload {
            name: "Gorro".into(),
            description: "Gorro de lana".into(),
            price: Decimal::ZERO,
            stock: Some(3),
            category_id: None,
            material_id: None,
            brand_id: None,
            image: None,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("category_id") || fields.contains_key("categoryId"));
    }
}
