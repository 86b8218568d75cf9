// src/services/pricing.rs
// Regras de vitrine: preço promocional e como exibir o estoque.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::product::{ColorStock, ProductPromotion};

/// `price * (1 - percent/100)`, arredondado a 2 casas.
pub fn discounted_price(price: Decimal, discount_percent: Decimal) -> Decimal {
    let factor = Decimal::ONE - discount_percent / Decimal::ONE_HUNDRED;
    (price * factor).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A primeira promoção marcada como ativa (os vínculos vêm ordenados por id).
pub fn active_promotion(promotions: &[ProductPromotion]) -> Option<&ProductPromotion> {
    promotions.iter().find(|p| p.active)
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceTag {
    pub original: Decimal,
    /// Presente só com promoção ativa: é quando o preço original aparece riscado.
    pub discounted: Option<Decimal>,
    pub discount_percent: Option<Decimal>,
    pub promotion_id: Option<i32>,
}

impl PriceTag {
    pub fn for_product(price: Decimal, promotions: &[ProductPromotion]) -> Self {
        match active_promotion(promotions) {
            Some(promo) => Self {
                original: price,
                discounted: Some(discounted_price(price, promo.discount_percent)),
                discount_percent: Some(promo.discount_percent),
                promotion_id: Some(promo.promotion_id),
            },
            None => Self {
                original: price,
                discounted: None,
                discount_percent: None,
                promotion_id: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColorSwatch {
    pub color_id: i32,
    pub name: String,
    pub code: String,
    pub quantity: i32,
    /// Cor sem estoque aparece acinzentada no seletor.
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum StockDisplay {
    /// Estoque único do produto; o seletor de cores fica escondido.
    Flat { quantity: i32 },
    PerColor { total: i64, swatches: Vec<ColorSwatch> },
}

impl StockDisplay {
    pub fn for_product(flat_stock: Option<i32>, color_stocks: &[ColorStock]) -> Self {
        if let Some(quantity) = flat_stock {
            return StockDisplay::Flat { quantity };
        }

        let swatches: Vec<ColorSwatch> = color_stocks
            .iter()
            .map(|s| ColorSwatch {
                color_id: s.color_id,
                name: s.color_name.clone(),
                code: s.color_code.clone(),
                quantity: s.quantity,
                available: s.quantity > 0,
            })
            .collect();
        let total = swatches.iter().map(|s| i64::from(s.quantity)).sum();

        StockDisplay::PerColor { total, swatches }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn promo(id: i32, percent: &str, active: bool) -> ProductPromotion {
        ProductPromotion {
            id,
            product_id: 1,
            promotion_id: id * 10,
            active,
            name: format!("Promo {}", id),
            discount_percent: d(percent),
            starts_on: "2024-01-01".parse().unwrap(),
            ends_on: "2024-12-31".parse().unwrap(),
        }
    }

    fn stock(color_id: i32, quantity: i32) -> ColorStock {
        ColorStock {
            id: color_id,
            product_id: 1,
            color_id,
            color_name: format!("Color {}", color_id),
            color_code: "#000000".into(),
            quantity,
        }
    }

    #[test]
    fn discount_arithmetic() {
        assert_eq!(discounted_price(d("100"), d("20")), d("80.00"));
        assert_eq!(discounted_price(d("59.90"), d("15")), d("50.92")); // 50.915
        assert_eq!(discounted_price(d("35"), d("100")), d("0"));
        assert_eq!(discounted_price(d("19.99"), d("33.33")), d("13.33"));
    }

    #[test]
    fn price_tag_without_active_promotion_has_no_discount() {
        let tag = PriceTag::for_product(d("120"), &[promo(1, "30", false)]);
        assert_eq!(tag.discounted, None);
        assert_eq!(tag.original, d("120"));
        assert_eq!(tag.discount_percent, None);
    }

    #[test]
    fn price_tag_uses_first_active_promotion() {
        let promotions = [promo(1, "50", false), promo(2, "10", true), promo(3, "25", true)];
        let tag = PriceTag::for_product(d("80"), &promotions);
        assert_eq!(tag.discounted, Some(d("72")));
        assert_eq!(tag.promotion_id, Some(20));
    }

    #[test]
    fn flat_stock_hides_per_color_stock() {
        let display = StockDisplay::for_product(Some(4), &[stock(1, 10), stock(2, 0)]);
        assert_eq!(display, StockDisplay::Flat { quantity: 4 });
    }

    #[test]
    fn zero_flat_stock_is_still_flat() {
        assert_eq!(StockDisplay::for_product(Some(0), &[stock(1, 3)]), StockDisplay::Flat { quantity: 0 });
    }

    #[test]
    fn per_color_stock_sums_and_grays_out_empty_colors() {
        let display = StockDisplay::for_product(None, &[stock(1, 3), stock(2, 0), stock(3, 5)]);
        match &display {
            StockDisplay::PerColor { total, swatches } => {
                assert_eq!(*total, 8);
                let available: Vec<bool> = swatches.iter().map(|s| s.available).collect();
                assert_eq!(available, vec![true, false, true]);
            }
            other => panic!("esperava PerColor, veio {:?}", other),
        }
    }

    #[test]
    fn stock_display_serializes_with_mode_tag() {
        let json = serde_json::to_value(StockDisplay::for_product(None, &[stock(7, 2)])).unwrap();
        assert_eq!(json["mode"], "perColor");
        assert_eq!(json["total"], 2);
        assert_eq!(json["swatches"][0]["colorId"], 7);
        assert_eq!(json["swatches"][0]["available"], true);
    }
}
