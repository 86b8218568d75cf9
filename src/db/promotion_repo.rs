// src/db/promotion_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::common::db_utils::on_missing_reference;
use crate::common::error::AppError;
use crate::models::promotion::{Promotion, PromotionLink, PromotionListing};

/// Campos da promoção já validados.
pub struct PromotionFields<'a> {
    pub name: &'a str,
    pub discount_percent: Decimal,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
}

#[derive(Clone)]
pub struct PromotionRepository {
    pool: PgPool,
}

impl PromotionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Tela de descontos: uma linha por vínculo produto/promoção.
    pub async fn list_listings(&self) -> Result<Vec<PromotionListing>, AppError> {
        let rows = sqlx::query_as::<_, PromotionListing>(
            r#"
            SELECT
                pp.id AS link_id, pp.active,
                pr.id AS promotion_id, pr.name, pr.discount_percent, pr.starts_on, pr.ends_on,
                p.id AS product_id, p.name AS product_name, p.price AS product_price
            FROM product_promotions pp
            JOIN promotions pr ON pr.id = pp.promotion_id
            JOIN products p ON p.id = pp.product_id
            ORDER BY pp.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn insert<'e, E>(&self, executor: E, fields: &PromotionFields<'_>) -> Result<Promotion, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let promotion = sqlx::query_as::<_, Promotion>(
            r#"
            INSERT INTO promotions (name, discount_percent, starts_on, ends_on)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, discount_percent, starts_on, ends_on
            "#,
        )
        .bind(fields.name)
        .bind(fields.discount_percent)
        .bind(fields.starts_on)
        .bind(fields.ends_on)
        .fetch_one(executor)
        .await?;
        Ok(promotion)
    }

    pub async fn update<'e, E>(&self, executor: E, id: i32, fields: &PromotionFields<'_>) -> Result<Option<Promotion>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let promotion = sqlx::query_as::<_, Promotion>(
            r#"
            UPDATE promotions
            SET name = $2, discount_percent = $3, starts_on = $4, ends_on = $5
            WHERE id = $1
            RETURNING id, name, discount_percent, starts_on, ends_on
            "#,
        )
        .bind(id)
        .bind(fields.name)
        .bind(fields.discount_percent)
        .bind(fields.starts_on)
        .bind(fields.ends_on)
        .fetch_optional(executor)
        .await?;
        Ok(promotion)
    }

    pub async fn insert_link<'e, E>(&self, executor: E, promotion_id: i32, product_id: i32, active: bool) -> Result<PromotionLink, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PromotionLink>(
            r#"
            INSERT INTO product_promotions (product_id, promotion_id, active)
            VALUES ($1, $2, $3)
            RETURNING id, product_id, promotion_id, active
            "#,
        )
        .bind(product_id)
        .bind(promotion_id)
        .bind(active)
        .fetch_one(executor)
        .await
        .map_err(on_missing_reference)
    }

    /// Aponta todos os vínculos da promoção para `product_id`.
    /// Sem `active`, cada vínculo mantém o estado gravado.
    pub async fn repoint_links<'e, E>(&self, executor: E, promotion_id: i32, product_id: i32, active: Option<bool>) -> Result<Vec<PromotionLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PromotionLink>(
            r#"
            UPDATE product_promotions
            SET product_id = $2, active = COALESCE($3, active)
            WHERE promotion_id = $1
            RETURNING id, product_id, promotion_id, active
            "#,
        )
        .bind(promotion_id)
        .bind(product_id)
        .bind(active)
        .fetch_all(executor)
        .await
        .map_err(on_missing_reference)
    }

    pub async fn delete_links<'e, E>(&self, executor: E, promotion_id: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM product_promotions WHERE promotion_id = $1")
            .bind(promotion_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i32) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM promotions WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
