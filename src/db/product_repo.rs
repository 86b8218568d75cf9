// src/db/product_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::common::db_utils::{on_missing_reference, on_unique_violation};
use crate::common::error::AppError;
use crate::models::product::{
    ColorImage, ColorStock, CreateProductPayload, ProductFilter, ProductPromotion, ProductRow,
    UpdateProductPayload,
};

const PRODUCT_SELECT: &str = r#"
    SELECT
        p.id, p.name, p.description, p.image, p.price, p.stock,
        p.category_id, c.name AS category_name,
        p.material_id, m.name AS material_name,
        p.brand_id, b.name AS brand_name, b.logo AS brand_logo,
        p.created_at
    FROM products p
    JOIN categories c ON c.id = p.category_id
    LEFT JOIN materials m ON m.id = p.material_id
    LEFT JOIN brands b ON b.id = p.brand_id
"#;

const COLOR_IMAGE_SELECT: &str = r#"
    SELECT ci.id, ci.product_id, ci.color_id, co.name AS color_name, co.code AS color_code, ci.image
    FROM product_color_images ci
    JOIN colors co ON co.id = ci.color_id
"#;

const COLOR_STOCK_SELECT: &str = r#"
    SELECT cs.id, cs.product_id, cs.color_id, co.name AS color_name, co.code AS color_code, cs.quantity
    FROM product_color_stocks cs
    JOIN colors co ON co.id = cs.color_id
"#;

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura (catálogo)
    // ---

    pub async fn list_rows(&self, filter: &ProductFilter) -> Result<Vec<ProductRow>, AppError> {
        let sql = format!(
            r#"{}
            WHERE ($1::INTEGER IS NULL OR p.category_id = $1)
              AND ($2::NUMERIC IS NULL OR p.price <= $2)
            ORDER BY p.id"#,
            PRODUCT_SELECT
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(filter.category_id)
            .bind(filter.max_price)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_row(&self, id: i32) -> Result<Option<ProductRow>, AppError> {
        let sql = format!("{} WHERE p.id = $1", PRODUCT_SELECT);
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn exists<'e, E>(&self, executor: E, id: i32) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    // As relações são buscadas em lote (`ANY`) e agrupadas pelo serviço.
    pub async fn color_images_for(&self, product_ids: &[i32]) -> Result<Vec<ColorImage>, AppError> {
        let sql = format!("{} WHERE ci.product_id = ANY($1) ORDER BY ci.id", COLOR_IMAGE_SELECT);
        let images = sqlx::query_as::<_, ColorImage>(&sql)
            .bind(product_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(images)
    }

    pub async fn color_stocks_for(&self, product_ids: &[i32]) -> Result<Vec<ColorStock>, AppError> {
        let sql = format!("{} WHERE cs.product_id = ANY($1) ORDER BY cs.id", COLOR_STOCK_SELECT);
        let stocks = sqlx::query_as::<_, ColorStock>(&sql)
            .bind(product_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(stocks)
    }

    pub async fn promotions_for(&self, product_ids: &[i32]) -> Result<Vec<ProductPromotion>, AppError> {
        let promotions = sqlx::query_as::<_, ProductPromotion>(
            r#"
            SELECT pp.id, pp.product_id, pp.promotion_id, pp.active,
                   pr.name, pr.discount_percent, pr.starts_on, pr.ends_on
            FROM product_promotions pp
            JOIN promotions pr ON pr.id = pp.promotion_id
            WHERE pp.product_id = ANY($1)
            ORDER BY pp.id
            "#,
        )
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(promotions)
    }

    // ---
    // Escrita
    // ---

    pub async fn insert<'e, E>(&self, executor: E, payload: &CreateProductPayload, category_id: i32) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO products (
                name, description, image, price, stock,
                category_id, material_id, brand_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(payload.name.trim())
        .bind(payload.description.trim())
        .bind(payload.image.as_deref())
        .bind(payload.price)
        .bind(payload.stock)
        .bind(category_id)
        .bind(payload.material_id)
        .bind(payload.brand_id)
        .fetch_one(executor)
        .await
        .map_err(on_missing_reference)?;

        Ok(id)
    }

    /// Campos ausentes ficam como estão; `stock` só muda quando veio no JSON
    /// (inclusive como `null`).
    pub async fn update<'e, E>(&self, executor: E, id: i32, changes: &UpdateProductPayload) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE products SET
                name        = COALESCE($2, name),
                description = COALESCE($3, description),
                price       = COALESCE($4, price),
                category_id = COALESCE($5, category_id),
                material_id = COALESCE($6, material_id),
                brand_id    = COALESCE($7, brand_id),
                image       = COALESCE($8, image),
                stock       = CASE WHEN $9 THEN $10 ELSE stock END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref().map(str::trim))
        .bind(changes.description.as_deref().map(str::trim))
        .bind(changes.price)
        .bind(changes.category_id)
        .bind(changes.material_id)
        .bind(changes.brand_id)
        .bind(changes.image.as_deref())
        .bind(changes.stock.is_some())
        .bind(changes.stock.flatten())
        .execute(executor)
        .await
        .map_err(on_missing_reference)?;

        Ok(result.rows_affected() > 0)
    }

    // Só atualiza pares que já existem; pares desconhecidos são ignorados.
    pub async fn set_color_quantity<'e, E>(&self, executor: E, product_id: i32, color_id: i32, quantity: i32) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE product_color_stocks SET quantity = $3 WHERE product_id = $1 AND color_id = $2")
            .bind(product_id)
            .bind(color_id)
            .bind(quantity)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn set_color_image<'e, E>(&self, executor: E, product_id: i32, color_id: i32, image: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE product_color_images SET image = $3 WHERE product_id = $1 AND color_id = $2")
            .bind(product_id)
            .bind(color_id)
            .bind(image)
            .execute(executor)
            .await?;
        Ok(())
    }

    // ---
    // Remoção em cascata (sempre dentro de uma transação)
    // ---

    pub async fn delete_promotion_links<'e, E>(&self, executor: E, product_id: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM product_promotions WHERE product_id = $1")
            .bind(product_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Apaga as imagens por cor e devolve os nomes dos arquivos.
    pub async fn delete_color_images<'e, E>(&self, executor: E, product_id: i32) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let files: Vec<String> =
            sqlx::query_scalar("DELETE FROM product_color_images WHERE product_id = $1 RETURNING image")
                .bind(product_id)
                .fetch_all(executor)
                .await?;
        Ok(files)
    }

    pub async fn delete_color_stocks<'e, E>(&self, executor: E, product_id: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM product_color_stocks WHERE product_id = $1")
            .bind(product_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// `None` se o produto não existia; senão a imagem principal (se havia).
    pub async fn delete_product<'e, E>(&self, executor: E, id: i32) -> Result<Option<Option<String>>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let image: Option<Option<String>> =
            sqlx::query_scalar("DELETE FROM products WHERE id = $1 RETURNING image")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(image)
    }

    // ---
    // Variantes de cor
    // ---

    pub async fn list_color_images(&self, product_id: i32) -> Result<Vec<ColorImage>, AppError> {
        self.color_images_for(&[product_id]).await
    }

    pub async fn list_color_stocks(&self, product_id: i32) -> Result<Vec<ColorStock>, AppError> {
        self.color_stocks_for(&[product_id]).await
    }

    pub async fn insert_color_image<'e, E>(&self, executor: E, product_id: i32, color_id: i32, image: &str) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO product_color_images (product_id, color_id, image) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(product_id)
        .bind(color_id)
        .bind(image)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            let missing_color = matches!(
                &e,
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation()
            );
            if missing_color {
                on_missing_reference(e)
            } else {
                on_unique_violation(e, || AppError::ColorVariantAlreadyExists)
            }
        })?;
        Ok(id)
    }

    // Se já havia estoque para o par, a quantidade é substituída.
    pub async fn upsert_color_stock<'e, E>(&self, executor: E, product_id: i32, color_id: i32, quantity: i32) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO product_color_stocks (product_id, color_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_id, color_id) DO UPDATE SET quantity = EXCLUDED.quantity
            RETURNING id
            "#,
        )
        .bind(product_id)
        .bind(color_id)
        .bind(quantity)
        .fetch_one(executor)
        .await
        .map_err(on_missing_reference)?;
        Ok(id)
    }

    pub async fn find_color_image<'e, E>(&self, executor: E, product_id: i32, color_id: i32) -> Result<Option<ColorImage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE ci.product_id = $1 AND ci.color_id = $2", COLOR_IMAGE_SELECT);
        let image = sqlx::query_as::<_, ColorImage>(&sql)
            .bind(product_id)
            .bind(color_id)
            .fetch_optional(executor)
            .await?;
        Ok(image)
    }

    pub async fn find_color_stock<'e, E>(&self, executor: E, product_id: i32, color_id: i32) -> Result<Option<ColorStock>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE cs.product_id = $1 AND cs.color_id = $2", COLOR_STOCK_SELECT);
        let stock = sqlx::query_as::<_, ColorStock>(&sql)
            .bind(product_id)
            .bind(color_id)
            .fetch_optional(executor)
            .await?;
        Ok(stock)
    }

    pub async fn delete_color_stock<'e, E>(&self, executor: E, product_id: i32, color_id: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM product_color_stocks WHERE product_id = $1 AND color_id = $2")
            .bind(product_id)
            .bind(color_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Devolve o arquivo da imagem removida, se o par existia.
    pub async fn delete_color_image<'e, E>(&self, executor: E, product_id: i32, color_id: i32) -> Result<Option<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let image: Option<String> = sqlx::query_scalar(
            "DELETE FROM product_color_images WHERE product_id = $1 AND color_id = $2 RETURNING image",
        )
        .bind(product_id)
        .bind(color_id)
        .fetch_optional(executor)
        .await?;
        Ok(image)
    }
}
