// src/services/product_service.rs

use std::collections::HashMap;
use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    common::error::{AppError, Resource},
    db::ProductRepository,
    models::product::{
        AddColorVariantPayload, ColorImage, ColorStock, ColorVariant, CreateProductPayload,
        ProductDetail, ProductFilter, UpdateProductPayload,
    },
    services::image_store::{remove_quietly, ImageStore},
};

/// Agrupa as linhas filhas pelo produto dono, preservando a ordem de chegada.
fn group_by_product<T>(items: Vec<T>, product_id: impl Fn(&T) -> i32) -> HashMap<i32, Vec<T>> {
    let mut grouped: HashMap<i32, Vec<T>> = HashMap::new();
    for item in items {
        grouped.entry(product_id(&item)).or_default().push(item);
    }
    grouped
}

/// Cada imagem por cor com o estoque da mesma cor (quando existe).
fn pair_variants(images: Vec<ColorImage>, stocks: Vec<ColorStock>) -> Vec<ColorVariant> {
    let mut by_color: HashMap<i32, ColorStock> =
        stocks.into_iter().map(|s| (s.color_id, s)).collect();
    images
        .into_iter()
        .map(|image| ColorVariant {
            stock: by_color.remove(&image.color_id),
            image,
        })
        .collect()
}

#[derive(Clone)]
pub struct ProductService {
    pool: PgPool,
    repo: ProductRepository,
    image_store: Arc<dyn ImageStore>,
}

impl ProductService {
    pub fn new(pool: PgPool, repo: ProductRepository, image_store: Arc<dyn ImageStore>) -> Self {
        Self { pool, repo, image_store }
    }

    // ---
    // Catálogo
    // ---

    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductDetail>, AppError> {
        let rows = self.repo.list_rows(filter).await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut images = group_by_product(self.repo.color_images_for(&ids).await?, |i| i.product_id);
        let mut stocks = group_by_product(self.repo.color_stocks_for(&ids).await?, |s| s.product_id);
        let mut promotions = group_by_product(self.repo.promotions_for(&ids).await?, |p| p.product_id);

        let details = rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                ProductDetail::assemble(
                    row,
                    images.remove(&id).unwrap_or_default(),
                    stocks.remove(&id).unwrap_or_default(),
                    promotions.remove(&id).unwrap_or_default(),
                )
            })
            .collect();

        Ok(details)
    }

    pub async fn get_product(&self, id: i32) -> Result<ProductDetail, AppError> {
        let row = self
            .repo
            .find_row(id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Product))?;

        let ids = [id];
        let images = self.repo.color_images_for(&ids).await?;
        let stocks = self.repo.color_stocks_for(&ids).await?;
        let promotions = self.repo.promotions_for(&ids).await?;

        Ok(ProductDetail::assemble(row, images, stocks, promotions))
    }

    // ---
    // Administração
    // ---

    pub async fn create_product(&self, payload: &CreateProductPayload) -> Result<ProductDetail, AppError> {
        let category_id = payload
            .category_id
            .ok_or_else(|| AppError::BadRequest("categoryId".into()))?;

        let mut tx = self.pool.begin().await?;
        let id = self.repo.insert(&mut *tx, payload, category_id).await?;
        tx.commit().await?;

        tracing::info!("Produto criado: {} ({})", payload.name.trim(), id);
        self.get_product(id).await
    }

    pub async fn update_product(&self, id: i32, payload: &UpdateProductPayload) -> Result<ProductDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        if !self.repo.update(&mut *tx, id, payload).await? {
            return Err(AppError::ResourceNotFound(Resource::Product));
        }

        for stock in payload.color_stocks.iter().flatten() {
            self.repo
                .set_color_quantity(&mut *tx, id, stock.color_id, stock.quantity)
                .await?;
        }

        for image in payload.color_images.iter().flatten() {
            self.repo
                .set_color_image(&mut *tx, id, image.color_id, image.image.trim())
                .await?;
        }

        tx.commit().await?;

        tracing::info!("Produto {} atualizado", id);
        self.get_product(id).await
    }

    /// Vínculos de promoção, imagens por cor, estoques por cor e o produto,
    /// numa transação. Os arquivos só saem do disco depois do commit.
    pub async fn delete_product(&self, id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        self.repo.delete_promotion_links(&mut *tx, id).await?;
        let mut files = self.repo.delete_color_images(&mut *tx, id).await?;
        self.repo.delete_color_stocks(&mut *tx, id).await?;

        let main_image = self
            .repo
            .delete_product(&mut *tx, id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Product))?;

        tx.commit().await?;
        tracing::info!("Produto {} removido", id);

        files.extend(main_image);
        for file in &files {
            remove_quietly(self.image_store.as_ref(), file).await;
        }
        Ok(())
    }

    // ---
    // Variantes de cor
    // ---

    pub async fn list_color_variants(&self, product_id: i32) -> Result<Vec<ColorVariant>, AppError> {
        if !self.repo.exists(&self.pool, product_id).await? {
            return Err(AppError::ResourceNotFound(Resource::Product));
        }

        let images = self.repo.list_color_images(product_id).await?;
        let stocks = self.repo.list_color_stocks(product_id).await?;
        Ok(pair_variants(images, stocks))
    }

    pub async fn add_color_variant(&self, product_id: i32, payload: &AddColorVariantPayload) -> Result<ColorVariant, AppError> {
        let color_id = payload
            .color_id
            .ok_or_else(|| AppError::BadRequest("colorId".into()))?;

        let mut tx = self.pool.begin().await?;

        if !self.repo.exists(&mut *tx, product_id).await? {
            return Err(AppError::ResourceNotFound(Resource::Product));
        }

        self.repo
            .insert_color_image(&mut *tx, product_id, color_id, payload.image.trim())
            .await?;
        self.repo
            .upsert_color_stock(&mut *tx, product_id, color_id, payload.quantity)
            .await?;

        let image = self
            .repo
            .find_color_image(&mut *tx, product_id, color_id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::ColorVariant))?;
        let stock = self.repo.find_color_stock(&mut *tx, product_id, color_id).await?;

        tx.commit().await?;

        tracing::info!("Cor {} adicionada ao produto {}", color_id, product_id);
        Ok(ColorVariant { image, stock })
    }

    pub async fn delete_color_variant(&self, product_id: i32, color_id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let removed_stock = self.repo.delete_color_stock(&mut *tx, product_id, color_id).await?;
        let removed_image = self.repo.delete_color_image(&mut *tx, product_id, color_id).await?;

        if removed_stock == 0 && removed_image.is_none() {
            return Err(AppError::ResourceNotFound(Resource::ColorVariant));
        }

        tx.commit().await?;
        tracing::info!("Cor {} removida do produto {}", color_id, product_id);

        if let Some(file) = removed_image {
            remove_quietly(self.image_store.as_ref(), &file).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(product_id: i32, color_id: i32) -> ColorImage {
        ColorImage {
            id: product_id * 100 + color_id,
            product_id,
            color_id,
            color_name: format!("Color {}", color_id),
            color_code: "#FFFFFF".into(),
            image: format!("p{}-c{}.png", product_id, color_id),
        }
    }

    fn stock(product_id: i32, color_id: i32, quantity: i32) -> ColorStock {
        ColorStock {
            id: product_id * 100 + color_id,
            product_id,
            color_id,
            color_name: format!("Color {}", color_id),
            color_code: "#FFFFFF".into(),
            quantity,
        }
    }

    #[test]
    fn groups_children_by_product_in_order() {
        let grouped = group_by_product(
            vec![image(1, 3), image(2, 1), image(1, 1)],
            |i| i.product_id,
        );
        let colors: Vec<i32> = grouped[&1].iter().map(|i| i.color_id).collect();
        assert_eq!(colors, vec![3, 1]);
        assert_eq!(grouped[&2].len(), 1);
        assert!(!grouped.contains_key(&3));
    }

    #[test]
    fn variants_pair_image_with_same_color_stock() {
        let variants = pair_variants(
            vec![image(1, 1), image(1, 2)],
            vec![stock(1, 2, 9), stock(1, 5, 4)],
        );
        assert_eq!(variants.len(), 2);
        assert!(variants[0].stock.is_none());
        assert_eq!(variants[1].stock.as_ref().map(|s| s.quantity), Some(9));
    }
}
