// src/services/promotion_service.rs

use sqlx::PgPool;

use crate::{
    common::error::{AppError, Resource},
    db::{promotion_repo::PromotionFields, PromotionRepository},
    models::promotion::{PromotionListing, PromotionPayload, PromotionResponse},
};

impl<'a> From<&'a PromotionPayload> for PromotionFields<'a> {
    fn from(payload: &'a PromotionPayload) -> Self {
        PromotionFields {
            name: payload.name.trim(),
            discount_percent: payload.discount_percent,
            starts_on: payload.starts_on,
            ends_on: payload.ends_on,
        }
    }
}

#[derive(Clone)]
pub struct PromotionService {
    pool: PgPool,
    repo: PromotionRepository,
}

impl PromotionService {
    pub fn new(pool: PgPool, repo: PromotionRepository) -> Self {
        Self { pool, repo }
    }

    pub async fn list_promotions(&self) -> Result<Vec<PromotionListing>, AppError> {
        self.repo.list_listings().await
    }

    // Promoção nova já nasce vinculada ao produto e, salvo indicação, ativa.
    pub async fn create_promotion(&self, payload: &PromotionPayload) -> Result<PromotionResponse, AppError> {
        let product_id = payload
            .product_id
            .ok_or_else(|| AppError::BadRequest("productId".into()))?;
        let active = payload.active.unwrap_or(true);

        let mut tx = self.pool.begin().await?;

        let promotion = self.repo.insert(&mut *tx, &payload.into()).await?;
        let link = self
            .repo
            .insert_link(&mut *tx, promotion.id, product_id, active)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Promoção '{}' ({}%) criada para o produto {}",
            promotion.name,
            promotion.discount_percent,
            product_id
        );
        Ok(PromotionResponse { promotion, links: vec![link] })
    }

    pub async fn update_promotion(&self, id: i32, payload: &PromotionPayload) -> Result<PromotionResponse, AppError> {
        let product_id = payload
            .product_id
            .ok_or_else(|| AppError::BadRequest("productId".into()))?;

        let mut tx = self.pool.begin().await?;

        let promotion = self
            .repo
            .update(&mut *tx, id, &payload.into())
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Promotion))?;

        let mut links = self
            .repo
            .repoint_links(&mut *tx, id, product_id, payload.active)
            .await?;
        if links.is_empty() {
            let active = payload.active.unwrap_or(true);
            links.push(self.repo.insert_link(&mut *tx, id, product_id, active).await?);
        }

        tx.commit().await?;

        tracing::info!("Promoção {} atualizada", id);
        Ok(PromotionResponse { promotion, links })
    }

    pub async fn delete_promotion(&self, id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        self.repo.delete_links(&mut *tx, id).await?;
        if !self.repo.delete(&mut *tx, id).await? {
            return Err(AppError::ResourceNotFound(Resource::Promotion));
        }

        tx.commit().await?;
        tracing::info!("Promoção {} removida", id);
        Ok(())
    }
}
