// src/services/catalog_service.rs

use std::sync::Arc;

use crate::common::error::{AppError, Resource};
use crate::db::catalog_repo::NamedTable;
use crate::db::CatalogRepository;
use crate::models::catalog::{Brand, BrandPayload, Category, Color, ColorPayload, Material};
use crate::services::image_store::{remove_quietly, ImageStore};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
    image_store: Arc<dyn ImageStore>,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository, image_store: Arc<dyn ImageStore>) -> Self {
        Self { repo, image_store }
    }

    // --- Categorias ---

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.repo.list_categories().await
    }

    pub async fn create_category(&self, name: &str) -> Result<Category, AppError> {
        let category = self.repo.create_category(name.trim()).await?;
        tracing::info!("Categoria criada: {} ({})", category.name, category.id);
        Ok(category)
    }

    pub async fn rename_category(&self, id: i32, name: &str) -> Result<Category, AppError> {
        self.repo
            .rename_category(id, name.trim())
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Category))
    }

    // --- Materiais ---

    pub async fn list_materials(&self) -> Result<Vec<Material>, AppError> {
        self.repo.list_materials().await
    }

    pub async fn create_material(&self, name: &str) -> Result<Material, AppError> {
        let material = self.repo.create_material(name.trim()).await?;
        tracing::info!("Material criado: {} ({})", material.name, material.id);
        Ok(material)
    }

    pub async fn rename_material(&self, id: i32, name: &str) -> Result<Material, AppError> {
        self.repo
            .rename_material(id, name.trim())
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Material))
    }

    /// Categorias e materiais são apagados do mesmo jeito.
    pub async fn delete_named(&self, table: NamedTable, id: i32) -> Result<(), AppError> {
        if !self.repo.delete_named(table, id).await? {
            return Err(AppError::ResourceNotFound(table.resource()));
        }
        tracing::info!("{:?} {} removido", table, id);
        Ok(())
    }

    // --- Marcas ---

    pub async fn list_brands(&self) -> Result<Vec<Brand>, AppError> {
        self.repo.list_brands().await
    }

    pub async fn create_brand(&self, payload: &BrandPayload) -> Result<Brand, AppError> {
        let brand = self
            .repo
            .create_brand(payload.name.trim(), payload.logo.as_deref())
            .await?;
        tracing::info!("Marca criada: {} ({})", brand.name, brand.id);
        Ok(brand)
    }

    pub async fn update_brand(&self, id: i32, payload: &BrandPayload) -> Result<Brand, AppError> {
        self.repo
            .update_brand(id, payload.name.trim(), payload.logo.as_deref())
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Brand))
    }

    pub async fn delete_brand(&self, id: i32) -> Result<(), AppError> {
        let brand = self
            .repo
            .delete_brand(id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Brand))?;

        tracing::info!("Marca removida: {} ({})", brand.name, brand.id);
        if let Some(logo) = brand.logo.as_deref() {
            remove_quietly(self.image_store.as_ref(), logo).await;
        }
        Ok(())
    }

    // --- Cores ---

    pub async fn list_colors(&self) -> Result<Vec<Color>, AppError> {
        self.repo.list_colors().await
    }

    pub async fn create_color(&self, payload: &ColorPayload) -> Result<Color, AppError> {
        let color = self
            .repo
            .create_color(payload.name.trim(), &payload.code.trim().to_uppercase())
            .await?;
        tracing::info!("Cor criada: {} {}", color.name, color.code);
        Ok(color)
    }

    pub async fn update_color(&self, id: i32, payload: &ColorPayload) -> Result<Color, AppError> {
        self.repo
            .update_color(id, payload.name.trim(), &payload.code.trim().to_uppercase())
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Color))
    }

    pub async fn delete_color(&self, id: i32) -> Result<(), AppError> {
        if !self.repo.delete_color(id).await? {
            return Err(AppError::ResourceNotFound(Resource::Color));
        }
        tracing::info!("Cor {} removida", id);
        Ok(())
    }
}
