// src/db/catalog_repo.rs
// Categorias, materiais, marcas e cores: tabelas pequenas, CRUD direto.

use sqlx::{postgres::PgRow, FromRow, PgPool};

use crate::common::db_utils::{on_still_referenced, on_unique_violation};
use crate::common::error::{AppError, Resource};
use crate::models::catalog::{Brand, Category, Color, Material};

/// As duas tabelas que só têm `id` e `name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedTable {
    Categories,
    Materials,
}

impl NamedTable {
    fn table(self) -> &'static str {
        match self {
            NamedTable::Categories => "categories",
            NamedTable::Materials => "materials",
        }
    }

    pub fn resource(self) -> Resource {
        match self {
            NamedTable::Categories => Resource::Category,
            NamedTable::Materials => Resource::Material,
        }
    }
}

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Categorias e materiais
    // ---

    async fn list_named<T>(&self, table: NamedTable) -> Result<Vec<T>, AppError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = format!("SELECT id, name FROM {} ORDER BY id", table.table());
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn create_named<T>(&self, table: NamedTable, name: &str) -> Result<T, AppError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = format!(
            "INSERT INTO {} (name) VALUES ($1) RETURNING id, name",
            table.table()
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| on_unique_violation(e, || AppError::NameAlreadyExists(name.to_string())))
    }

    async fn rename_named<T>(&self, table: NamedTable, id: i32, name: &str) -> Result<Option<T>, AppError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = format!(
            "UPDATE {} SET name = $2 WHERE id = $1 RETURNING id, name",
            table.table()
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| on_unique_violation(e, || AppError::NameAlreadyExists(name.to_string())))
    }

    /// `false` se não existia. Ainda usado por produtos -> ResourceInUse.
    pub async fn delete_named(&self, table: NamedTable, id: i32) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table.table());
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| on_still_referenced(e, table.resource()))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.list_named(NamedTable::Categories).await
    }

    pub async fn create_category(&self, name: &str) -> Result<Category, AppError> {
        self.create_named(NamedTable::Categories, name).await
    }

    pub async fn rename_category(&self, id: i32, name: &str) -> Result<Option<Category>, AppError> {
        self.rename_named(NamedTable::Categories, id, name).await
    }

    pub async fn list_materials(&self) -> Result<Vec<Material>, AppError> {
        self.list_named(NamedTable::Materials).await
    }

    pub async fn create_material(&self, name: &str) -> Result<Material, AppError> {
        self.create_named(NamedTable::Materials, name).await
    }

    pub async fn rename_material(&self, id: i32, name: &str) -> Result<Option<Material>, AppError> {
        self.rename_named(NamedTable::Materials, id, name).await
    }

    // ---
    // Marcas
    // ---

    pub async fn list_brands(&self) -> Result<Vec<Brand>, AppError> {
        let brands = sqlx::query_as::<_, Brand>("SELECT id, name, logo FROM brands ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(brands)
    }

    pub async fn create_brand(&self, name: &str, logo: Option<&str>) -> Result<Brand, AppError> {
        sqlx::query_as::<_, Brand>(
            "INSERT INTO brands (name, logo) VALUES ($1, $2) RETURNING id, name, logo",
        )
        .bind(name)
        .bind(logo)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| on_unique_violation(e, || AppError::NameAlreadyExists(name.to_string())))
    }

    // Logo ausente mantém o atual.
    pub async fn update_brand(&self, id: i32, name: &str, logo: Option<&str>) -> Result<Option<Brand>, AppError> {
        sqlx::query_as::<_, Brand>(
            r#"
            UPDATE brands SET name = $2, logo = COALESCE($3, logo)
            WHERE id = $1
            RETURNING id, name, logo
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(logo)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| on_unique_violation(e, || AppError::NameAlreadyExists(name.to_string())))
    }

    /// Devolve a marca apagada (para o serviço remover o logo do disco).
    pub async fn delete_brand(&self, id: i32) -> Result<Option<Brand>, AppError> {
        sqlx::query_as::<_, Brand>("DELETE FROM brands WHERE id = $1 RETURNING id, name, logo")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| on_still_referenced(e, Resource::Brand))
    }

    // ---
    // Cores
    // ---

    pub async fn list_colors(&self) -> Result<Vec<Color>, AppError> {
        let colors = sqlx::query_as::<_, Color>("SELECT id, name, code FROM colors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(colors)
    }

    pub async fn create_color(&self, name: &str, code: &str) -> Result<Color, AppError> {
        let color = sqlx::query_as::<_, Color>(
            "INSERT INTO colors (name, code) VALUES ($1, $2) RETURNING id, name, code",
        )
        .bind(name)
        .bind(code)
        .fetch_one(&self.pool)
        .await?;
        Ok(color)
    }

    pub async fn update_color(&self, id: i32, name: &str, code: &str) -> Result<Option<Color>, AppError> {
        let color = sqlx::query_as::<_, Color>(
            "UPDATE colors SET name = $2, code = $3 WHERE id = $1 RETURNING id, name, code",
        )
        .bind(id)
        .bind(name)
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(color)
    }

    pub async fn delete_color(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM colors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| on_still_referenced(e, Resource::Color))?;
        Ok(result.rows_affected() > 0)
    }
}
