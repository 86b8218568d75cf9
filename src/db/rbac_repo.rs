// src/db/rbac_repo.rs

use sqlx::PgPool;

use crate::common::error::AppError;
use crate::models::rbac::Role;

#[derive(Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Lista os papéis para o seletor da tela de usuários
    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    pub async fn role_exists(&self, id: i32) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM roles WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
