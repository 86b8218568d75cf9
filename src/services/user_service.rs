// src/services/user_service.rs

use sqlx::PgPool;

use crate::{
    common::error::{AppError, Resource},
    db::{RbacRepository, UserRepository},
    models::auth::{capitalize_words, UpdateUserPayload, UserProfile},
    models::rbac::Role,
};

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
    user_repo: UserRepository,
    rbac_repo: RbacRepository,
}

impl UserService {
    pub fn new(pool: PgPool, user_repo: UserRepository, rbac_repo: RbacRepository) -> Self {
        Self { pool, user_repo, rbac_repo }
    }

    pub async fn list_users(&self) -> Result<Vec<UserProfile>, AppError> {
        self.user_repo.list_profiles().await
    }

    pub async fn get_user(&self, id: i32) -> Result<UserProfile, AppError> {
        self.user_repo
            .find_profile(&self.pool, id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::User))
    }

    pub async fn update_user(&self, id: i32, payload: UpdateUserPayload) -> Result<UserProfile, AppError> {
        if let Some(role_id) = payload.role_id {
            if !self.rbac_repo.role_exists(role_id).await? {
                return Err(AppError::ResourceNotFound(Resource::Role));
            }
        }

        // Mesma normalização do cadastro
        let changes = UpdateUserPayload {
            first_names: payload.first_names.as_deref().map(capitalize_words),
            last_names: payload.last_names.as_deref().map(capitalize_words),
            ..payload
        };

        if !self.user_repo.update_user(&self.pool, id, &changes).await? {
            return Err(AppError::ResourceNotFound(Resource::User));
        }

        if let Some(role_id) = changes.role_id {
            tracing::info!("Usuário {} agora tem o papel {}", id, role_id);
        }
        self.get_user(id).await
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        self.rbac_repo.list_roles().await
    }
}
