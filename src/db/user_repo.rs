// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::common::db_utils::{on_missing_reference, on_unique_violation};
use crate::common::error::AppError;
use crate::models::auth::{UpdateUserPayload, User, UserProfile};

const PROFILE_SELECT: &str = r#"
    SELECT
        u.id, u.email, u.first_names, u.last_names, u.phone, u.country_code,
        u.role_id, r.name AS role_name, u.created_at
    FROM users u
    JOIN roles r ON r.id = u.role_id
"#;

/// Dados de um usuário novo, já normalizados pelo serviço.
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_names: &'a str,
    pub last_names: &'a str,
    pub phone: Option<&'a str>,
    pub country_code: Option<&'a str>,
    pub role_id: i32,
}

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail (já em minúsculas)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, first_names, last_names,
                   phone, country_code, role_id, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn find_profile<'e, E>(&self, executor: E, id: i32) -> Result<Option<UserProfile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE u.id = $1", PROFILE_SELECT);
        let profile = sqlx::query_as::<_, UserProfile>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(profile)
    }

    pub async fn list_profiles(&self) -> Result<Vec<UserProfile>, AppError> {
        let sql = format!("{} ORDER BY u.id", PROFILE_SELECT);
        let users = sqlx::query_as::<_, UserProfile>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    // Cria um novo usuário; e-mail repetido vira EmailAlreadyExists.
    pub async fn create_user<'e, E>(&self, executor: E, new_user: &NewUser<'_>) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO users (
                email, password_hash, first_names, last_names,
                phone, country_code, role_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.first_names)
        .bind(new_user.last_names)
        .bind(new_user.phone)
        .bind(new_user.country_code)
        .bind(new_user.role_id)
        .fetch_one(executor)
        .await
        .map_err(|e| on_unique_violation(e, || AppError::EmailAlreadyExists))?;

        Ok(id)
    }

    /// Atualização parcial: campo ausente mantém o valor atual.
    /// Devolve `false` se o usuário não existe.
    pub async fn update_user<'e, E>(
        &self,
        executor: E,
        id: i32,
        changes: &UpdateUserPayload,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                first_names  = COALESCE($2, first_names),
                last_names   = COALESCE($3, last_names),
                phone        = COALESCE($4, phone),
                country_code = COALESCE($5, country_code),
                role_id      = COALESCE($6, role_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.first_names.as_deref())
        .bind(changes.last_names.as_deref())
        .bind(changes.phone.as_deref())
        .bind(changes.country_code.as_deref())
        .bind(changes.role_id)
        .execute(executor)
        .await
        .map_err(on_missing_reference)?;

        Ok(result.rows_affected() > 0)
    }
}
