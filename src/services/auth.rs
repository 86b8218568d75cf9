// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;

use crate::{
    common::error::{AppError, Resource},
    db::{user_repo::NewUser, UserRepository},
    models::auth::{
        capitalize_words, AuthResponse, Claims, LoginUserPayload, RegisterUserPayload, SessionUser,
        UserProfile,
    },
    models::rbac::RoleKind,
};

/// Emissão e verificação do JWT de sessão. Não toca no banco.
#[derive(Clone)]
pub struct SessionTokens {
    jwt_secret: String,
    session_days: i64,
}

impl SessionTokens {
    pub fn new(jwt_secret: String, session_days: i64) -> Self {
        Self { jwt_secret, session_days }
    }

    pub fn session_days(&self) -> i64 {
        self.session_days
    }

    pub fn issue(&self, user_id: i32, email: &str, role_id: i32) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(self.session_days);

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role: role_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    // Token vencido, adulterado ou com papel desconhecido: tudo vira InvalidToken.
    pub fn verify(&self, token: &str) -> Result<SessionUser, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = token_data.claims;
        let role = RoleKind::from_id(claims.role).ok_or(AppError::InvalidToken)?;

        Ok(SessionUser {
            id: claims.sub,
            email: claims.email,
            role,
        })
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    tokens: SessionTokens,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, tokens: SessionTokens, pool: PgPool) -> Self {
        Self { user_repo, tokens, pool }
    }

    pub fn tokens(&self) -> &SessionTokens {
        &self.tokens
    }

    pub async fn register_user(&self, payload: RegisterUserPayload) -> Result<AuthResponse, AppError> {
        // 1. Hashing fora da transação e fora do runtime assíncrono
        let password = payload.password;
        let password_hash = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let email = payload.email.trim().to_lowercase();
        let first_names = capitalize_words(&payload.first_names);
        let last_names = capitalize_words(&payload.last_names);

        // 2. Cria o usuário e lê o perfil na mesma transação
        let mut tx = self.pool.begin().await?;

        let user_id = self
            .user_repo
            .create_user(
                &mut *tx,
                &NewUser {
                    email: &email,
                    password_hash: &password_hash,
                    first_names: &first_names,
                    last_names: &last_names,
                    phone: payload.phone.as_deref(),
                    country_code: payload.country_code.as_deref(),
                    role_id: RoleKind::Client.id(),
                },
            )
            .await?;

        let user = self
            .user_repo
            .find_profile(&mut *tx, user_id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::User))?;

        tx.commit().await?;

        tracing::info!("Novo usuário registrado: {}", user.email);

        let token = self.tokens.issue(user.id, &user.email, user.role_id)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn login_user(&self, payload: LoginUserPayload) -> Result<AuthResponse, AppError> {
        let email = payload.email.trim().to_lowercase();
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = payload.password;
        let password_hash = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let profile = self.current_user(user.id).await?;
        let token = self.tokens.issue(profile.id, &profile.email, profile.role_id)?;
        Ok(AuthResponse { token, user: profile })
    }

    pub fn decode_token(&self, token: &str) -> Result<SessionUser, AppError> {
        self.tokens.verify(token)
    }

    pub async fn current_user(&self, user_id: i32) -> Result<UserProfile, AppError> {
        self.user_repo
            .find_profile(&self.pool, user_id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::User))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_keeps_user_and_role() {
        let tokens = SessionTokens::new("segredo-de-teste".into(), 30);
        let token = tokens.issue(42, "ana@yeka.pe", RoleKind::Manager.id()).unwrap();

        let session = tokens.verify(&token).unwrap();
        assert_eq!(session.id, 42);
        assert_eq!(session.email, "ana@yeka.pe");
        assert_eq!(session.role, RoleKind::Manager);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = SessionTokens::new("um".into(), 30).issue(1, "a@b.pe", 1).unwrap();
        let other = SessionTokens::new("outro".into(), 30);
        assert!(matches!(other.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = SessionTokens::new("segredo".into(), -2);
        let token = tokens.issue(1, "a@b.pe", 2).unwrap();
        assert!(matches!(tokens.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let tokens = SessionTokens::new("segredo".into(), 1);
        let token = tokens.issue(1, "a@b.pe", 77).unwrap();
        assert!(matches!(tokens.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn garbage_is_rejected() {
        let tokens = SessionTokens::new("segredo".into(), 1);
        assert!(matches!(tokens.verify("nao.e.jwt"), Err(AppError::InvalidToken)));
    }
}
