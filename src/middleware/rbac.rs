// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::{auth::SessionUser, rbac::RoleKind},
};

/// 1. O Trait que define quem pode passar
pub trait RoleRequirement: Send + Sync + 'static {
    fn allows(role: RoleKind) -> bool;
}

/// 2. O Extractor (Guardião). Depende do `auth_guard` ter rodado antes.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleRequirement,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_parts(parts);

        let role = parts.extensions.get::<SessionUser>().map(|user| user.role);
        check_role::<T>(role).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

        Ok(RequireRole(PhantomData))
    }
}

/// Sem sessão -> 401; com sessão mas papel insuficiente -> 403.
pub fn check_role<T: RoleRequirement>(role: Option<RoleKind>) -> Result<(), AppError> {
    match role {
        None => Err(AppError::InvalidToken),
        Some(role) if T::allows(role) => Ok(()),
        Some(_) => Err(AppError::Forbidden),
    }
}

// ---
// DEFINIÇÃO DOS REQUISITOS (TIPOS)
// ---

/// Administrador ou gerente: o painel todo.
pub struct Staff;
impl RoleRequirement for Staff {
    fn allows(role: RoleKind) -> bool {
        role.is_staff()
    }
}

/// Só administrador: gestão de usuários.
pub struct AdminOnly;
impl RoleRequirement for AdminOnly {
    fn allows(role: RoleKind) -> bool {
        role == RoleKind::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_admits_admin_and_manager() {
        assert!(check_role::<Staff>(Some(RoleKind::Admin)).is_ok());
        assert!(check_role::<Staff>(Some(RoleKind::Manager)).is_ok());
        assert!(matches!(
            check_role::<Staff>(Some(RoleKind::Client)),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn admin_only_rejects_managers() {
        assert!(check_role::<AdminOnly>(Some(RoleKind::Admin)).is_ok());
        assert!(matches!(
            check_role::<AdminOnly>(Some(RoleKind::Manager)),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn missing_session_is_unauthorized() {
        assert!(matches!(check_role::<Staff>(None), Err(AppError::InvalidToken)));
    }
}
