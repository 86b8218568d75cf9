// src/handlers/auth.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::{AuthenticatedUser, SESSION_COOKIE},
        i18n::Locale,
    },
    models::auth::{AuthResponse, LoginUserPayload, RegisterUserPayload, UserProfile},
};

/// Cookie da sessão. `Duration::ZERO` apaga o cookie no navegador.
pub fn session_cookie(token: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .build()
}

fn session_max_age(app_state: &AppState) -> time::Duration {
    time::Duration::days(app_state.auth_service.tokens().session_days())
}

// Handler de registro
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário criado; cookie de sessão definido", body = AuthResponse),
        (status = 409, description = "E-mail já registrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    jar: CookieJar,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .auth_service
        .register_user(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let jar = jar.add(session_cookie(response.token.clone(), session_max_age(&app_state)));
    Ok((StatusCode::CREATED, jar, Json(response)))
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Sessão iniciada; cookie de sessão definido", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    jar: CookieJar,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .auth_service
        .login_user(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let jar = jar.add(session_cookie(response.token.clone(), session_max_age(&app_state)));
    Ok((jar, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 204, description = "Cookie de sessão apagado")
    )
)]
// `CookieJar::remove` só emite Set-Cookie se o pedido trouxe o cookie;
// o cookie vazio com Max-Age=0 apaga sempre.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        jar.add(session_cookie(String::new(), time::Duration::ZERO)),
    )
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário da sessão", body = UserProfile),
        (status = 401, description = "Sem sessão")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let profile = app_state
        .auth_service
        .current_user(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_http_only_and_scoped_to_root() {
        let cookie = session_cookie("abc".into(), time::Duration::days(30));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(2_592_000)));

        let header = cookie.to_string();
        assert!(header.starts_with("session=abc;"));
        assert!(header.contains("Max-Age=2592000"));
    }

    #[test]
    fn expired_cookie_clears_the_session() {
        let header = session_cookie(String::new(), time::Duration::ZERO).to_string();
        assert!(header.starts_with("session=;"));
        assert!(header.contains("Max-Age=0"));
    }
}
