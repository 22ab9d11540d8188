//! Tenant account registration, login, logout and session resolution.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderMap, StatusCode},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::api::error::{ApiError, ValidationErrorBuilder};
use crate::api::portal::{client_ip, user_agent};
use crate::api::validation::{validate_email, validate_name, validate_password};
use crate::db::{
    self, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User, UserResponse,
};
use crate::AppState;

/// Name of the session cookie issued at login.
pub const SESSION_COOKIE: &str = "session_token";

/// Sessions live for 24 hours, enforced both by the cookie max-age and the
/// server-side `expires_at` check.
const SESSION_TTL_HOURS: i64 = 24;

/// Hash a password using Argon2id with a per-password random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash string
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generate an opaque 256-bit session token, hex-encoded
pub fn generate_session_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

fn session_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::hours(SESSION_TTL_HOURS)
}

fn session_cookie(token: String, production: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(SESSION_TTL_HOURS))
        .build()
}

fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// Register a new organisation and its first user.
///
/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let organisation_name = request.organisation_name.unwrap_or_default();
    let full_name = request.full_name.unwrap_or_default();
    let email = request.email.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_name(&organisation_name, "Organisation name") {
        errors.add("organisationName", e);
    }
    if let Err(e) = validate_name(&full_name, "Full name") {
        errors.add("fullName", e);
    }
    if let Err(e) = validate_email(&email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_password(&password) {
        errors.add("password", e);
    }
    errors.finish()?;

    let password_hash = hash_password(&password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        ApiError::internal("Internal server error")
    })?;

    let (tenant_id, user_id) =
        db::registry::register(&state.db, &organisation_name, &full_name, &email, &password_hash)
            .await?;

    info!(tenant_id, user_id, "Registered new organisation");

    db::logs::log_access_best_effort(
        &state.db,
        Some(user_id as i64),
        "register",
        Some(&organisation_name),
        &client_ip(&headers),
        &user_agent(&headers),
    )
    .await;

    Ok(Json(RegisterResponse {
        message: "Registration successful".to_string(),
        tenant_id,
        user_id,
    }))
}

/// Log a user in and issue a session cookie.
///
/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let email = request.email.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    // A missing account and a wrong password take the same path out, so the
    // response cannot be used to probe which emails are registered.
    let user = db::registry::find_active_by_email(&state.db, &email).await?;
    let user = match user {
        Some(user) if verify_password(&password, &user.password_hash) => user,
        _ => return Err(ApiError::unauthorized("Invalid email or password")),
    };

    let token = generate_session_token();
    db::sessions::create(&state.db, user.id, &token, session_expiry()).await?;
    db::registry::touch_last_seen(&state.db, user.id).await?;

    info!(user_id = user.id, "User logged in");

    db::logs::log_access_best_effort(
        &state.db,
        Some(user.id),
        "login",
        None,
        &client_ip(&headers),
        &user_agent(&headers),
    )
    .await;

    let jar = jar.add(session_cookie(token, state.config.server.production));

    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            user: UserResponse::from(user),
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Invalidate the current session and clear the cookie.
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<LogoutResponse>), ApiError> {
    if let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
        if let Some(session) = db::sessions::find_active_by_token(&state.db, &token).await? {
            db::sessions::deactivate(&state.db, session.id).await?;
            info!(user_id = session.user_id, "User logged out");

            db::logs::log_access_best_effort(
                &state.db,
                Some(session.user_id),
                "logout",
                None,
                &client_ip(&headers),
                &user_agent(&headers),
            )
            .await;
        }
    }

    // Clearing the cookie is unconditional: logout with a stale or missing
    // session is still a successful logout.
    let jar = jar.remove(removal_cookie());

    Ok((
        jar,
        Json(LogoutResponse {
            message: "Logout successful".to_string(),
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
}

/// Return the currently authenticated user.
///
/// GET /auth/me
pub async fn me(user: User) -> Json<MeResponse> {
    Json(MeResponse {
        user: UserResponse::from(user),
    })
}

/// Resolve the session cookie to a user. Any break in the chain — no cookie,
/// unknown token, invalidated or expired session, deactivated user — yields
/// the same 401.
pub async fn get_current_user(
    pool: &sqlx::MySqlPool,
    token: &str,
) -> Result<User, StatusCode> {
    let session = db::sessions::find_active_by_token(pool, token)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let session = session.ok_or(StatusCode::UNAUTHORIZED)?;

    let user = db::registry::find_by_id(pool, session.user_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    user.ok_or(StatusCode::UNAUTHORIZED)
}

/// Extractor for getting the current authenticated user from a request
#[async_trait]
impl FromRequestParts<Arc<AppState>> for User {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        get_current_user(&state.db, &token).await.map_err(|status| {
            if status == StatusCode::UNAUTHORIZED {
                ApiError::unauthorized("Not authenticated")
            } else {
                ApiError::internal("Internal server error")
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_correct_password() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("secret1").unwrap();
        assert!(!verify_password("secret2", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("secret1", "not-a-phc-string"));
        assert!(!verify_password("secret1", ""));
    }

    #[test]
    fn test_hashes_are_salted() {
        // Same input, different salt, different digest; both still verify.
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("secret1", &a));
        assert!(verify_password("secret1", &b));
    }

    #[test]
    fn test_token_shape() {
        let token = generate_session_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_session_token(), generate_session_token());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".to_string(), false);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(24)));
    }

    #[test]
    fn test_session_cookie_secure_in_production() {
        let cookie = session_cookie("abc".to_string(), true);
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_session_expiry_is_in_the_future() {
        let expiry = session_expiry();
        let delta = expiry - Utc::now();
        assert!(delta > Duration::hours(23));
        assert!(delta <= Duration::hours(24));
    }
}
