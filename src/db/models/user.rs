//! User and tenant account models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row in `users`. Covers both tenant accounts (tenant_id set) and
/// portal-only visitors (tenant_id NULL). Never hard-deleted; `is_active`
/// is the soft-delete flag.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub tenant_id: Option<i64>,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub mac_address: Option<String>,
    pub ip_address: Option<String>,
    pub device_name: Option<String>,
    pub terms_accepted: bool,
    pub safeguarding_accepted: bool,
    pub is_active: bool,
    pub last_seen: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The subset of a user exposed over HTTP. Keeps the password hash out of
/// every response path.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub tenant_id: Option<i64>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            tenant_id: user.tenant_id,
        }
    }
}

/// Body of POST /auth/register. Fields are optional so that a missing field
/// surfaces as a 400 validation error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub organisation_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub tenant_id: u64,
    pub user_id: u64,
}

/// Body of POST /auth/login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserResponse,
}
