//! Session persistence.
//!
//! A session moves through exactly one lifecycle: created active, later
//! invalidated, never back. Rows stay behind after logout so the table doubles
//! as an audit log of who was signed in when.

use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use super::{Session, StoreError};

/// Persists a new active session for the user and returns its row id.
pub async fn create(
    pool: &MySqlPool,
    user_id: i64,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<u64, StoreError> {
    let session_id = sqlx::query(
        "INSERT INTO sessions (user_id, session_token, expires_at) VALUES (?, ?, ?)",
    )
    .bind(user_id)
    .bind(token)
    .bind(expires_at)
    .execute(pool)
    .await?
    .last_insert_id();
    Ok(session_id)
}

/// Finds the live session for a token. Inactive and expired sessions are
/// both absent from the caller's point of view; the expiry check happens
/// server-side rather than trusting the cookie's max-age.
pub async fn find_active_by_token(
    pool: &MySqlPool,
    token: &str,
) -> Result<Option<Session>, StoreError> {
    let session = sqlx::query_as(
        "SELECT * FROM sessions \
         WHERE session_token = ? AND is_active = TRUE AND expires_at > UTC_TIMESTAMP()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;
    Ok(session)
}

/// Invalidates a session. Idempotent: the `is_active` guard makes a second
/// call a no-op, so the original `end_time` is preserved.
pub async fn deactivate(pool: &MySqlPool, session_id: i64) -> Result<(), StoreError> {
    sqlx::query(
        "UPDATE sessions SET is_active = FALSE, end_time = CURRENT_TIMESTAMP \
         WHERE id = ? AND is_active = TRUE",
    )
    .bind(session_id)
    .execute(pool)
    .await?;
    Ok(())
}
