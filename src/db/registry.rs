//! Tenant and user registry.
//!
//! Registration is the one place two tables are written together: the Tenant
//! row and its first user must land atomically, so both inserts run inside a
//! single transaction. Dropping the transaction on any error path rolls the
//! whole thing back; callers never observe a tenant without its user.

use sqlx::MySqlPool;

use super::{map_insert_error, StoreError, User};

/// Creates an organisation and its first user in one transaction.
///
/// Duplicate emails are rejected by the unique index on `users.email`; the
/// resulting constraint violation surfaces as [`StoreError::DuplicateEmail`].
/// There is deliberately no read-before-write existence check, which would
/// race under concurrent registration.
pub async fn register(
    pool: &MySqlPool,
    organisation_name: &str,
    full_name: &str,
    email: &str,
    password_hash: &str,
) -> Result<(u64, u64), StoreError> {
    let mut tx = pool.begin().await?;

    let tenant_id = sqlx::query("INSERT INTO Tenant (organisation_name) VALUES (?)")
        .bind(organisation_name)
        .execute(&mut *tx)
        .await?
        .last_insert_id();

    let user_id = sqlx::query(
        "INSERT INTO users (tenant_id, full_name, email, password_hash, terms_accepted, safeguarding_accepted) \
         VALUES (?, ?, ?, ?, FALSE, FALSE)",
    )
    .bind(tenant_id)
    .bind(full_name)
    .bind(email)
    .bind(password_hash)
    .execute(&mut *tx)
    .await
    .map_err(map_insert_error)?
    .last_insert_id();

    tx.commit().await?;

    Ok((tenant_id, user_id))
}

/// Looks up an active user for login. Deactivated accounts are invisible
/// here, so a soft-deleted user cannot sign in.
pub async fn find_active_by_email(
    pool: &MySqlPool,
    email: &str,
) -> Result<Option<User>, StoreError> {
    let user = sqlx::query_as("SELECT * FROM users WHERE email = ? AND is_active = TRUE")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_id(pool: &MySqlPool, user_id: i64) -> Result<Option<User>, StoreError> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = ? AND is_active = TRUE")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Stamps `last_seen` on successful login.
pub async fn touch_last_seen(pool: &MySqlPool, user_id: i64) -> Result<(), StoreError> {
    sqlx::query("UPDATE users SET last_seen = CURRENT_TIMESTAMP WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}
