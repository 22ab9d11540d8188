//! Access-log writes.

use sqlx::MySqlPool;
use tracing::warn;

use super::StoreError;

pub async fn log_access(
    pool: &MySqlPool,
    user_id: Option<i64>,
    action: &str,
    details: Option<&str>,
    ip_address: &str,
    user_agent: &str,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO access_logs (user_id, action, details, ip_address, user_agent) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(action)
    .bind(details)
    .bind(ip_address)
    .bind(user_agent)
    .execute(pool)
    .await?;
    Ok(())
}

/// Audit writes must never fail the request they describe.
pub async fn log_access_best_effort(
    pool: &MySqlPool,
    user_id: Option<i64>,
    action: &str,
    details: Option<&str>,
    ip_address: &str,
    user_agent: &str,
) {
    if let Err(e) = log_access(pool, user_id, action, details, ip_address, user_agent).await {
        warn!(action, error = %e, "Failed to write access log entry");
    }
}
