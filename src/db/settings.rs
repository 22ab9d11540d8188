//! Process-wide key/value settings, read-mostly.

use sqlx::MySqlPool;

use super::StoreError;

pub async fn get_setting(pool: &MySqlPool, key: &str) -> Result<Option<String>, StoreError> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT setting_value FROM settings WHERE setting_key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;
    Ok(value.flatten())
}
