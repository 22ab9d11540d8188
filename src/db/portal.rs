//! Captive-portal acceptance recording.

use sqlx::MySqlPool;

use super::{DeviceDetailsPayload, StoreError};

/// Records a policy acceptance and the connecting device's details as one
/// transaction. The route layer is the enforcement point that the visitor
/// actually agreed; both flags are forced true here rather than re-validated.
///
/// Unlike registration there is no uniqueness on email — the same visitor
/// accepting twice produces two independent rows.
pub async fn record_acceptance(
    pool: &MySqlPool,
    full_name: &str,
    email: &str,
    ip_address: &str,
    user_agent: &str,
    device: &DeviceDetailsPayload,
) -> Result<(u64, u64), StoreError> {
    let mut tx = pool.begin().await?;

    let user_acceptance_id = sqlx::query(
        "INSERT INTO UserAcceptance (full_name, email, terms_accepted, safeguarding_accepted, ip_address, user_agent) \
         VALUES (?, ?, TRUE, TRUE, ?, ?)",
    )
    .bind(full_name)
    .bind(email)
    .bind(ip_address)
    .bind(user_agent)
    .execute(&mut *tx)
    .await?
    .last_insert_id();

    let device_details_id = sqlx::query(
        "INSERT INTO DeviceDetails \
         (user_acceptance_id, mac_address, ap_mac_address, ssid, original_url, device_name, ip_address, user_agent) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user_acceptance_id)
    .bind(&device.mac_address)
    .bind(&device.ap_mac_address)
    .bind(&device.ssid)
    .bind(&device.original_url)
    .bind(&device.device_name)
    .bind(ip_address)
    .bind(user_agent)
    .execute(&mut *tx)
    .await?
    .last_insert_id();

    tx.commit().await?;

    Ok((user_acceptance_id, device_details_id))
}
