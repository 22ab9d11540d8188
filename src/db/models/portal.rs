//! Captive-portal acceptance models.

use serde::{Deserialize, Serialize};

/// Body of POST /captive-portal/accept.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub device_details: Option<DeviceDetailsPayload>,
}

/// Device attributes forwarded by the access point when it redirects a guest
/// to the portal. Every field is optional; absent values are stored as NULL.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetailsPayload {
    pub mac_address: Option<String>,
    pub ap_mac_address: Option<String>,
    pub ssid: Option<String>,
    pub original_url: Option<String>,
    pub device_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptResponse {
    pub message: String,
    pub user_acceptance_id: u64,
    pub device_details_id: u64,
}
