//! Captive-portal acceptance endpoint.

use axum::{extract::State, http::HeaderMap, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::error::{ApiError, ValidationErrorBuilder};
use crate::api::validation::{validate_email, validate_name};
use crate::db::{self, AcceptRequest, AcceptResponse};
use crate::AppState;

/// Client address as seen through the access point's proxy: first hop of
/// `x-forwarded-for`, then `x-real-ip`, else "unknown".
pub fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Record a guest's policy acceptance and device details.
///
/// POST /captive-portal/accept
pub async fn accept(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<AcceptRequest>,
) -> Result<Json<AcceptResponse>, ApiError> {
    let full_name = request.full_name.unwrap_or_default();
    let email = request.email.unwrap_or_default();
    let device = request.device_details.unwrap_or_default();

    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_name(&full_name, "Full name") {
        errors.add("fullName", e);
    }
    if let Err(e) = validate_email(&email) {
        errors.add("email", e);
    }
    errors.finish()?;

    let ip_address = client_ip(&headers);
    let agent = user_agent(&headers);

    let (user_acceptance_id, device_details_id) =
        db::portal::record_acceptance(&state.db, &full_name, &email, &ip_address, &agent, &device)
            .await?;

    info!(
        user_acceptance_id,
        device_details_id,
        ip = %ip_address,
        "Portal acceptance recorded"
    );

    db::logs::log_access_best_effort(
        &state.db,
        None,
        "portal_accept",
        device.mac_address.as_deref(),
        &ip_address,
        &agent,
    )
    .await;

    Ok(Json(AcceptResponse {
        message: "Acceptance logged successfully".to_string(),
        user_acceptance_id,
        device_details_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(client_ip(&headers), "1.2.3.4");
    }

    #[test]
    fn test_client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(client_ip(&headers), "9.9.9.9");
    }

    #[test]
    fn test_client_ip_unknown_when_absent() {
        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn test_client_ip_skips_empty_forwarded_entry() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(client_ip(&headers), "9.9.9.9");
    }

    #[test]
    fn test_user_agent_unknown_when_absent() {
        assert_eq!(user_agent(&HeaderMap::new()), "unknown");
    }
}
