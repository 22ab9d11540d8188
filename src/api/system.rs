//! Diagnostic endpoints.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::db;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseTestResponse {
    pub status: String,
    pub message: String,
    pub site_name: String,
    pub timestamp: String,
}

/// Check database connectivity and read one settings row.
///
/// GET /database-test
pub async fn database_test(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DatabaseTestResponse>, ApiError> {
    // Acquire-and-release proves the pool can reach the server even if the
    // settings table is empty.
    let conn = state.db.acquire().await.map_err(|e| {
        tracing::error!(error = %e, "Database connectivity check failed");
        ApiError::database("Database connection failed")
    })?;
    drop(conn);

    let site_name = db::settings::get_setting(&state.db, "site_name").await?;

    Ok(Json(DatabaseTestResponse {
        status: "success".to_string(),
        message: "Database connection successful".to_string(),
        site_name: site_name.unwrap_or_else(|| "Not found".to_string()),
        timestamp: Utc::now().to_rfc3339(),
    }))
}
