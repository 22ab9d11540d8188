//! Session model.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A row in `sessions`. Sessions are never deleted; logout flips `is_active`
/// and stamps `end_time`, leaving an audit trail. `expires_at` is checked on
/// every lookup so a stolen cookie cannot outlive its 24-hour window even if
/// the client tampers with cookie attributes.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub session_token: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}
