use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Paste {
    pub id: String,
    pub content: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_views: Option<i32>,
    pub view_count: i32,
    /// Audit only; never consulted by the endpoints.
    pub created_at: DateTime<Utc>,
}
