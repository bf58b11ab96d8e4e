use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Account row. Never serialized directly; responses pick public fields so
/// the password hash cannot leak.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
