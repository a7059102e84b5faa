use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Persisted API key. Only the salted hash of the token is ever stored.
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub id: Uuid,
    pub key_id: String,
    pub user_id: Uuid,
    pub hashed_token: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
