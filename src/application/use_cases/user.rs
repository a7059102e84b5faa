use async_trait::async_trait;
use uuid::Uuid;

use crate::{app_error::AppResult, domain::entities::user::SessionUser};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Load the user a session token refers to, with its company scope.
    async fn get_session_user(&self, user_id: Uuid) -> AppResult<Option<SessionUser>>;
}
