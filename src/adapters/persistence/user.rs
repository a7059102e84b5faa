use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::user::UserRepo,
    domain::entities::user::SessionUser,
};

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn get_session_user(&self, user_id: Uuid) -> AppResult<Option<SessionUser>> {
        let row = sqlx::query("SELECT id, name, company_id FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row.map(|row| SessionUser {
            id: row.get("id"),
            name: row.get("name"),
            company_id: row.get("company_id"),
        }))
    }
}
