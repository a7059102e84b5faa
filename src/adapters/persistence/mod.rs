use sqlx::PgPool;

use crate::app_error::AppError;

pub mod api_key;
pub mod audit_log;
pub mod user;

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        PostgresPersistence { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // Storage failures never carry a caller-facing message, not even
        // missing rows or constraint violations.
        let detail = match &err {
            sqlx::Error::RowNotFound => "No matching row",
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                "Unique constraint violated"
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                "Foreign key constraint violated"
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                "Check constraint violated"
            }
            _ => "Database operation failed",
        };
        tracing::error!(error = ?err, "Database error");
        AppError::Database(detail.into())
    }
}
