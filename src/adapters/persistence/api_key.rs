use async_trait::async_trait;
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use crate::{
    adapters::persistence::{PostgresPersistence, audit_log},
    app_error::{AppError, AppResult},
    application::use_cases::{
        api_key::{ApiKeyProfile, ApiKeyRepo, ApiKeyUnitOfWork},
        audit::AuditSink,
    },
    domain::entities::{
        api_key::ApiKey,
        audit_log::{AuditEntry, NewAuditEntry},
    },
};

fn row_to_api_key(row: sqlx::postgres::PgRow) -> ApiKey {
    ApiKey {
        id: row.get("id"),
        key_id: row.get("key_id"),
        user_id: row.get("user_id"),
        hashed_token: row.get("hashed_token"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    }
}

fn row_to_profile(row: sqlx::postgres::PgRow) -> ApiKeyProfile {
    ApiKeyProfile {
        key_id: row.get("key_id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl ApiKeyRepo for PostgresPersistence {
    async fn begin(&self) -> AppResult<Box<dyn ApiKeyUnitOfWork>> {
        let tx = self.pool.begin().await.map_err(AppError::from)?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn get_by_key_id(&self, key_id: &str) -> AppResult<Option<ApiKey>> {
        let row = sqlx::query(
            r#"
            SELECT id, key_id, user_id, hashed_token, name, created_at
            FROM api_keys
            WHERE key_id = $1
            "#,
        )
        .bind(key_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(row_to_api_key))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<ApiKeyProfile>> {
        let rows = sqlx::query(
            r#"
            SELECT key_id, name, created_at
            FROM api_keys
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(rows.into_iter().map(row_to_profile).collect())
    }
}

/// An open Postgres transaction. sqlx rolls it back on drop.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl AuditSink for PgUnitOfWork {
    async fn insert_audit_entry(&mut self, entry: &NewAuditEntry) -> AppResult<AuditEntry> {
        audit_log::insert_audit_entry(&mut *self.tx, entry).await
    }
}

#[async_trait]
impl ApiKeyUnitOfWork for PgUnitOfWork {
    async fn insert_api_key(
        &mut self,
        key_id: &str,
        user_id: Uuid,
        hashed_token: &str,
    ) -> AppResult<ApiKey> {
        let row = sqlx::query(
            r#"
            INSERT INTO api_keys (key_id, user_id, hashed_token)
            VALUES ($1, $2, $3)
            RETURNING id, key_id, user_id, hashed_token, name, created_at
            "#,
        )
        .bind(key_id)
        .bind(user_id)
        .bind(hashed_token)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(AppError::from)?;

        Ok(row_to_api_key(row))
    }

    async fn delete_api_key(&mut self, key_id: &str) -> AppResult<ApiKey> {
        // fetch_one turns a missing row into RowNotFound
        let row = sqlx::query(
            r#"
            DELETE FROM api_keys
            WHERE key_id = $1
            RETURNING id, key_id, user_id, hashed_token, name, created_at
            "#,
        )
        .bind(key_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(AppError::from)?;

        Ok(row_to_api_key(row))
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await.map_err(AppError::from)
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.tx.rollback().await.map_err(AppError::from)
    }
}
