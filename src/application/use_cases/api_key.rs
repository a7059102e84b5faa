use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::request_context::RequestContext;
use crate::application::use_cases::audit::{Audit, AuditSink};
use crate::domain::entities::{
    api_key::ApiKey,
    audit_log::{AuditAction, AuditActor, AuditTarget, NewAuditEntry},
};

pub const KEY_DELETED_MESSAGE: &str = "Key deleted Successfully.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Oops, something went wrong. Please try again later.";

// ============================================================================
// Repository Traits
// ============================================================================

#[async_trait]
pub trait ApiKeyRepo: Send + Sync {
    /// Open a transaction. Dropping the returned unit of work without
    /// committing rolls it back.
    async fn begin(&self) -> AppResult<Box<dyn ApiKeyUnitOfWork>>;

    async fn get_by_key_id(&self, key_id: &str) -> AppResult<Option<ApiKey>>;

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<ApiKeyProfile>>;
}

/// One open transaction over API keys and the audit log.
#[async_trait]
pub trait ApiKeyUnitOfWork: AuditSink {
    /// Insert a key. Storage assigns `id`, `name` and `created_at`.
    async fn insert_api_key(
        &mut self,
        key_id: &str,
        user_id: Uuid,
        hashed_token: &str,
    ) -> AppResult<ApiKey>;

    /// Hard-delete the key `key_id`. A missing key is a storage error.
    async fn delete_api_key(&mut self, key_id: &str) -> AppResult<ApiKey>;

    async fn commit(self: Box<Self>) -> AppResult<()>;

    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

// ============================================================================
// Credential Generation
// ============================================================================

pub trait CredentialGenerator: Send + Sync {
    /// A fresh bearer secret. Callers must never persist or log it.
    fn generate_token(&self) -> SecretString;

    /// A fresh non-secret identifier, unrelated to any token.
    fn generate_public_id(&self) -> String;

    /// One-way salted hash of `token`, suitable for later verification.
    fn hash(&self, token: &SecretString) -> AppResult<String>;
}

// ============================================================================
// Profile Types
// ============================================================================

/// Dashboard view of a key. Carries neither the token nor its hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyProfile {
    pub key_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Result of `create_api_key`. The only place the raw token ever leaves the service.
#[derive(Debug)]
pub struct CreatedApiKey {
    pub token: SecretString,
    pub key_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteApiKeyResult {
    pub success: bool,
    pub message: String,
}

impl DeleteApiKeyResult {
    fn deleted() -> Self {
        Self {
            success: true,
            message: KEY_DELETED_MESSAGE.to_string(),
        }
    }

    fn failed(err: &AppError) -> Self {
        Self {
            success: false,
            message: err
                .public_message()
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
        }
    }
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct ApiKeyUseCases {
    api_key_repo: Arc<dyn ApiKeyRepo>,
    credentials: Arc<dyn CredentialGenerator>,
}

impl ApiKeyUseCases {
    pub fn new(api_key_repo: Arc<dyn ApiKeyRepo>, credentials: Arc<dyn CredentialGenerator>) -> Self {
        Self {
            api_key_repo,
            credentials,
        }
    }

    /// Create a new API key for the acting user.
    ///
    /// The key and its `apiKey.created` audit entry are written in one
    /// transaction. Errors propagate to the caller unchanged.
    pub async fn create_api_key(&self, ctx: &RequestContext) -> AppResult<CreatedApiKey> {
        let mut tx = self.api_key_repo.begin().await?;
        let result = self.create_in(tx.as_mut(), ctx).await;
        let created = finish(tx, result).await?;

        tracing::info!(
            key_id = %created.key_id,
            user_id = %ctx.user.id,
            "API key created"
        );

        Ok(created)
    }

    /// Delete a key by its public id.
    ///
    /// Never fails: every error is logged and folded into
    /// `DeleteApiKeyResult { success: false, .. }`.
    pub async fn delete_api_key(&self, ctx: &RequestContext, key_id: &str) -> DeleteApiKeyResult {
        match self.try_delete_api_key(ctx, key_id).await {
            Ok(key) => {
                tracing::info!(key_id = %key.key_id, user_id = %ctx.user.id, "API key deleted");
                DeleteApiKeyResult::deleted()
            }
            Err(err) => {
                tracing::error!(error = ?err, key_id = %key_id, "Error deleting the API key");
                DeleteApiKeyResult::failed(&err)
            }
        }
    }

    /// List the acting user's keys, newest first.
    pub async fn list_api_keys(&self, ctx: &RequestContext) -> AppResult<Vec<ApiKeyProfile>> {
        self.api_key_repo.list_by_user(ctx.user.id).await
    }

    // ========================================================================
    // Private Helpers
    // ========================================================================

    async fn try_delete_api_key(&self, ctx: &RequestContext, key_id: &str) -> AppResult<ApiKey> {
        let mut tx = self.api_key_repo.begin().await?;
        let result = self.delete_in(tx.as_mut(), ctx, key_id).await;
        finish(tx, result).await
    }

    async fn create_in(
        &self,
        tx: &mut dyn ApiKeyUnitOfWork,
        ctx: &RequestContext,
    ) -> AppResult<CreatedApiKey> {
        let user = &ctx.user;

        let token = self.credentials.generate_token();
        let key_id = self.credentials.generate_public_id();
        let hashed_token = self.credentials.hash(&token)?;

        let key = tx.insert_api_key(&key_id, user.id, &hashed_token).await?;

        Audit::record(
            NewAuditEntry {
                action: AuditAction::ApiKeyCreated,
                company_id: user.company_id,
                actor: AuditActor::user(user.id),
                context: ctx.audit_context(),
                target: vec![AuditTarget::api_key(key.id)],
                summary: format!("{} created the apiKey {}", user.name, key.name),
            },
            &mut *tx,
        )
        .await?;

        Ok(CreatedApiKey {
            token,
            key_id: key.key_id,
            created_at: key.created_at,
        })
    }

    async fn delete_in(
        &self,
        tx: &mut dyn ApiKeyUnitOfWork,
        ctx: &RequestContext,
        key_id: &str,
    ) -> AppResult<ApiKey> {
        let user = &ctx.user;

        let key = tx.delete_api_key(key_id).await?;

        Audit::record(
            NewAuditEntry {
                action: AuditAction::ApiKeyDeleted,
                company_id: user.company_id,
                actor: AuditActor::user(user.id),
                context: ctx.audit_context(),
                target: vec![AuditTarget::api_key(key.id)],
                summary: format!("{} deleted the apiKey {}", user.name, key.name),
            },
            &mut *tx,
        )
        .await?;

        Ok(key)
    }
}

/// Commit on success, roll back on failure.
async fn finish<T>(tx: Box<dyn ApiKeyUnitOfWork>, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = ?rollback_err, "Transaction rollback failed");
            }
            Err(err)
        }
    }
}
