//! In-memory mock implementations for API key, audit and user repositories.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::SecretString;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::{
        api_key::{ApiKeyProfile, ApiKeyRepo, ApiKeyUnitOfWork, CredentialGenerator},
        audit::AuditSink,
        user::UserRepo,
    },
    domain::entities::{
        api_key::ApiKey,
        audit_log::{AuditEntry, NewAuditEntry},
        user::SessionUser,
    },
    infra::crypto::SecureCredentials,
};

/// Default display name, mirroring the column default in the schema.
const DEFAULT_KEY_NAME: &str = "API Key";

#[derive(Default)]
struct StoreState {
    keys: HashMap<String, ApiKey>,
    audit: Vec<AuditEntry>,
}

/// In-memory implementation of ApiKeyRepo for testing.
///
/// Units of work stage their writes and apply them only on commit, so a
/// failure between two writes leaves the store untouched.
#[derive(Default)]
pub struct InMemoryApiKeyRepo {
    state: Arc<Mutex<StoreState>>,
    fail_audit_writes: Arc<AtomicBool>,
    fail_begin: AtomicBool,
}

impl InMemoryApiKeyRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every audit insert fail with a database error.
    pub fn fail_audit_writes(&self, fail: bool) {
        self.fail_audit_writes.store(fail, Ordering::SeqCst);
    }

    /// Make opening a transaction fail, as if the database were unreachable.
    pub fn fail_begin(&self, fail: bool) {
        self.fail_begin.store(fail, Ordering::SeqCst);
    }

    /// Get all committed keys (for test assertions).
    pub fn all_keys(&self) -> Vec<ApiKey> {
        self.state.lock().unwrap().keys.values().cloned().collect()
    }

    /// Get all committed audit entries in write order (for test assertions).
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.state.lock().unwrap().audit.clone()
    }
}

#[async_trait]
impl ApiKeyRepo for InMemoryApiKeyRepo {
    async fn begin(&self) -> AppResult<Box<dyn ApiKeyUnitOfWork>> {
        if self.fail_begin.load(Ordering::SeqCst) {
            return Err(AppError::Database("Database operation failed".into()));
        }
        Ok(Box::new(InMemoryUnitOfWork {
            state: self.state.clone(),
            fail_audit_writes: self.fail_audit_writes.clone(),
            staged: Vec::new(),
        }))
    }

    async fn get_by_key_id(&self, key_id: &str) -> AppResult<Option<ApiKey>> {
        Ok(self.state.lock().unwrap().keys.get(key_id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<ApiKeyProfile>> {
        let state = self.state.lock().unwrap();
        let mut keys: Vec<&ApiKey> = state
            .keys
            .values()
            .filter(|k| k.user_id == user_id)
            .collect();
        keys.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(keys
            .into_iter()
            .map(|k| ApiKeyProfile {
                key_id: k.key_id.clone(),
                name: k.name.clone(),
                created_at: k.created_at,
            })
            .collect())
    }
}

enum Staged {
    Insert(ApiKey),
    Delete(String),
    Audit(AuditEntry),
}

pub struct InMemoryUnitOfWork {
    state: Arc<Mutex<StoreState>>,
    fail_audit_writes: Arc<AtomicBool>,
    staged: Vec<Staged>,
}

impl InMemoryUnitOfWork {
    /// The key as this transaction sees it: committed state plus staged writes.
    fn visible_key(&self, key_id: &str) -> Option<ApiKey> {
        let mut key = self.state.lock().unwrap().keys.get(key_id).cloned();
        for op in &self.staged {
            match op {
                Staged::Insert(k) if k.key_id == key_id => key = Some(k.clone()),
                Staged::Delete(id) if id == key_id => key = None,
                _ => {}
            }
        }
        key
    }
}

#[async_trait]
impl AuditSink for InMemoryUnitOfWork {
    async fn insert_audit_entry(&mut self, entry: &NewAuditEntry) -> AppResult<AuditEntry> {
        if self.fail_audit_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database("Database operation failed".into()));
        }

        let recorded = AuditEntry {
            id: Uuid::new_v4(),
            action: entry.action.as_str().to_string(),
            company_id: entry.company_id,
            actor: entry.actor.clone(),
            context: entry.context.clone(),
            target: entry.target.clone(),
            summary: entry.summary.clone(),
            created_at: chrono::Utc::now(),
        };
        self.staged.push(Staged::Audit(recorded.clone()));
        Ok(recorded)
    }
}

#[async_trait]
impl ApiKeyUnitOfWork for InMemoryUnitOfWork {
    async fn insert_api_key(
        &mut self,
        key_id: &str,
        user_id: Uuid,
        hashed_token: &str,
    ) -> AppResult<ApiKey> {
        if self.visible_key(key_id).is_some() {
            return Err(AppError::Database("Unique constraint violated".into()));
        }

        let key = ApiKey {
            id: Uuid::new_v4(),
            key_id: key_id.to_string(),
            user_id,
            hashed_token: hashed_token.to_string(),
            name: DEFAULT_KEY_NAME.to_string(),
            created_at: chrono::Utc::now(),
        };
        self.staged.push(Staged::Insert(key.clone()));
        Ok(key)
    }

    async fn delete_api_key(&mut self, key_id: &str) -> AppResult<ApiKey> {
        let key = self
            .visible_key(key_id)
            .ok_or_else(|| AppError::Database("No matching row".into()))?;

        self.staged.push(Staged::Delete(key_id.to_string()));
        Ok(key)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let Self { state, staged, .. } = *self;
        let mut state = state.lock().unwrap();
        for op in staged {
            match op {
                Staged::Insert(key) => {
                    state.keys.insert(key.key_id.clone(), key);
                }
                Staged::Delete(key_id) => {
                    state.keys.remove(&key_id);
                }
                Staged::Audit(entry) => state.audit.push(entry),
            }
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}

/// Real tokens and hashes, but the same public id every time, so a second
/// create collides on the unique `key_id`.
pub struct FixedPublicId(pub &'static str);

impl CredentialGenerator for FixedPublicId {
    fn generate_token(&self) -> SecretString {
        SecureCredentials.generate_token()
    }

    fn generate_public_id(&self) -> String {
        self.0.to_string()
    }

    fn hash(&self, token: &SecretString) -> AppResult<String> {
        SecureCredentials.hash(token)
    }
}

/// In-memory implementation of UserRepo for testing.
#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<HashMap<Uuid, SessionUser>>,
}

impl InMemoryUserRepo {
    pub fn with_users(users: Vec<SessionUser>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn get_session_user(&self, user_id: Uuid) -> AppResult<Option<SessionUser>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn uncommitted_writes_are_invisible() {
        let repo = InMemoryApiKeyRepo::new();
        let mut tx = repo.begin().await.unwrap();

        tx.insert_api_key("key_a", Uuid::new_v4(), "hash").await.unwrap();
        assert!(repo.get_by_key_id("key_a").await.unwrap().is_none());

        tx.commit().await.unwrap();
        assert!(repo.get_by_key_id("key_a").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn dropped_unit_of_work_discards_writes() {
        let repo = InMemoryApiKeyRepo::new();
        {
            let mut tx = repo.begin().await.unwrap();
            tx.insert_api_key("key_a", Uuid::new_v4(), "hash").await.unwrap();
        }

        assert!(repo.all_keys().is_empty());
    }

    #[tokio::test]
    async fn duplicate_key_id_is_rejected() {
        let repo = InMemoryApiKeyRepo::new();
        let mut tx = repo.begin().await.unwrap();

        tx.insert_api_key("key_a", Uuid::new_v4(), "hash").await.unwrap();
        let result = tx.insert_api_key("key_a", Uuid::new_v4(), "hash").await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn delete_sees_staged_insert() {
        let repo = InMemoryApiKeyRepo::new();
        let user_id = Uuid::new_v4();
        let mut tx = repo.begin().await.unwrap();

        tx.insert_api_key("key_a", user_id, "hash").await.unwrap();
        tx.delete_api_key("key_a").await.unwrap();
        let again = tx.delete_api_key("key_a").await;

        assert!(matches!(again, Err(AppError::Database(_))));
        tx.commit().await.unwrap();
        assert!(repo.all_keys().is_empty());
    }
}
