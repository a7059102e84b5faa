use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    ApiKeyCreated,
    ApiKeyDeleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::ApiKeyCreated => "apiKey.created",
            AuditAction::ApiKeyDeleted => "apiKey.deleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditActor {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Uuid,
}

impl AuditActor {
    pub fn user(id: Uuid) -> Self {
        Self {
            kind: "user".to_string(),
            id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTarget {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Uuid,
}

impl AuditTarget {
    pub fn api_key(id: Uuid) -> Self {
        Self {
            kind: "apiKey".to_string(),
            id,
        }
    }
}

/// Where the audited request came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditContext {
    pub user_agent: Option<String>,
    pub request_ip: Option<String>,
}

/// An audit entry that has not been written yet.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub action: AuditAction,
    pub company_id: Uuid,
    pub actor: AuditActor,
    pub context: AuditContext,
    pub target: Vec<AuditTarget>,
    pub summary: String,
}

/// Append-only audit record. Never updated or deleted once written.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: Uuid,
    pub action: String,
    pub company_id: Uuid,
    pub actor: AuditActor,
    pub context: AuditContext,
    pub target: Vec<AuditTarget>,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}
