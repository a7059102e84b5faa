use async_trait::async_trait;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::audit_log::{AuditEntry, NewAuditEntry},
};

/// Anything audit entries can be appended to.
///
/// Implemented by transaction handles so the entry commits or rolls back
/// together with the mutation it describes.
#[async_trait]
pub trait AuditSink: Send {
    async fn insert_audit_entry(&mut self, entry: &NewAuditEntry) -> AppResult<AuditEntry>;
}

pub struct Audit;

impl Audit {
    /// Append `entry` through `sink`, which must be the transaction the
    /// audited mutation runs in.
    pub async fn record<S>(entry: NewAuditEntry, sink: &mut S) -> AppResult<AuditEntry>
    where
        S: AuditSink + ?Sized,
    {
        if entry.target.is_empty() {
            return Err(AppError::Internal(format!(
                "audit entry {} has no target",
                entry.action.as_str()
            )));
        }

        let recorded = sink.insert_audit_entry(&entry).await?;

        tracing::info!(
            audit_id = %recorded.id,
            action = %recorded.action,
            company_id = %recorded.company_id,
            actor_id = %recorded.actor.id,
            "Audit entry recorded"
        );

        Ok(recorded)
    }
}
