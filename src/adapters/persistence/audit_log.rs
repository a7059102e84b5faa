use sqlx::{PgConnection, Row, types::Json};

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::audit_log::{AuditActor, AuditContext, AuditEntry, AuditTarget, NewAuditEntry},
};

fn row_to_entry(row: sqlx::postgres::PgRow) -> AuditEntry {
    let actor: Json<AuditActor> = row.get("actor");
    let context: Json<AuditContext> = row.get("context");
    let target: Json<Vec<AuditTarget>> = row.get("target");
    AuditEntry {
        id: row.get("id"),
        action: row.get("action"),
        company_id: row.get("company_id"),
        actor: actor.0,
        context: context.0,
        target: target.0,
        summary: row.get("summary"),
        created_at: row.get("created_at"),
    }
}

/// Append an audit entry on `conn`, normally an open transaction.
pub async fn insert_audit_entry(
    conn: &mut PgConnection,
    entry: &NewAuditEntry,
) -> AppResult<AuditEntry> {
    let row = sqlx::query(
        r#"
        INSERT INTO audit_logs (action, company_id, actor, context, target, summary)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, action, company_id, actor, context, target, summary, created_at
        "#,
    )
    .bind(entry.action.as_str())
    .bind(entry.company_id)
    .bind(Json(&entry.actor))
    .bind(Json(&entry.context))
    .bind(Json(&entry.target))
    .bind(&entry.summary)
    .fetch_one(conn)
    .await
    .map_err(AppError::from)?;

    Ok(row_to_entry(row))
}
