use axum::{
    Extension, Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppResult,
    application::{request_context::RequestContext, use_cases::api_key::ApiKeyProfile},
};

/// Session-authenticated API key endpoints.
/// Note: The require_session middleware is applied in mod.rs when nesting this router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_key))
        .route("/delete", post(delete_key))
        .route("/list", get(list_keys))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteKeyPayload {
    key_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateKeyResponse {
    token: String,
    key_id: String,
    created_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct ListKeysResponse {
    items: Vec<ApiKeyProfile>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/api-keys/create
/// The response is the only place the raw token is ever returned.
async fn create_key(
    State(app_state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> AppResult<impl IntoResponse> {
    let created = app_state.api_key_use_cases.create_api_key(&ctx).await?;

    Ok(Json(CreateKeyResponse {
        token: created.token.expose_secret().to_string(),
        key_id: created.key_id,
        created_at: created.created_at,
    }))
}

/// POST /api/api-keys/delete
/// Always 200; failures are reported as `{ "success": false, "message": .. }`.
async fn delete_key(
    State(app_state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<DeleteKeyPayload>,
) -> impl IntoResponse {
    let result = app_state
        .api_key_use_cases
        .delete_api_key(&ctx, &payload.key_id)
        .await;
    Json(result)
}

/// GET /api/api-keys/list
async fn list_keys(
    State(app_state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> AppResult<impl IntoResponse> {
    let items = app_state.api_key_use_cases.list_api_keys(&ctx).await?;
    Ok(Json(ListKeysResponse { items }))
}
