pub mod api_key;

use axum::{Router, middleware};

use crate::adapters::http::{app_state::AppState, middleware::require_session};

pub fn router(app_state: AppState) -> Router<AppState> {
    Router::new().nest(
        "/api-keys",
        api_key::router().layer(middleware::from_fn_with_state(app_state, require_session)),
    )
}
