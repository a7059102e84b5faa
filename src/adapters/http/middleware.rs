use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{
        HeaderMap,
        header::{AUTHORIZATION, USER_AGENT},
    },
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppError,
    application::{jwt, request_context::RequestContext},
};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Authenticate the request and attach a [`RequestContext`] for handlers.
///
/// The session token is taken from `Authorization: Bearer` first, then from
/// the `access_token` cookie. Anything missing or invalid is a 401.
pub async fn require_session(
    State(app_state): State<AppState>,
    cookies: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .or_else(|| {
            cookies
                .get(ACCESS_TOKEN_COOKIE)
                .map(|c| c.value().to_owned())
        })
        .ok_or(AppError::InvalidCredentials)?;

    let claims = jwt::verify(&token, &app_state.config.jwt_secret)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidCredentials)?;

    let user = app_state
        .user_repo
        .get_session_user(user_id)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let ctx = RequestContext {
        user,
        user_agent: request
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        request_ip: client_ip(&request, app_state.config.trust_proxy),
    };

    tracing::debug!(
        user_id = %ctx.user.id,
        company_id = %ctx.user.company_id,
        request_ip = ?ctx.request_ip,
        "Session authenticated"
    );

    request.extensions_mut().insert(ctx);

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn client_ip(req: &Request, trust_proxy: bool) -> Option<String> {
    // Only trust forwarded headers if explicitly configured (when behind a reverse proxy)
    if trust_proxy && let Some(ip) = forwarded_ip(req) {
        return Some(ip);
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

fn forwarded_ip(req: &Request) -> Option<String> {
    // Extract IP from X-Forwarded-For or X-Real-IP headers
    if let Some(forwarded) = req.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let trimmed = first.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    if let Some(real) = req.headers().get("x-real-ip")
        && let Ok(val) = real.to_str()
        && !val.trim().is_empty()
    {
        return Some(val.trim().to_string());
    }
    None
}
