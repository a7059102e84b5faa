use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;

pub struct AppConfig {
    pub jwt_secret: SecretString,
    pub cors_origin: HeaderValue,
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Apply pending migrations from `migrations/` at startup.
    pub run_migrations: bool,
    /// Whether to trust X-Forwarded-For headers. Set to true when behind a reverse proxy (Caddy, nginx).
    /// SECURITY: Only enable this when the API is not directly exposed to the internet.
    pub trust_proxy: bool,
    /// Optional path for JSON logs in addition to the console.
    pub log_file: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret: SecretString = SecretString::new(get_env::<String>("JWT_SECRET").into());

        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");

        let bind_addr: SocketAddr = get_env_default(
            "BIND_ADDR",
            SocketAddr::from(([127, 0, 0, 1], 3001)),
        );
        let database_url: String = get_env("DATABASE_URL");
        let db_max_connections: u32 = get_env_default("DB_MAX_CONNECTIONS", 5);
        let run_migrations: bool = get_env_default("RUN_MIGRATIONS", true);
        // Default to false for security - must explicitly enable when behind a trusted proxy
        let trust_proxy: bool = get_env_default("TRUST_PROXY", false);
        let log_file: Option<String> = std::env::var("LOG_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Self {
            jwt_secret,
            cors_origin,
            bind_addr,
            database_url,
            db_max_connections,
            run_migrations,
            trust_proxy,
            log_file,
        }
    }
}
