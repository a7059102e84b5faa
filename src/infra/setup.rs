use std::fs::File;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::{
        api_key::{ApiKeyRepo, ApiKeyUseCases},
        user::UserRepo,
    },
    infra::{config::AppConfig, crypto::SecureCredentials, postgres_persistence},
};

pub async fn init_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let postgres_arc = Arc::new(postgres_persistence(&config).await?);

    let api_key_use_cases = ApiKeyUseCases::new(
        postgres_arc.clone() as Arc<dyn ApiKeyRepo>,
        Arc::new(SecureCredentials),
    );

    Ok(AppState {
        config: Arc::new(config),
        api_key_use_cases: Arc::new(api_key_use_cases),
        user_repo: postgres_arc as Arc<dyn UserRepo>,
    })
}

pub fn init_tracing(log_file: Option<&str>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "api_key_service=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don't show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs), only when configured
    let json_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| anyhow::anyhow!("cannot create log file {path}: {e}"))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(true)
                    .with_span_list(true)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    Ok(())
}
