use crate::{adapters::persistence::PostgresPersistence, infra::config::AppConfig};

pub mod app;
pub mod config;
pub mod crypto;
pub mod db;
pub mod setup;

pub async fn postgres_persistence(config: &AppConfig) -> anyhow::Result<PostgresPersistence> {
    let pool = db::init_db(&config.database_url, config.db_max_connections).await?;
    if config.run_migrations {
        db::run_migrations(&pool).await?;
    }
    Ok(PostgresPersistence::new(pool))
}
