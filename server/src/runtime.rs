//! Startup shared by the HTTP server and the Lambda entrypoint.

use anyhow::Result;
use tracing::{Level, info};

use crate::service::BulbService;
use crate::storage::{self, StorageConfig};

/// Load `.env`, then install the fmt subscriber (INFO unless `RUST_LOG` says otherwise).
pub fn init() {
    // Pick up a local .env before anything reads the environment
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        )
        .init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }
}

pub async fn service_from_config(config: StorageConfig) -> Result<BulbService> {
    let repository = storage::from_config(config).await?;
    Ok(BulbService::new(repository))
}

pub async fn service_from_env() -> Result<BulbService> {
    service_from_config(StorageConfig::from_env()?).await
}
