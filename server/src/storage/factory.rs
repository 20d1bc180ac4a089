use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use super::backend::ObjectStoreBulbRepository;
use super::config::StorageConfig;
use super::dynamodb::DynamoDbBulbRepository;
use super::file::FileBulbRepository;
use super::traits::BulbRepository;

/// Build the repository selected by `config`. Called once at startup;
/// configuration problems surface here rather than on the first request.
pub async fn from_config(config: StorageConfig) -> Result<Arc<dyn BulbRepository>> {
    info!("Using {} storage backend", config.backend_name());

    let repository: Arc<dyn BulbRepository> = match config {
        StorageConfig::File { path } => Arc::new(FileBulbRepository::open(path).await?),
        config @ StorageConfig::S3 { .. } => {
            Arc::new(ObjectStoreBulbRepository::from_config(config)?)
        }
        config @ StorageConfig::DynamoDb { .. } => {
            Arc::new(DynamoDbBulbRepository::from_config(config).await?)
        }
    };
    Ok(repository)
}
