use anyhow::{Context, Result};
use async_trait::async_trait;
use bulb_types::LightBulb;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use std::sync::Arc;
use tracing::{debug, info};

use super::collection::{CollectionRepository, CollectionStore};
use super::config::StorageConfig;
use super::error::StorageError;

pub type ObjectStoreBulbRepository = CollectionRepository<ObjectStoreBackend>;

/// The bulb collection as a single JSON object in a bucket.
pub struct ObjectStoreBackend {
    store: Arc<dyn ObjectStore>,
    location: Path,
}

impl ObjectStoreBackend {
    pub fn new(store: Arc<dyn ObjectStore>, key: &str) -> Self {
        Self {
            store,
            location: Path::from(key),
        }
    }

    pub fn from_config(config: StorageConfig) -> Result<Self> {
        match config {
            StorageConfig::S3 {
                bucket,
                key,
                region,
                endpoint,
                access_key_id,
                secret_access_key,
                allow_http,
            } => {
                if bucket.trim().is_empty() {
                    return Err(StorageError::MissingSetting("BULBS_BUCKET").into());
                }
                info!("Initializing S3 storage at: s3://{}/{}", bucket, key);

                let mut builder = AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .with_allow_http(allow_http);
                if let Some(region) = region {
                    builder = builder.with_region(region);
                }
                if let Some(endpoint) = endpoint {
                    builder = builder.with_endpoint(endpoint);
                }
                if let Some(access_key_id) = access_key_id {
                    builder = builder.with_access_key_id(access_key_id);
                }
                if let Some(secret_access_key) = secret_access_key {
                    builder = builder.with_secret_access_key(secret_access_key);
                }

                let store = builder.build().context("Failed to build S3 client")?;
                Ok(Self::new(Arc::new(store), &key))
            }
            other => anyhow::bail!(
                "Object storage needs an S3 config, got the {} backend",
                other.backend_name()
            ),
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }
}

impl ObjectStoreBulbRepository {
    pub fn from_config(config: StorageConfig) -> Result<Self> {
        Ok(Self::new(ObjectStoreBackend::from_config(config)?))
    }
}

#[async_trait]
impl CollectionStore for ObjectStoreBackend {
    async fn read_all(&self) -> Result<Vec<LightBulb>> {
        match self.store.get(&self.location).await {
            Ok(result) => {
                let bytes = result
                    .bytes()
                    .await
                    .with_context(|| format!("Failed to load bulbs from {}", self.location))?;
                let bulbs = serde_json::from_slice(&bytes)
                    .with_context(|| format!("Failed to parse bulbs from {}", self.location))?;
                Ok(bulbs)
            }
            Err(object_store::Error::NotFound { .. }) => {
                debug!("No bulb object at {}, starting empty", self.location);
                Ok(Vec::new())
            }
            Err(e) => {
                Err(e).with_context(|| format!("Failed to load bulbs from {}", self.location))
            }
        }
    }

    async fn write_all(&self, bulbs: &[LightBulb]) -> Result<()> {
        let json = serde_json::to_vec_pretty(bulbs).context("Failed to serialize bulbs")?;
        self.store
            .put(&self.location, PutPayload::from(Bytes::from(json)))
            .await
            .with_context(|| format!("Failed to save bulbs to {}", self.location))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
