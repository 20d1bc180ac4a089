use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::StorageError;

pub const DEFAULT_FILE_PATH: &str = "./bulbs.json";
pub const DEFAULT_OBJECT_KEY: &str = "bulbs.json";
pub const DEFAULT_TABLE_NAME: &str = "LightBulb";

/// Which backend to run against, chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageConfig {
    File {
        path: PathBuf,
    },
    S3 {
        bucket: String,
        key: String,
        region: Option<String>,
        endpoint: Option<String>,
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        allow_http: bool,
    },
    DynamoDb {
        table_name: String,
        region: Option<String>,
        endpoint: Option<String>,
    },
}

impl StorageConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    pub fn s3(
        bucket: impl Into<String>,
        region: Option<String>,
        endpoint: Option<String>,
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        allow_http: bool,
    ) -> Self {
        Self::S3 {
            bucket: bucket.into(),
            key: DEFAULT_OBJECT_KEY.to_string(),
            region,
            endpoint,
            access_key_id,
            secret_access_key,
            allow_http,
        }
    }

    pub fn dynamodb(
        table_name: impl Into<String>,
        region: Option<String>,
        endpoint: Option<String>,
    ) -> Self {
        Self::DynamoDb {
            table_name: table_name.into(),
            region,
            endpoint,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::File { .. } => "file",
            Self::S3 { .. } => "s3",
            Self::DynamoDb { .. } => "dynamodb",
        }
    }

    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StorageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let backend = var("STORAGE_BACKEND").unwrap_or_else(|| "file".to_string());

        match backend.to_ascii_lowercase().as_str() {
            "file" | "local" => {
                let path = var("STORAGE_PATH").unwrap_or_else(|| DEFAULT_FILE_PATH.to_string());
                Ok(Self::file(path))
            }
            "s3" => {
                let bucket = var("BULBS_BUCKET").ok_or(StorageError::MissingSetting("BULBS_BUCKET"))?;
                let allow_http = match var("AWS_ALLOW_HTTP") {
                    Some(value) => value.parse::<bool>().map_err(|_| StorageError::InvalidSetting {
                        name: "AWS_ALLOW_HTTP",
                        value,
                    })?,
                    None => false,
                };

                let mut config = Self::s3(
                    bucket,
                    var("AWS_REGION"),
                    var("AWS_ENDPOINT"),
                    var("AWS_ACCESS_KEY_ID"),
                    var("AWS_SECRET_ACCESS_KEY"),
                    allow_http,
                );
                if let (Self::S3 { key, .. }, Some(custom)) = (&mut config, var("BULBS_OBJECT_KEY")) {
                    *key = custom;
                }
                Ok(config)
            }
            "dynamodb" => Ok(Self::dynamodb(
                var("LIGHTBULB_TABLE_NAME").unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
                var("AWS_REGION"),
                var("DYNAMODB_ENDPOINT"),
            )),
            _ => Err(StorageError::UnknownBackend(backend)),
        }
    }
}
