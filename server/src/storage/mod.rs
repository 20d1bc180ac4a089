mod backend;
mod collection;
mod config;
mod dynamodb;
mod error;
mod factory;
mod file;
mod id;
mod traits;

pub use backend::{ObjectStoreBackend, ObjectStoreBulbRepository};
pub use collection::{CollectionRepository, CollectionStore};
pub use config::{DEFAULT_FILE_PATH, DEFAULT_OBJECT_KEY, DEFAULT_TABLE_NAME, StorageConfig};
pub use dynamodb::DynamoDbBulbRepository;
pub use error::StorageError;
pub use factory::from_config;
pub use file::{FileBulbRepository, JsonFileStore};
pub use id::IdGenerator;
pub use traits::BulbRepository;
