use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{0} environment variable must be set")]
    MissingSetting(&'static str),

    #[error("Unknown storage backend: {0}. Must be 'file', 's3' or 'dynamodb'")]
    UnknownBackend(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("Malformed item in table {table}: {reason}")]
    MalformedItem { table: String, reason: String },

    #[error("Table {table} did not become active after {attempts} checks")]
    TableNotActive { table: String, attempts: u32 },
}
