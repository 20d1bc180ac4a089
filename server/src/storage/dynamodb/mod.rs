//! DynamoDB storage backend.
//!
//! One item per bulb in a table keyed by the numeric `id` attribute, using
//! `aws-sdk-dynamodb`. Unlike the collection backends, writes are native
//! per-key upserts and deletes with no read-before-write.

mod conversions;
mod repository;

pub use repository::DynamoDbBulbRepository;
