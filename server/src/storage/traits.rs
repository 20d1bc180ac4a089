use anyhow::Result;
use async_trait::async_trait;
use bulb_types::LightBulb;

/// Persistence contract shared by every storage backend.
///
/// "Not found" is never an error here: lookups return `None` and deletes of
/// unknown ids succeed. Any `Err` is a storage failure with its cause chained.
#[async_trait]
pub trait BulbRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<LightBulb>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<LightBulb>>;

    /// Insert or replace by id.
    ///
    /// A bulb without an id gets a freshly generated one. The returned value
    /// is the record as persisted, always with `id` set.
    async fn save(&self, bulb: LightBulb) -> Result<LightBulb>;

    async fn delete_by_id(&self, id: i64) -> Result<()>;

    /// Short backend name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;
}
