use anyhow::Result;
use async_trait::async_trait;
use bulb_types::LightBulb;
use tracing::{debug, info, instrument};

use super::id::IdGenerator;
use super::traits::BulbRepository;

/// A place that holds the whole bulb collection as one JSON document.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Load every record. A missing document is an empty collection.
    async fn read_all(&self) -> Result<Vec<LightBulb>>;

    /// Replace the stored document with `bulbs`.
    async fn write_all(&self, bulbs: &[LightBulb]) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}

/// Repository over a [`CollectionStore`].
///
/// Every mutation reads the full collection, edits it in memory and writes it
/// back. Concurrent writers race: the last write wins.
pub struct CollectionRepository<S> {
    store: S,
    ids: IdGenerator,
}

impl<S: CollectionStore> CollectionRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            ids: IdGenerator::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: CollectionStore> BulbRepository for CollectionRepository<S> {
    async fn find_all(&self) -> Result<Vec<LightBulb>> {
        self.store.read_all().await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<LightBulb>> {
        let bulbs = self.store.read_all().await?;
        Ok(bulbs.into_iter().find(|b| b.id == Some(id)))
    }

    #[instrument(skip(self, bulb))]
    async fn save(&self, mut bulb: LightBulb) -> Result<LightBulb> {
        let mut bulbs = self.store.read_all().await?;

        let id = match bulb.id {
            Some(id) => id,
            None => {
                let id = self
                    .ids
                    .next_unused(|candidate| bulbs.iter().any(|b| b.id == Some(candidate)));
                debug!("Generated id {} for new bulb", id);
                id
            }
        };
        bulb.id = Some(id);

        bulbs.retain(|b| b.id != Some(id));
        bulbs.push(bulb.clone());
        self.store.write_all(&bulbs).await?;

        info!("Saved bulb {}", id);
        Ok(bulb)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: i64) -> Result<()> {
        let mut bulbs = self.store.read_all().await?;
        let before = bulbs.len();
        bulbs.retain(|b| b.id != Some(id));
        // Written back even when nothing matched.
        self.store.write_all(&bulbs).await?;

        debug!("Removed {} record(s) with id {}", before - bulbs.len(), id);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}
