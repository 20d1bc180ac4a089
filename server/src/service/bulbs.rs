use bulb_types::LightBulb;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::error::{ServiceError, ServiceResult};
use crate::storage::BulbRepository;

/// Bulb operations on top of whichever repository was configured at startup.
#[derive(Clone)]
pub struct BulbService {
    repository: Arc<dyn BulbRepository>,
}

impl std::fmt::Debug for BulbService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulbService")
            .field("backend", &self.repository.backend_name())
            .finish()
    }
}

impl BulbService {
    pub fn new(repository: Arc<dyn BulbRepository>) -> Self {
        Self { repository }
    }

    pub fn backend_name(&self) -> &'static str {
        self.repository.backend_name()
    }

    #[instrument(skip(self, bulb))]
    pub async fn add_bulb(&self, bulb: LightBulb) -> ServiceResult<LightBulb> {
        bulb.validate()?;

        info!("Adding new bulb: {}", bulb);
        let saved = self
            .repository
            .save(bulb)
            .await
            .inspect_err(|e| error!("Failed to add bulb: {:#}", e))
            .map_err(ServiceError::storage("add bulb"))?;

        info!("Successfully added bulb with ID: {:?}", saved.id);
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn get_all_bulbs(&self) -> ServiceResult<Vec<LightBulb>> {
        info!("Fetching all bulbs");
        let bulbs = self
            .repository
            .find_all()
            .await
            .inspect_err(|e| error!("Failed to retrieve bulbs: {:#}", e))
            .map_err(ServiceError::storage("retrieve bulbs"))?;

        info!("Successfully retrieved {} bulbs", bulbs.len());
        Ok(bulbs)
    }

    #[instrument(skip(self))]
    pub async fn get_bulb_by_id(&self, id: i64) -> ServiceResult<LightBulb> {
        self.find_existing(id, "fetch bulb").await
    }

    /// Overlay `name`, `type` and `wattage` from `update` onto the stored bulb.
    /// Any id in `update` is ignored.
    #[instrument(skip(self, update))]
    pub async fn update_bulb(&self, id: i64, update: LightBulb) -> ServiceResult<LightBulb> {
        update.validate()?;

        let mut existing = self.find_existing(id, "update bulb").await?;
        debug!("Found existing bulb: {}", existing);

        existing.name = update.name;
        existing.bulb_type = update.bulb_type;
        existing.wattage = update.wattage;

        let updated = self
            .repository
            .save(existing)
            .await
            .inspect_err(|e| error!("Failed to update bulb with ID {}: {:#}", id, e))
            .map_err(ServiceError::storage("update bulb"))?;

        info!("Successfully updated bulb with ID: {}", id);
        Ok(updated)
    }

    /// Unlike the repository, deleting an unknown id is an error here.
    #[instrument(skip(self))]
    pub async fn delete_bulb(&self, id: i64) -> ServiceResult<()> {
        self.find_existing(id, "delete bulb").await?;

        self.repository
            .delete_by_id(id)
            .await
            .inspect_err(|e| error!("Failed to delete bulb with ID {}: {:#}", id, e))
            .map_err(ServiceError::storage("delete bulb"))?;

        info!("Successfully deleted bulb with ID: {}", id);
        Ok(())
    }

    async fn find_existing(&self, id: i64, action: &'static str) -> ServiceResult<LightBulb> {
        debug!("Looking up bulb with ID: {}", id);
        self.repository
            .find_by_id(id)
            .await
            .inspect_err(|e| error!("Failed to {} with ID {}: {:#}", action, id, e))
            .map_err(ServiceError::storage(action))?
            .ok_or_else(|| ServiceError::bulb_not_found(id))
    }
}
