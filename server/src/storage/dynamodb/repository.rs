use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType, TableStatus,
};
use bulb_types::LightBulb;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::conversions::{ID, Item, from_item, key_value, to_item};
use crate::storage::config::StorageConfig;
use crate::storage::error::StorageError;
use crate::storage::id::IdGenerator;
use crate::storage::traits::BulbRepository;

const ACTIVE_POLL_INTERVAL: Duration = Duration::from_secs(1);
const ACTIVE_POLL_ATTEMPTS: u32 = 60;

pub struct DynamoDbBulbRepository {
    client: Client,
    table_name: String,
    ids: IdGenerator,
}

impl DynamoDbBulbRepository {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        let table_name = table_name.into();
        info!("Initialized DynamoDB repository for table: {}", table_name);
        Self {
            client,
            table_name,
            ids: IdGenerator::new(),
        }
    }

    /// Connect using the ambient AWS credential chain and make sure the table exists.
    pub async fn from_config(config: StorageConfig) -> Result<Self> {
        let backend = config.backend_name();
        let StorageConfig::DynamoDb {
            table_name,
            region,
            endpoint,
        } = config
        else {
            anyhow::bail!(
                "DynamoDB storage needs a DynamoDb config, got the {} backend",
                backend
            );
        };

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&shared);
        if let Some(endpoint) = endpoint {
            info!("Using DynamoDB endpoint: {}", endpoint);
            builder = builder.endpoint_url(endpoint);
        }

        let repo = Self::new(Client::from_conf(builder.build()), table_name);
        repo.ensure_table().await?;
        Ok(repo)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Create the table with `id` as its only key if it does not exist yet,
    /// then wait for it to become active.
    pub async fn ensure_table(&self) -> Result<()> {
        match self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
        {
            Ok(_) => {
                info!("DynamoDB table {} already exists", self.table_name);
                return self.wait_until_active().await;
            }
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_resource_not_found_exception()) => {}
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to initialize DynamoDB table {}", self.table_name)
                });
            }
        }

        info!("Creating DynamoDB table: {}", self.table_name);
        let created = self
            .client
            .create_table()
            .table_name(&self.table_name)
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name(ID)
                    .key_type(KeyType::Hash)
                    .build()?,
            )
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name(ID)
                    .attribute_type(ScalarAttributeType::N)
                    .build()?,
            )
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await;

        match created {
            Ok(_) => info!("Successfully created DynamoDB table: {}", self.table_name),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_resource_in_use_exception()) =>
            {
                warn!("DynamoDB table {} was created concurrently", self.table_name);
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to create DynamoDB table {}", self.table_name)
                });
            }
        }

        self.wait_until_active().await
    }

    async fn wait_until_active(&self) -> Result<()> {
        for attempt in 1..=ACTIVE_POLL_ATTEMPTS {
            let output = self
                .client
                .describe_table()
                .table_name(&self.table_name)
                .send()
                .await
                .with_context(|| format!("Failed to describe DynamoDB table {}", self.table_name))?;

            let status = output.table().and_then(|t| t.table_status());
            if status == Some(&TableStatus::Active) {
                info!("DynamoDB table {} is now active", self.table_name);
                return Ok(());
            }

            debug!(
                "DynamoDB table {} not active yet ({:?}), attempt {}",
                self.table_name, status, attempt
            );
            tokio::time::sleep(ACTIVE_POLL_INTERVAL).await;
        }

        Err(StorageError::TableNotActive {
            table: self.table_name.clone(),
            attempts: ACTIVE_POLL_ATTEMPTS,
        }
        .into())
    }

    fn decode(&self, item: &Item) -> Result<LightBulb> {
        from_item(item).map_err(|reason| {
            StorageError::MalformedItem {
                table: self.table_name.clone(),
                reason,
            }
            .into()
        })
    }
}

#[async_trait]
impl BulbRepository for DynamoDbBulbRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<LightBulb>> {
        debug!("Fetching all light bulbs from DynamoDB");

        let mut bulbs = Vec::new();
        let mut start_key: Option<Item> = None;
        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .context("Failed to retrieve light bulbs")?;

            for item in output.items.unwrap_or_default() {
                bulbs.push(self.decode(&item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(bulbs)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<LightBulb>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ID, key_value(id))
            .send()
            .await
            .with_context(|| format!("Error finding light bulb with id: {id}"))?;

        match output.item {
            Some(item) => Ok(Some(self.decode(&item)?)),
            None => {
                debug!("No light bulb found with id: {}", id);
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, bulb))]
    async fn save(&self, mut bulb: LightBulb) -> Result<LightBulb> {
        let id = match bulb.id {
            Some(id) => id,
            None => {
                let id = self.ids.next_id();
                debug!("Generated new ID for light bulb: {}", id);
                id
            }
        };
        bulb.id = Some(id);

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_item(&bulb, id)))
            .send()
            .await
            .with_context(|| format!("Failed to save light bulb: {bulb}"))?;

        info!("Saved bulb {}", id);
        Ok(bulb)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(ID, key_value(id))
            .send()
            .await
            .with_context(|| format!("Failed to delete light bulb with id: {id}"))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "dynamodb"
    }
}
