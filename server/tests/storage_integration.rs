#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

use anyhow::Result;
use bulb_server::storage::{
    BulbRepository, DynamoDbBulbRepository, FileBulbRepository, ObjectStoreBulbRepository,
    StorageConfig,
};
use bulb_types::LightBulb;
use tempfile::TempDir;
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::dynamodb_local::DynamoDb;
use testcontainers_modules::minio::MinIO;

// ============================================================================
// Shared contract checks
// ============================================================================

async fn check_repository_contract(repo: &dyn BulbRepository) -> Result<()> {
    assert!(repo.find_all().await?.is_empty());
    assert!(repo.find_by_id(12345).await?.is_none());

    // Round trip with a generated id
    let saved = repo.save(LightBulb::new("Kitchen", "LED", 9)).await?;
    let id = saved.id.expect("save assigns an id");
    let found = repo.find_by_id(id).await?.expect("saved bulb is found");
    assert_eq!(found.name, "Kitchen");
    assert_eq!(found.bulb_type, "LED");
    assert_eq!(found.wattage, 9);

    let all = repo.find_all().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, Some(id));

    // Upsert twice with the same id
    let changed = LightBulb::new("Kitchen", "LED", 12).with_id(id);
    repo.save(changed.clone()).await?;
    repo.save(changed.clone()).await?;
    assert_eq!(repo.find_all().await?.len(), 1);
    assert_eq!(repo.find_by_id(id).await?, Some(changed));

    // A second record gets a different id
    let other = repo.save(LightBulb::new("Porch", "CFL", 13)).await?;
    assert_ne!(other.id, Some(id));
    assert_eq!(repo.find_all().await?.len(), 2);

    // Deleting an unknown id changes nothing
    repo.delete_by_id(-1).await?;
    assert_eq!(repo.find_all().await?.len(), 2);

    repo.delete_by_id(id).await?;
    repo.delete_by_id(other.id.expect("save assigns an id")).await?;
    assert!(repo.find_all().await?.is_empty());

    Ok(())
}

// ============================================================================
// File Storage Tests
// ============================================================================

#[tokio::test]
async fn test_file_repository_contract() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repo = FileBulbRepository::open(temp_dir.path().join("bulbs.json")).await?;
    check_repository_contract(&repo).await
}

#[tokio::test]
async fn test_file_repository_survives_reopen() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("bulbs.json");

    let saved = {
        let repo = FileBulbRepository::open(&path).await?;
        repo.save(LightBulb::new("Kitchen", "LED", 9)).await?
    };

    let reopened = FileBulbRepository::open(&path).await?;
    assert_eq!(reopened.find_all().await?, vec![saved]);
    Ok(())
}

#[tokio::test]
async fn test_file_backend_via_factory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = StorageConfig::file(temp_dir.path().join("data").join("bulbs.json"));
    let repo = bulb_server::storage::from_config(config).await?;
    check_repository_contract(repo.as_ref()).await
}

// ============================================================================
// S3 Storage Tests
// ============================================================================

async fn setup_minio_with_bucket() -> Result<(ContainerAsync<MinIO>, String)> {
    let container = MinIO::default()
        .with_env_var("MINIO_ROOT_USER", "minioadmin")
        .with_env_var("MINIO_ROOT_PASSWORD", "minioadmin")
        .start()
        .await?;

    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(9000).await?;
    let endpoint = format!("http://{}:{}", host, port);

    // Wait for MinIO to be ready
    tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;

    use aws_config::BehaviorVersion;
    use aws_sdk_s3::config::{Credentials, Region};

    let creds = Credentials::new("minioadmin", "minioadmin", None, None, "test");
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .endpoint_url(&endpoint)
        .credentials_provider(creds)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(config)
        .create_bucket()
        .bucket("test-bucket")
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create bucket: {}", e))?;

    Ok((container, endpoint))
}

fn minio_config(endpoint: String) -> StorageConfig {
    StorageConfig::s3(
        "test-bucket",
        Some("us-east-1".to_string()),
        Some(endpoint),
        Some("minioadmin".to_string()),
        Some("minioadmin".to_string()),
        true,
    )
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_s3_repository_contract() -> Result<()> {
    let (_container, endpoint) = setup_minio_with_bucket().await?;
    let repo = ObjectStoreBulbRepository::from_config(minio_config(endpoint))?;
    check_repository_contract(&repo).await
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_s3_instances_share_the_object() -> Result<()> {
    let (_container, endpoint) = setup_minio_with_bucket().await?;
    let writer = ObjectStoreBulbRepository::from_config(minio_config(endpoint.clone()))?;
    let reader = ObjectStoreBulbRepository::from_config(minio_config(endpoint))?;

    let saved = writer.save(LightBulb::new("Kitchen", "LED", 9)).await?;
    assert_eq!(reader.find_all().await?, vec![saved]);
    Ok(())
}

// ============================================================================
// DynamoDB Storage Tests
// ============================================================================

async fn setup_dynamodb() -> Result<(ContainerAsync<DynamoDb>, aws_sdk_dynamodb::Client)> {
    let container = DynamoDb::default().start().await?;
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(8000).await?;

    use aws_config::BehaviorVersion;
    use aws_sdk_dynamodb::config::{Credentials, Region};

    let config = aws_sdk_dynamodb::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .endpoint_url(format!("http://{}:{}", host, port))
        .credentials_provider(Credentials::new("test", "test", None, None, "test"))
        .build();

    Ok((container, aws_sdk_dynamodb::Client::from_conf(config)))
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_dynamodb_repository_contract() -> Result<()> {
    let (_container, client) = setup_dynamodb().await?;
    let repo = DynamoDbBulbRepository::new(client, "LightBulb");
    repo.ensure_table().await?;
    check_repository_contract(&repo).await
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_dynamodb_ensure_table_is_idempotent() -> Result<()> {
    let (_container, client) = setup_dynamodb().await?;
    let repo = DynamoDbBulbRepository::new(client, "Bulbs");
    assert_eq!(repo.table_name(), "Bulbs");
    repo.ensure_table().await?;
    repo.ensure_table().await?;

    let saved = repo.save(LightBulb::new("Kitchen", "LED", 9)).await?;
    assert_eq!(repo.find_by_id(saved.id.expect("id")).await?, Some(saved));
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_dynamodb_scan_follows_pages() -> Result<()> {
    let (_container, client) = setup_dynamodb().await?;
    let repo = DynamoDbBulbRepository::new(client, "LightBulb");
    repo.ensure_table().await?;

    // Large names push the table past the 1 MB scan page size.
    let name = "x".repeat(100_000);
    for i in 0..15 {
        repo.save(LightBulb::new(name.clone(), "LED", 1).with_id(i)).await?;
    }
    assert_eq!(repo.find_all().await?.len(), 15);
    Ok(())
}
