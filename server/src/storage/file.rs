use anyhow::{Context, Result};
use async_trait::async_trait;
use bulb_types::LightBulb;
use serde_json::error::Category;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::collection::{CollectionRepository, CollectionStore};

pub type FileBulbRepository = CollectionRepository<JsonFileStore>;

/// The bulb collection as a pretty-printed JSON array on local disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "bulbs.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl FileBulbRepository {
    /// Open the repository, creating the parent directory if needed.
    /// The file itself is created on first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = JsonFileStore::new(path);
        if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        info!("Initializing file storage at: {:?}", store.path);
        Ok(Self::new(store))
    }
}

#[async_trait]
impl CollectionStore for JsonFileStore {
    async fn read_all(&self) -> Result<Vec<LightBulb>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read bulbs from file: {}", self.path.display())
                });
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice(&bytes) {
            Ok(bulbs) => Ok(bulbs),
            // Only malformed JSON reads as empty.
            Err(e) if matches!(e.classify(), Category::Syntax | Category::Eof) => {
                warn!(
                    "Ignoring unreadable bulb file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
            Err(e) => Err(e).with_context(|| {
                format!("Failed to read bulbs from file: {}", self.path.display())
            }),
        }
    }

    async fn write_all(&self, bulbs: &[LightBulb]) -> Result<()> {
        let json = serde_json::to_vec_pretty(bulbs).context("Failed to serialize bulbs")?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, &json)
            .await
            .with_context(|| format!("Failed to write bulbs to file: {}", temp.display()))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .with_context(|| format!("Failed to write bulbs to file: {}", self.path.display()))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::BulbRepository;
    use tempfile::TempDir;

    async fn create_test_repo() -> (FileBulbRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileBulbRepository::open(temp_dir.path().join("bulbs.json"))
            .await
            .unwrap();
        (repo, temp_dir)
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let (repo, _dir) = create_test_repo().await;
        assert!(repo.find_all().await.unwrap().is_empty());
        assert!(repo.find_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_and_corrupt_files_are_empty() {
        let (repo, _dir) = create_test_repo().await;
        let path = repo.store().path().to_path_buf();

        tokio::fs::write(&path, b"").await.unwrap();
        assert!(repo.find_all().await.unwrap().is_empty());

        tokio::fs::write(&path, b"this is not json").await.unwrap();
        assert!(repo.find_all().await.unwrap().is_empty());

        tokio::fs::write(&path, b"[{\"id\": 1, \"name\": ").await.unwrap();
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mistyped_record_is_a_storage_failure() {
        let (repo, _dir) = create_test_repo().await;
        let path = repo.store().path().to_path_buf();
        let document = br#"[{"id":1,"name":"Kitchen","type":"LED","wattage":"nine"}]"#;
        tokio::fs::write(&path, document).await.unwrap();

        let err = repo.find_all().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read bulbs from file"));

        // Writes refuse to run over the unreadable document
        assert!(repo.save(LightBulb::new("Porch", "CFL", 13)).await.is_err());
        assert!(repo.delete_by_id(1).await.is_err());
        assert_eq!(tokio::fs::read(&path).await.unwrap(), document.to_vec());
    }

    #[tokio::test]
    async fn test_save_overwrites_corrupt_file() {
        let (repo, _dir) = create_test_repo().await;
        let path = repo.store().path().to_path_buf();
        tokio::fs::write(&path, b"garbage").await.unwrap();

        let saved = repo.save(LightBulb::new("Kitchen", "LED", 9)).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all, vec![saved]);
    }

    #[tokio::test]
    async fn test_kitchen_scenario() {
        let (repo, _dir) = create_test_repo().await;

        let saved = repo.save(LightBulb::new("Kitchen", "LED", 9)).await.unwrap();
        let id = saved.id.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, Some(id));
        assert_eq!(all[0].name, "Kitchen");
        assert_eq!(all[0].bulb_type, "LED");
        assert_eq!(all[0].wattage, 9);

        repo.delete_by_id(id).await.unwrap();
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_record() {
        let (repo, _dir) = create_test_repo().await;

        let saved = repo.save(LightBulb::new("Hall", "LED", 5)).await.unwrap();
        let id = saved.id.unwrap();
        repo.save(LightBulb::new("Porch", "CFL", 13)).await.unwrap();

        repo.save(LightBulb::new("Hall", "Halogen", 40).with_id(id))
            .await
            .unwrap();
        repo.save(LightBulb::new("Hall", "Halogen", 40).with_id(id))
            .await
            .unwrap();

        assert_eq!(repo.find_all().await.unwrap().len(), 2);
        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.bulb_type, "Halogen");
        assert_eq!(found.wattage, 40);
    }

    #[tokio::test]
    async fn test_save_with_unknown_id_inserts() {
        let (repo, _dir) = create_test_repo().await;

        let saved = repo
            .save(LightBulb::new("Garage", "LED", 12).with_id(7))
            .await
            .unwrap();
        assert_eq!(saved.id, Some(7));
        assert_eq!(repo.find_by_id(7).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let (repo, _dir) = create_test_repo().await;
        let saved = repo.save(LightBulb::new("Desk", "LED", 6)).await.unwrap();

        repo.delete_by_id(-1).await.unwrap();

        assert_eq!(repo.find_all().await.unwrap(), vec![saved]);
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed_array() {
        let (repo, _dir) = create_test_repo().await;
        repo.save(LightBulb::new("Kitchen", "LED", 9).with_id(1))
            .await
            .unwrap();

        let content = tokio::fs::read_to_string(repo.store().path()).await.unwrap();
        assert!(content.contains('\n'));
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"id": 1, "name": "Kitchen", "type": "LED", "wattage": 9}])
        );
        assert!(!repo.store().temp_path().exists());
    }

    #[tokio::test]
    async fn test_reads_existing_document() {
        let (repo, _dir) = create_test_repo().await;
        tokio::fs::write(
            repo.store().path(),
            br#"[
  { "id": 1, "name": "Kitchen", "type": "LED", "wattage": 9 },
  { "id": null, "name": "Spare", "type": "LED", "wattage": 4 }
]"#,
        )
        .await
        .unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].id, None);
        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().name, "Kitchen");
    }

    #[tokio::test]
    async fn test_unreadable_path_is_storage_failure() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be: reading fails with something other than NotFound.
        let repo = FileBulbRepository::open(temp_dir.path()).await.unwrap();
        let err = repo.find_all().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read bulbs from file"));
    }
}
