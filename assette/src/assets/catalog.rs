//! Persisted list of generated models
//!
//! Metadata lives in `models.json` under the configured data directory and
//! is rewritten after every change. The in-memory catalogue never touches
//! disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::AssetError;

const CATALOG_FILE: &str = "models.json";

/// Metadata for one generated model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Id of the job that produced it, also its download key
    pub id: String,

    /// When generation finished
    pub created_at: DateTime<Utc>,

    /// File name of the uploaded source image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_image: Option<String>,
}

impl Model {
    /// Creation time for display
    #[must_use]
    pub fn created_label(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M UTC").to_string()
    }
}

/// Model metadata store
#[derive(Debug)]
pub struct ModelCatalog {
    file: Option<PathBuf>,
    models: RwLock<Vec<Model>>,
}

impl ModelCatalog {
    /// Open `models.json` in `data_dir`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file exists
    /// but is not a valid catalogue.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, AssetError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir).await?;

        let file = data_dir.join(CATALOG_FILE);
        let models: Vec<Model> = match fs::read(&file).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };

        info!(path = %file.display(), models = models.len(), "Model catalogue opened");
        Ok(Self {
            file: Some(file),
            models: RwLock::new(models),
        })
    }

    /// A catalogue that is never written to disk
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            file: None,
            models: RwLock::new(Vec::new()),
        }
    }

    /// Record a finished model
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogue file cannot be written, in which
    /// case the entry is not kept.
    pub async fn add(
        &self,
        id: impl Into<String>,
        original_image: Option<String>,
    ) -> Result<Model, AssetError> {
        let model = Model {
            id: id.into(),
            created_at: Utc::now(),
            original_image,
        };

        let mut models = self.models.write().await;
        models.push(model.clone());
        if let Err(err) = self.save(&models).await {
            models.pop();
            return Err(err);
        }

        debug!(model_id = %model.id, "Model recorded");
        Ok(model)
    }

    /// Every model, newest first
    pub async fn list_all(&self) -> Vec<Model> {
        let mut models = self.models.read().await.clone();
        // later entries win ties on the timestamp
        models.reverse();
        models.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        models
    }

    /// Look up one model
    pub async fn find(&self, id: &str) -> Option<Model> {
        self.models
            .read()
            .await
            .iter()
            .find(|model| model.id == id)
            .cloned()
    }

    /// Forget a model
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::NotFound`] for an unknown id, or an error if the
    /// catalogue file cannot be written.
    pub async fn delete(&self, id: &str) -> Result<Model, AssetError> {
        let mut models = self.models.write().await;
        let index = models
            .iter()
            .position(|model| model.id == id)
            .ok_or_else(|| AssetError::NotFound(id.to_string()))?;

        let removed = models.remove(index);
        if let Err(err) = self.save(&models).await {
            models.insert(index, removed);
            return Err(err);
        }

        debug!(model_id = %id, "Model removed");
        Ok(removed)
    }

    async fn save(&self, models: &[Model]) -> Result<(), AssetError> {
        let Some(file) = &self.file else {
            return Ok(());
        };

        let json = serde_json::to_vec_pretty(models)?;
        let staged = file.with_extension("json.tmp");
        fs::write(&staged, json).await?;
        fs::rename(&staged, file).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_newest_first() {
        let catalog = ModelCatalog::in_memory();
        catalog.add("job_a", None).await.unwrap();
        catalog.add("job_b", Some("cat.png".to_string())).await.unwrap();
        catalog.add("job_c", None).await.unwrap();

        let ids: Vec<String> = catalog.list_all().await.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, ["job_c", "job_b", "job_a"]);
    }

    #[tokio::test]
    async fn test_find_and_delete() {
        let catalog = ModelCatalog::in_memory();
        let model = catalog.add("job_a", Some("cat.png".to_string())).await.unwrap();

        assert_eq!(catalog.find("job_a").await, Some(model.clone()));
        assert_eq!(catalog.delete("job_a").await.unwrap(), model);
        assert_eq!(catalog.find("job_a").await, None);
        assert!(matches!(
            catalog.delete("job_a").await,
            Err(AssetError::NotFound(id)) if id == "job_a"
        ));
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");

        let catalog = ModelCatalog::open(&data_dir).await.unwrap();
        catalog.add("job_a", Some("cat.png".to_string())).await.unwrap();
        catalog.add("job_b", None).await.unwrap();
        catalog.delete("job_a").await.unwrap();

        let reopened = ModelCatalog::open(&data_dir).await.unwrap();
        let models = reopened.list_all().await;
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "job_b");
        assert!(data_dir.join("models.json").exists());
        assert!(!data_dir.join("models.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("models.json"), "not json").unwrap();

        assert!(matches!(
            ModelCatalog::open(dir.path()).await,
            Err(AssetError::Catalog(_))
        ));
    }

    #[test]
    fn test_json_shape() {
        let model = Model {
            id: "job_1".to_string(),
            created_at: DateTime::parse_from_rfc3339("2024-05-01T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
            original_image: None,
        };

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["id"], "job_1");
        assert_eq!(json["created_at"], "2024-05-01T10:30:00Z");
        assert!(json.get("original_image").is_none());
        assert_eq!(model.created_label(), "2024-05-01 10:30 UTC");
    }
}
