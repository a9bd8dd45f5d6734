//! Image-to-model generation and the model catalogue
//!
//! An upload becomes a [`Job`]. A background task sends the image to the
//! [`ModelGenerator`], writes the returned `.glb` through [`LocalStorage`],
//! records it in the [`ModelCatalog`] and marks the job completed. Without
//! an API key there is no generator: uploads are refused, while listing and
//! downloading existing models keep working.
//!
//! # Example
//!
//! ```rust
//! use assette::assets::{AssetService, LocalStorage, ModelCatalog};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let assets = AssetService::new(
//!     ModelCatalog::in_memory(),
//!     LocalStorage::new("uploads"),
//!     None,
//!     10 * 1024 * 1024,
//! );
//! assert!(!assets.generation_enabled());
//! assert!(assets.models().await.is_empty());
//! # }
//! ```

mod catalog;
mod generator;
mod jobs;
mod storage;

pub use catalog::{Model, ModelCatalog};
pub use generator::{GenerationError, ModelGenerator, StabilityClient, GLTF_MAGIC};
pub use jobs::{Job, JobRegistry, JobStatus};
pub use storage::LocalStorage;

#[cfg(test)]
pub use generator::MockModelGenerator;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::GenerationSettings;

/// Extensions accepted for upload, compared case-insensitively
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Asset errors
#[derive(Debug, Error)]
pub enum AssetError {
    /// No API key is configured
    #[error("Model generation is not configured")]
    GenerationDisabled,

    /// The upload had no `image` part or it was empty
    #[error("No image in upload")]
    MissingImage,

    /// The file name does not end in an accepted extension
    #[error("Only JPG and PNG files are allowed")]
    UnsupportedImage,

    /// The image exceeds the configured limit
    #[error("Image is {actual} bytes, the limit is {max}")]
    TooLarge {
        /// Received size
        actual: usize,
        /// Configured limit
        max: usize,
    },

    /// No model or job with this id
    #[error("Model {0} not found")]
    NotFound(String),

    /// The job exists but has not produced a model
    #[error("Model {0} is not ready")]
    NotReady(String),

    /// A storage name that would escape the upload directory
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    /// The generator failed
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Filesystem failure
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalogue file could not be read or written
    #[error("Catalogue error: {0}")]
    Catalog(#[from] serde_json::Error),
}

impl AssetError {
    /// Status code this error maps to
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::GenerationDisabled => StatusCode::SERVICE_UNAVAILABLE,
            Self::MissingImage | Self::UnsupportedImage | Self::NotReady(_) | Self::InvalidName(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Generation(_) | Self::Io(_) | Self::Catalog(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Uploads, jobs and the model catalogue
///
/// Cheap to clone; clones share the catalogue and job table.
#[derive(Clone)]
pub struct AssetService {
    catalog: Arc<ModelCatalog>,
    storage: LocalStorage,
    generator: Option<Arc<dyn ModelGenerator>>,
    jobs: JobRegistry,
    max_upload_bytes: usize,
}

impl fmt::Debug for AssetService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetService")
            .field("storage", &self.storage)
            .field("generation_enabled", &self.generation_enabled())
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish_non_exhaustive()
    }
}

impl AssetService {
    /// Assemble a service from its parts
    #[must_use]
    pub fn new(
        catalog: ModelCatalog,
        storage: LocalStorage,
        generator: Option<Arc<dyn ModelGenerator>>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            storage,
            generator,
            jobs: JobRegistry::default(),
            max_upload_bytes,
        }
    }

    /// Open the catalogue and build the generation client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogue cannot be opened or the HTTP client
    /// cannot be built.
    pub async fn open(settings: &GenerationSettings) -> Result<Self, AssetError> {
        let catalog = ModelCatalog::open(&settings.data_dir).await?;

        let generator = StabilityClient::from_settings(settings)?
            .map(|client| Arc::new(client) as Arc<dyn ModelGenerator>);
        if generator.is_none() {
            warn!("No generation API key configured, uploads are disabled");
        }

        Ok(Self::new(
            catalog,
            LocalStorage::new(&settings.upload_dir),
            generator,
            settings.max_upload_bytes,
        ))
    }

    /// Whether uploads are accepted
    #[must_use]
    pub const fn generation_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Largest accepted image in bytes
    #[must_use]
    pub const fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Check an upload and start generating in the background
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::GenerationDisabled`] without an API key, or the
    /// reason the image was refused. Nothing is started in either case.
    pub fn submit(&self, file_name: Option<&str>, image: Bytes) -> Result<Job, AssetError> {
        let Some(generator) = self.generator.clone() else {
            return Err(AssetError::GenerationDisabled);
        };
        if image.is_empty() {
            return Err(AssetError::MissingImage);
        }

        let file_name = file_name.unwrap_or_default();
        if !is_supported_image(file_name) {
            return Err(AssetError::UnsupportedImage);
        }
        if image.len() > self.max_upload_bytes {
            return Err(AssetError::TooLarge {
                actual: image.len(),
                max: self.max_upload_bytes,
            });
        }

        let job = self.jobs.start(jobs::new_job_id());
        info!(job_id = %job.id, image_bytes = image.len(), "Generation job started");

        tokio::spawn(self.clone().run(
            generator,
            job.id.clone(),
            file_name.to_string(),
            image,
        ));
        Ok(job)
    }

    /// Snapshot of a job
    #[must_use]
    pub fn job(&self, id: &str) -> Option<Job> {
        self.jobs.get(id)
    }

    /// Every catalogued model, newest first
    pub async fn models(&self) -> Vec<Model> {
        self.catalog.list_all().await
    }

    /// The `.glb` bytes of a finished model
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::NotReady`] while its job is still running and
    /// [`AssetError::NotFound`] for an unknown id.
    pub async fn download(&self, id: &str) -> Result<Bytes, AssetError> {
        if self.catalog.find(id).await.is_none() {
            match self.jobs.get(id) {
                None => return Err(AssetError::NotFound(id.to_string())),
                Some(job) if !job.is_completed() => {
                    return Err(AssetError::NotReady(id.to_string()));
                }
                // completed, but its metadata could not be recorded
                Some(_) => {}
            }
        }
        self.storage.read(&model_file(id)).await
    }

    /// Remove a model from the catalogue and delete its file
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::NotFound`] for an unknown id.
    pub async fn delete_model(&self, id: &str) -> Result<(), AssetError> {
        self.catalog.delete(id).await?;
        self.storage.delete(&model_file(id)).await?;
        info!(model_id = %id, "Model deleted");
        Ok(())
    }

    async fn run(
        self,
        generator: Arc<dyn ModelGenerator>,
        id: String,
        original_image: String,
        image: Bytes,
    ) {
        let stored = async {
            let model = generator.generate(image).await?;
            self.storage.save(&model_file(&id), &model).await?;
            Ok::<_, AssetError>(())
        }
        .await;

        if let Err(err) = stored {
            warn!(job_id = %id, error = %err, "Generation job failed");
            self.jobs.fail(&id, err.to_string());
            return;
        }

        if let Err(err) = self.catalog.add(id.clone(), Some(original_image)).await {
            warn!(job_id = %id, error = %err, "Failed to record model metadata");
        }

        self.jobs.complete(&id, format!("/download/{id}"));
        info!(job_id = %id, "Generation job completed");
    }
}

fn model_file(id: &str) -> String {
    format!("{id}.glb")
}

fn is_supported_image(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}
