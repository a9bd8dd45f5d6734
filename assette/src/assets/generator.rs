//! Image-to-model generation
//!
//! [`ModelGenerator`] turns an uploaded image into a binary glTF model.
//! [`StabilityClient`] posts the image as multipart `image` to the configured
//! endpoint with a bearer token and expects the model bytes straight back.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::GenerationSettings;

/// First four bytes of every binary glTF file
pub const GLTF_MAGIC: &[u8; 4] = b"glTF";

/// Generation failures
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request could not be sent or the response not read
    #[error("Generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Generation API returned {status}: {body}")]
    Api {
        /// Response status
        status: StatusCode,
        /// Response text
        body: String,
    },

    /// The API answered with something other than binary glTF
    #[error("Expected binary glTF, got {0} bytes of something else")]
    UnexpectedFormat(usize),
}

/// Turns images into models
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelGenerator: Send + Sync {
    /// Generate a binary glTF model from image bytes
    async fn generate(&self, image: Bytes) -> Result<Bytes, GenerationError>;
}

/// Client for the hosted generation API
#[derive(Clone)]
pub struct StabilityClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl fmt::Debug for StabilityClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StabilityClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl StabilityClient {
    /// Client for `endpoint` authenticating with `api_key`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// Client from configuration, `None` while no API key is set
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_settings(settings: &GenerationSettings) -> Result<Option<Self>, GenerationError> {
        match settings.api_key.as_deref() {
            Some(key) if settings.enabled() => Self::new(
                settings.endpoint.clone(),
                key,
                Duration::from_secs(settings.request_timeout_secs),
            )
            .map(Some),
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl ModelGenerator for StabilityClient {
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    async fn generate(&self, image: Bytes) -> Result<Bytes, GenerationError> {
        let form = Form::new().part("image", Part::bytes(image.to_vec()).file_name("image.png"));

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let model = response.bytes().await?;
        if !model.starts_with(GLTF_MAGIC) {
            return Err(GenerationError::UnexpectedFormat(model.len()));
        }

        info!(model_bytes = model.len(), "Model generated");
        Ok(model)
    }
}
