//! Application error type and its HTTP mapping
//!
//! Handlers return `Result<_, AssetteError>`. Validation failures become a
//! `422` with per-field messages, missing records a `404`, and anything from
//! the backend a logged `500`. Refused uploads keep the status their
//! [`AssetError`] names.

use axum::{
    extract::multipart::MultipartError,
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::assets::AssetError;
use crate::store::StoreError;
use crate::validation::ValidationError;

/// Application error
#[derive(Debug, Error)]
pub enum AssetteError {
    /// Input rejected by a validation rule
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No user with this id
    #[error("User {0} not found")]
    NotFound(i64),

    /// Storage failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Template rendering failure
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Upload, job or model failure
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Malformed or oversized multipart body
    #[error("Upload could not be read: {0}")]
    Upload(#[from] MultipartError),
}

impl From<StoreError> for AssetteError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => Self::Validation(e),
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Database(e) => Self::Database(e),
        }
    }
}

impl AssetteError {
    /// Status code this error maps to
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Asset(e) => e.status_code(),
            Self::Upload(e) => e.status(),
        }
    }

    /// Whether the request was refused rather than failed
    ///
    /// Refusals are the caller's to fix and can be shown as a notification;
    /// everything else is a logged `500`.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        !self.status_code().is_server_error()
            || matches!(self, Self::Asset(AssetError::GenerationDisabled))
    }
}

impl IntoResponse for AssetteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::Validation(e) => json!({
                "error": e.message(),
                "fields": e.fields,
            }),
            _ if self.is_rejection() => json!({ "error": self.to_string() }),
            _ => {
                tracing::error!(error = %self, "Request failed");
                json!({ "error": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}
