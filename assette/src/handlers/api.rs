//! JSON user API
//!
//! Runs through the same controller as the profile page, so validation,
//! observers and ordering are identical. Errors map through
//! [`AssetteError`]: `422` for validation, `404` for a missing id.

use axum::{
    extract::{Path, State},
    Json,
};
use http::StatusCode;
use serde::Deserialize;

use crate::error::AssetteError;
use crate::models::{NewUser, User, UserField};
use crate::state::AppState;

/// Body of `PATCH /api/users/{id}`
#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    /// Column to change
    pub field: UserField,
    /// New value
    pub value: String,
}

/// `GET /api/users`
///
/// # Errors
///
/// Returns a `500` if the store cannot be read.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, AssetteError> {
    Ok(Json(state.controller().list().await?))
}

/// `POST /api/users`
///
/// # Errors
///
/// Returns a `422` when the record fails validation.
pub async fn create(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), AssetteError> {
    let user = state.controller().create(new_user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /api/users/{id}`
///
/// # Errors
///
/// Returns a `404` when no such record exists.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, AssetteError> {
    state
        .controller()
        .find(id)
        .await?
        .map(Json)
        .ok_or(AssetteError::NotFound(id))
}

/// `PATCH /api/users/{id}`
///
/// # Errors
///
/// Returns a `422` when the change fails validation, `404` for a missing id.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(change): Json<FieldUpdate>,
) -> Result<Json<User>, AssetteError> {
    let user = state
        .controller()
        .update(id, change.field, change.value)
        .await?;
    Ok(Json(user))
}

/// `DELETE /api/users/{id}`
///
/// # Errors
///
/// Returns a `404` for a missing id.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AssetteError> {
    state.controller().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
