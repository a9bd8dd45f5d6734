//! Upload, job status, download and the model API
//!
//! HTMX requests get the `#generation` panel back, with a toast out of band;
//! a refused upload keeps a `200` so the form is swapped back in. Plain
//! requests get JSON, and refusals their error status.

use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use http::{
    header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    StatusCode,
};
use serde_json::json;

use crate::assets::{AssetError, Model};
use crate::error::AssetteError;
use crate::htmx::{HxRequest, HxSwapOob, SwapStrategy};
use crate::state::AppState;
use crate::template::HxTemplate;
use crate::views::{GenerationPanel, ToastFragment};

/// Media type of binary glTF
pub const GLB_CONTENT_TYPE: &str = "model/gltf-binary";

/// `POST /upload`: multipart `image`
///
/// # Errors
///
/// Plain requests get the refusal status (`400`, `413`, `503`); any request
/// gets a `500` on template failure.
pub async fn upload(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    mut multipart: Multipart,
) -> Result<Response, AssetteError> {
    let submitted = match read_image(&mut multipart).await {
        Ok((file_name, image)) => state
            .assets()
            .submit(file_name.as_deref(), image)
            .map_err(AssetteError::from),
        Err(err) => Err(err),
    };

    if !is_htmx {
        let job = submitted?;
        return Ok(Json(json!({ "job_id": job.id, "status": job.status })).into_response());
    }

    let enabled = state.assets().generation_enabled();
    let (panel, toast) = match submitted {
        Ok(job) => (
            GenerationPanel::tracking(job),
            ToastFragment::positive("Generation started"),
        ),
        Err(err) if err.is_rejection() => (
            GenerationPanel::idle(enabled),
            ToastFragment::negative(err.to_string()),
        ),
        Err(err) => return Err(err),
    };

    let mut body = HxSwapOob::new(panel.render_fragment()?);
    body.push("notifications", SwapStrategy::BeforeEnd, toast.render_fragment()?);
    Ok(body.into_response())
}

/// `GET /status/{id}`
///
/// # Errors
///
/// Returns a `404` for an unknown job.
pub async fn status(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    Path(id): Path<String>,
) -> Result<Response, AssetteError> {
    let job = state
        .assets()
        .job(&id)
        .ok_or(AssetError::NotFound(id))?;

    if is_htmx {
        return Ok(GenerationPanel::tracking(job).render_html());
    }
    Ok(Json(job).into_response())
}

/// `GET /download/{id}`: the `.glb` file
///
/// # Errors
///
/// Returns a `404` for an unknown model and a `400` while it is still
/// being generated.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AssetteError> {
    let model = state.assets().download(&id).await?;
    Ok((
        [
            (CONTENT_TYPE, GLB_CONTENT_TYPE.to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{id}.glb\"")),
        ],
        model,
    )
        .into_response())
}

/// `GET /api/models`: newest first
pub async fn list_models(State(state): State<AppState>) -> Json<Vec<Model>> {
    Json(state.assets().models().await)
}

/// `DELETE /api/models/{id}`
///
/// # Errors
///
/// Returns a `404` for an unknown model.
pub async fn delete_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AssetteError> {
    state.assets().delete_model(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn read_image(multipart: &mut Multipart) -> Result<(Option<String>, Bytes), AssetteError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("image") {
            let file_name = field.file_name().map(str::to_owned);
            let image = field.bytes().await?;
            return Ok((file_name, image));
        }
    }
    Err(AssetError::MissingImage.into())
}
