//! HTMX endpoints behind the profile page
//!
//! Each endpoint answers with the refreshed `#user-list` contents and a
//! toast appended to `#notifications` out of band. A rejection keeps a `200`
//! so htmx still swaps. A successful create also resets `#create-form`, and
//! every success fires the `users-changed` client event.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::controller::{CreateForm, ProfileView};
use crate::error::AssetteError;
use crate::htmx::{HxResponseTrigger, HxSwapOob, SwapStrategy, USERS_CHANGED_EVENT};
use crate::models::UserField;
use crate::state::AppState;
use crate::template::HxTemplate;
use crate::views::{CreateFormFragment, ToastFragment, UserListFragment};

/// Body of a field edit
#[derive(Debug, Deserialize)]
pub struct FieldEdit {
    /// New value for the field
    #[serde(default)]
    pub value: String,
}

/// `POST /profile/users`: submit-create
///
/// # Errors
///
/// Returns a `500` on store or template failure.
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<CreateForm>,
) -> Result<Response, AssetteError> {
    let view = state.controller().submit_create(form).await?;
    respond(view, true)
}

/// `PATCH /profile/users/{id}/{field}`: field-blur
///
/// # Errors
///
/// Returns a `500` on store or template failure.
pub async fn update_field(
    State(state): State<AppState>,
    Path((id, field)): Path<(i64, UserField)>,
    Form(edit): Form<FieldEdit>,
) -> Result<Response, AssetteError> {
    let view = state.controller().field_blur(id, field, edit.value).await?;
    respond(view, false)
}

/// `DELETE /profile/users/{id}`: delete-click
///
/// # Errors
///
/// Returns a `500` on store or template failure.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AssetteError> {
    let view = state.controller().delete_click(id).await?;
    respond(view, false)
}

fn respond(view: ProfileView, reset_form: bool) -> Result<Response, AssetteError> {
    let list = UserListFragment { users: view.users }.render_fragment()?;
    let mut body = HxSwapOob::new(list);

    if let Some(rejection) = view.rejection {
        let toast = ToastFragment::negative(rejection.message()).render_fragment()?;
        body.push("notifications", SwapStrategy::BeforeEnd, toast);
        return Ok(body.into_response());
    }

    if let Some(notice) = view.notice {
        let toast = ToastFragment::positive(notice).render_fragment()?;
        body.push("notifications", SwapStrategy::BeforeEnd, toast);
    }

    if reset_form {
        let form = CreateFormFragment { form: view.form }.render_fragment()?;
        body.push("create-form", SwapStrategy::InnerHTML, form);
    }

    Ok((HxResponseTrigger::normal([USERS_CHANGED_EVENT]), body).into_response())
}
