//! Presentation shell: page and fragment templates
//!
//! Pages extend `layouts/base.html`, which draws the header with the
//! navigation links, the theme colours and the notification region.
//! Fragments are the pieces the profile endpoints send back on their own.

use std::fmt;

use askama::Template;

use crate::assets::{Job, Model};
use crate::config::ThemeSettings;
use crate::controller::CreateForm;
use crate::models::User;

/// `/`: image upload and the current generation job
#[derive(Template)]
#[template(path = "pages/generate.html")]
pub struct GeneratePage<'a> {
    /// Colours for the shell
    pub theme: &'a ThemeSettings,
    /// Document title
    pub title: &'static str,
    /// Highlighted header link
    pub active: &'static str,
    /// Upload form or job progress
    pub panel: GenerationPanel,
}

impl<'a> GeneratePage<'a> {
    /// Page with an idle upload form
    #[must_use]
    pub const fn new(theme: &'a ThemeSettings, enabled: bool) -> Self {
        Self {
            theme,
            title: "Generate",
            active: "generate",
            panel: GenerationPanel::idle(enabled),
        }
    }
}

/// The `#generation` panel
///
/// Polls `/status/{id}` while its job is processing and offers the upload
/// form otherwise.
#[derive(Template)]
#[template(path = "partials/generation.html")]
pub struct GenerationPanel {
    /// Whether uploads are accepted
    pub enabled: bool,
    /// Job being shown, if any
    pub job: Option<Job>,
}

impl GenerationPanel {
    /// Upload form only
    #[must_use]
    pub const fn idle(enabled: bool) -> Self {
        Self { enabled, job: None }
    }

    /// Progress of `job`
    #[must_use]
    pub const fn tracking(job: Job) -> Self {
        Self {
            enabled: true,
            job: Some(job),
        }
    }
}

/// `/models`: generated models, newest first
#[derive(Template)]
#[template(path = "pages/models.html")]
pub struct ModelsPage<'a> {
    /// Colours for the shell
    pub theme: &'a ThemeSettings,
    /// Document title
    pub title: &'static str,
    /// Highlighted header link
    pub active: &'static str,
    /// Catalogue entries
    pub models: Vec<Model>,
}

impl<'a> ModelsPage<'a> {
    /// Page listing `models`
    #[must_use]
    pub const fn new(theme: &'a ThemeSettings, models: Vec<Model>) -> Self {
        Self {
            theme,
            title: "My models",
            active: "models",
            models,
        }
    }
}

/// `/profile`: create form and user list
#[derive(Template)]
#[template(path = "pages/profile.html")]
pub struct ProfilePage<'a> {
    /// Colours for the shell
    pub theme: &'a ThemeSettings,
    /// Document title
    pub title: &'static str,
    /// Highlighted header link
    pub active: &'static str,
    /// Records, newest first
    pub users: Vec<User>,
    /// Create form buffers
    pub form: CreateForm,
}

impl<'a> ProfilePage<'a> {
    /// Page listing `users` with an empty create form
    #[must_use]
    pub fn new(theme: &'a ThemeSettings, users: Vec<User>) -> Self {
        Self {
            theme,
            title: "Profile",
            active: "profile",
            users,
            form: CreateForm::default(),
        }
    }
}

/// The `#user-list` contents
#[derive(Template)]
#[template(path = "partials/user_list.html")]
pub struct UserListFragment {
    /// Records, newest first
    pub users: Vec<User>,
}

/// The `#create-form` contents
#[derive(Template)]
#[template(path = "partials/create_form.html")]
pub struct CreateFormFragment {
    /// Buffers to pre-fill
    pub form: CreateForm,
}

/// Colour of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// Success
    Positive,
    /// Rejection
    Negative,
}

impl fmt::Display for ToastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        })
    }
}

/// A transient notification appended to `#notifications`
#[derive(Template)]
#[template(path = "partials/toast.html")]
pub struct ToastFragment {
    /// Text shown
    pub message: String,
    /// Colour
    pub level: ToastLevel,
}

impl ToastFragment {
    /// A rejection notice
    pub fn negative(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: ToastLevel::Negative,
        }
    }

    /// A success notice
    pub fn positive(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: ToastLevel::Positive,
        }
    }
}
