//! Profile view controller
//!
//! Orchestrates the three user actions on the profile page (submit-create,
//! field-blur, delete-click). Each action runs one store operation, notifies
//! registered observers when it succeeded, then re-fetches the list so the
//! view always renders what the store holds.
//!
//! Validation failures are part of the view, not errors: the returned
//! [`ProfileView`] carries the rejection and the page shows a notification.
//! Only backend failures come back as `Err`.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use assette::controller::{CreateForm, ProfileController, TracingObserver};
//! use assette::store::SqliteUserStore;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let store = Arc::new(SqliteUserStore::in_memory().await?);
//! let controller = ProfileController::new(store);
//! controller.subscribe(TracingObserver);
//!
//! let view = controller
//!     .submit_create(CreateForm::new("Al", "a@b.com"))
//!     .await?;
//! assert!(view.rejection.is_some());
//! assert!(view.users.is_empty());
//! # Ok(())
//! # }
//! ```

mod observer;

pub use observer::{ProfileEvent, ProfileObserver, TracingObserver};

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::models::{NewUser, User, UserField};
use crate::store::{StoreError, UserStore};
use crate::validation::ValidationError;

const USER_CREATED: Option<&str> = Some("User created");
const CHANGES_SAVED: Option<&str> = Some("Changes saved");
const USER_DELETED: Option<&str> = Some("User deleted");

/// The two input buffers of the create form
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateForm {
    /// Name buffer
    pub name: String,
    /// E-mail buffer
    pub email: String,
}

impl CreateForm {
    /// Fill both buffers
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl From<CreateForm> for NewUser {
    fn from(form: CreateForm) -> Self {
        Self::new(form.name, form.email)
    }
}

/// What the profile page shows after an action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileView {
    /// Current records, newest first
    pub users: Vec<User>,

    /// Create form buffers, cleared after a successful create
    pub form: CreateForm,

    /// Set when the action was rejected by validation
    pub rejection: Option<ValidationError>,

    /// Confirmation for a change that went through
    pub notice: Option<&'static str>,
}

impl ProfileView {
    /// Whether the action went through
    #[must_use]
    pub const fn accepted(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Coordinates user actions, the store and observers
///
/// Cheap to clone; clones share the store handle and observer registry.
#[derive(Clone)]
pub struct ProfileController {
    store: Arc<dyn UserStore>,
    observers: Arc<RwLock<Vec<Arc<dyn ProfileObserver>>>>,
}

impl std::fmt::Debug for ProfileController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileController")
            .field("observers", &self.observers.read().len())
            .finish_non_exhaustive()
    }
}

impl ProfileController {
    /// Create a controller over an explicitly owned store handle
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register an observer for successful mutations
    pub fn subscribe(&self, observer: impl ProfileObserver + 'static) {
        self.observers.write().push(Arc::new(observer));
    }

    /// The store this controller mutates
    #[must_use]
    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Current records, newest first
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the store is unreachable.
    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.store.list_all().await
    }

    /// Look up one record
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the store is unreachable.
    pub async fn find(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.store.find(id).await
    }

    /// Validate and insert a record, notifying observers on success
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when a rule fails, in which case
    /// nothing was stored and nobody was notified.
    #[instrument(skip(self, new_user), fields(name = %new_user.name))]
    pub async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = self.store.create(new_user).await?;
        self.notify(&ProfileEvent::Created(user.clone()));
        Ok(user)
    }

    /// Change one field of a record, notifying observers on success
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] or [`StoreError::NotFound`] without
    /// changing the store.
    #[instrument(skip(self, field, value), fields(field = %field))]
    pub async fn update(
        &self,
        id: i64,
        field: UserField,
        value: String,
    ) -> Result<User, StoreError> {
        let user = self.store.update(id, field, value).await?;
        self.notify(&ProfileEvent::Updated {
            user: user.clone(),
            field,
        });
        Ok(user)
    }

    /// Remove a record, notifying observers on success
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the record is already gone.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.store.delete(id).await?;
        self.notify(&ProfileEvent::Deleted { id });
        Ok(())
    }

    /// submit-create: insert from the form buffers and re-render
    ///
    /// A rejected create keeps the buffers so the user can correct them.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on backend failure.
    pub async fn submit_create(&self, form: CreateForm) -> Result<ProfileView, StoreError> {
        match self.create(NewUser::from(form.clone())).await {
            Ok(_) => self.render(CreateForm::default(), Ok(USER_CREATED)).await,
            Err(StoreError::Validation(rejection)) => self.render(form, Err(rejection)).await,
            Err(err) => Err(err),
        }
    }

    /// field-blur: persist one edited field and re-render
    ///
    /// A rejected edit re-renders from the store, reverting the input.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on backend failure.
    pub async fn field_blur(
        &self,
        id: i64,
        field: UserField,
        value: String,
    ) -> Result<ProfileView, StoreError> {
        match self.update(id, field, value).await {
            Ok(_) => self.render(CreateForm::default(), Ok(CHANGES_SAVED)).await,
            Err(StoreError::Validation(rejection)) => {
                self.render(CreateForm::default(), Err(rejection)).await
            }
            Err(StoreError::NotFound(id)) => {
                warn!(user_id = id, "Edited user no longer exists");
                self.render(CreateForm::default(), Ok(None)).await
            }
            Err(err) => Err(err),
        }
    }

    /// delete-click: remove the record and re-render
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on backend failure.
    pub async fn delete_click(&self, id: i64) -> Result<ProfileView, StoreError> {
        let notice = match self.delete(id).await {
            Ok(()) => USER_DELETED,
            Err(StoreError::NotFound(id)) => {
                warn!(user_id = id, "Deleted user no longer exists");
                None
            }
            Err(err) => return Err(err),
        };
        self.render(CreateForm::default(), Ok(notice)).await
    }

    async fn render(
        &self,
        form: CreateForm,
        outcome: Result<Option<&'static str>, ValidationError>,
    ) -> Result<ProfileView, StoreError> {
        let (notice, rejection) = match outcome {
            Ok(notice) => (notice, None),
            Err(rejection) => (None, Some(rejection)),
        };
        Ok(ProfileView {
            users: self.list().await?,
            form,
            rejection,
            notice,
        })
    }

    fn notify(&self, event: &ProfileEvent) {
        // snapshot so observers may subscribe without deadlocking
        let observers = self.observers.read().clone();
        for observer in observers {
            observer.on_change(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MockUserStore, SqliteUserStore};
    use crate::testing::RecordingObserver;
    use crate::validation::NAME_TOO_SHORT;

    async fn controller() -> (ProfileController, RecordingObserver) {
        let store = Arc::new(SqliteUserStore::in_memory().await.unwrap());
        let controller = ProfileController::new(store);
        let recorder = RecordingObserver::default();
        controller.subscribe(recorder.clone());
        (controller, recorder)
    }

    #[tokio::test]
    async fn test_rejected_create_keeps_buffers_and_notifies_nobody() {
        let (controller, recorder) = controller().await;

        let view = controller
            .submit_create(CreateForm::new("Al", "a@b.com"))
            .await
            .unwrap();

        assert!(!view.accepted());
        assert_eq!(view.rejection.unwrap().message(), NAME_TOO_SHORT);
        assert_eq!(view.form, CreateForm::new("Al", "a@b.com"));
        assert!(view.users.is_empty());
        assert!(recorder.events().is_empty());
    }

    #[tokio::test]
    async fn test_create_clears_buffers_and_lists_record() {
        let (controller, recorder) = controller().await;

        let view = controller
            .submit_create(CreateForm::new("Ann", "a@b.com"))
            .await
            .unwrap();

        assert!(view.accepted());
        assert_eq!(view.notice, Some("User created"));
        assert_eq!(view.form, CreateForm::default());
        assert_eq!(view.users.len(), 1);
        assert_eq!(view.users[0].name, "Ann");
        assert_eq!(recorder.events(), vec![ProfileEvent::Created(view.users[0].clone())]);
    }

    #[tokio::test]
    async fn test_rejected_blur_reverts_to_stored_value() {
        let (controller, recorder) = controller().await;
        let ann = controller.create(NewUser::new("Ann", "a@b.com")).await.unwrap();

        let view = controller
            .field_blur(ann.id, UserField::Name, "Jo".to_string())
            .await
            .unwrap();

        assert!(!view.accepted());
        assert_eq!(view.notice, None);
        assert_eq!(view.users[0].name, "Ann");
        assert_eq!(recorder.events().len(), 1);
    }

    #[tokio::test]
    async fn test_blur_updates_and_notifies() {
        let (controller, recorder) = controller().await;
        let ann = controller.create(NewUser::new("Ann", "a@b.com")).await.unwrap();

        let view = controller
            .field_blur(ann.id, UserField::Email, "ann@b.com".to_string())
            .await
            .unwrap();

        assert!(view.accepted());
        assert_eq!(view.notice, Some("Changes saved"));
        assert_eq!(view.users[0].email, "ann@b.com");
        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[1],
            ProfileEvent::Updated { field: UserField::Email, user } if user.id == ann.id
        ));
    }

    #[tokio::test]
    async fn test_delete_click_removes_and_notifies() {
        let (controller, recorder) = controller().await;
        let ann = controller.create(NewUser::new("Ann", "")).await.unwrap();
        let bob = controller.create(NewUser::new("Bob", "")).await.unwrap();

        let view = controller.delete_click(ann.id).await.unwrap();

        assert_eq!(view.users, vec![bob]);
        assert_eq!(view.notice, Some("User deleted"));
        assert_eq!(
            recorder.events().last(),
            Some(&ProfileEvent::Deleted { id: ann.id })
        );
    }

    #[tokio::test]
    async fn test_stale_ids_rerender_without_events() {
        let (controller, recorder) = controller().await;

        let view = controller.delete_click(99).await.unwrap();
        assert!(view.accepted());
        assert_eq!(view.notice, None);

        let view = controller
            .field_blur(99, UserField::Name, "Valid".to_string())
            .await
            .unwrap();
        assert!(view.accepted());
        assert_eq!(view.notice, None);
        assert!(recorder.events().is_empty());
    }

    #[tokio::test]
    async fn test_closure_observer() {
        let (controller, _) = controller().await;
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = seen.clone();
        controller.subscribe(move |event: &ProfileEvent| sink.lock().push(event.user_id()));

        let ann = controller.create(NewUser::new("Ann", "")).await.unwrap();
        controller.delete(ann.id).await.unwrap();

        assert_eq!(*seen.lock(), vec![ann.id, ann.id]);
    }

    #[tokio::test]
    async fn test_backend_failure_is_an_error() {
        let mut store = MockUserStore::new();
        store
            .expect_create()
            .returning(|_| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));
        store.expect_list_all().never();

        let controller = ProfileController::new(Arc::new(store));
        let recorder = RecordingObserver::default();
        controller.subscribe(recorder.clone());

        let result = controller.submit_create(CreateForm::new("Ann", "")).await;

        assert!(matches!(result, Err(StoreError::Database(_))));
        assert!(recorder.events().is_empty());
    }

    #[tokio::test]
    async fn test_list_failure_after_successful_mutation() {
        let mut store = MockUserStore::new();
        store.expect_delete().times(1).returning(|_| Ok(()));
        store
            .expect_list_all()
            .returning(|| Err(StoreError::Database(sqlx::Error::PoolClosed)));

        let controller = ProfileController::new(Arc::new(store));
        let recorder = RecordingObserver::default();
        controller.subscribe(recorder.clone());

        assert!(controller.delete_click(5).await.is_err());
        assert_eq!(recorder.events(), vec![ProfileEvent::Deleted { id: 5 }]);
    }
}
