//! Change notifications for the profile controller

use tracing::info;

use crate::models::{User, UserField};

/// A successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileEvent {
    /// A record was inserted
    Created(User),

    /// One field of a record changed
    Updated {
        /// The record after the change
        user: User,
        /// Which field changed
        field: UserField,
    },

    /// A record was removed
    Deleted {
        /// Id of the removed record
        id: i64,
    },
}

impl ProfileEvent {
    /// Id of the affected record
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        match self {
            Self::Created(user) | Self::Updated { user, .. } => user.id,
            Self::Deleted { id } => *id,
        }
    }
}

/// Receives an event after each successful mutation
///
/// Observers run synchronously on the request task, after the store has
/// committed and before the list is re-fetched. Closures work too:
///
/// ```rust
/// use assette::controller::{ProfileEvent, ProfileObserver};
///
/// fn takes_observer(_: impl ProfileObserver) {}
/// takes_observer(|event: &ProfileEvent| println!("{}", event.user_id()));
/// ```
pub trait ProfileObserver: Send + Sync {
    /// Called once per successful mutation
    fn on_change(&self, event: &ProfileEvent);
}

impl<F> ProfileObserver for F
where
    F: Fn(&ProfileEvent) + Send + Sync,
{
    fn on_change(&self, event: &ProfileEvent) {
        self(event);
    }
}

/// Logs every change at `info`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProfileObserver for TracingObserver {
    fn on_change(&self, event: &ProfileEvent) {
        match event {
            ProfileEvent::Created(user) => info!(user_id = user.id, "User created"),
            ProfileEvent::Updated { user, field } => {
                info!(user_id = user.id, field = %field, "User updated");
            }
            ProfileEvent::Deleted { id } => info!(user_id = id, "User deleted"),
        }
    }
}
