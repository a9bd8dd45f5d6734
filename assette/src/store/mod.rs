//! Record store for user rows
//!
//! [`UserStore`] is the seam between the profile controller and persistence.
//! The one production implementation is [`SqliteUserStore`]; tests swap in
//! the mockall-generated `MockUserStore` where a failing backend is needed.
//!
//! Every mutation validates first and either fully succeeds or changes
//! nothing.

mod sqlite;

pub use sqlite::SqliteUserStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewUser, User, UserField};
use crate::validation::ValidationError;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record was rejected by a validation rule
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No row with this id
    #[error("User {0} not found")]
    NotFound(i64),

    /// Storage backend failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence contract for [`User`] records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Validate and insert a new record, returning it with its assigned id
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// All records, most recently created first
    async fn list_all(&self) -> Result<Vec<User>, StoreError>;

    /// Look up one record
    async fn find(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Validate and persist a single-field change
    async fn update(&self, id: i64, field: UserField, value: String)
        -> Result<User, StoreError>;

    /// Remove a record
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Round-trip to the backend, used by the health check
    async fn ping(&self) -> Result<(), StoreError>;
}
