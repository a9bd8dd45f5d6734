//! SQLite-backed [`UserStore`]

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use super::{StoreError, UserStore};
use crate::config::DatabaseSettings;
use crate::models::{NewUser, User, UserField};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS "user" (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL
)
"#;

/// User store over an `sqlx` SQLite pool
///
/// Cloning shares the pool. The pool is opened once at startup with
/// [`open`](Self::open) and released once at shutdown with
/// [`close`](Self::close).
#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// Connect using the configured settings and create the schema if absent
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed, the database cannot be
    /// opened, or the schema cannot be created.
    pub async fn open(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&settings.url)?
            .create_if_missing(settings.create_if_missing);

        // every connection to `:memory:` is its own database
        let max_connections = if settings.url.contains(":memory:") {
            1
        } else {
            settings.max_connections.max(1)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        info!(url = %settings.url, max_connections, "User store opened");
        Ok(store)
    }

    /// A private in-memory database, mostly for tests
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot be initialised.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::open(&DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            create_if_missing: true,
        })
        .await
    }

    /// Release the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
        info!("User store closed");
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        new_user.check()?;

        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO "user" (name, email) VALUES (?, ?) RETURNING id, name, email"#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .fetch_one(&self.pool)
        .await?;

        debug!(user_id = user.id, "User inserted");
        Ok(user)
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let users =
            sqlx::query_as::<_, User>(r#"SELECT id, name, email FROM "user" ORDER BY id DESC"#)
                .fetch_all(&self.pool)
                .await?;
        Ok(users)
    }

    async fn find(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(r#"SELECT id, name, email FROM "user" WHERE id = ?"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update(&self, id: i64, field: UserField, value: String) -> Result<User, StoreError> {
        let current = self.find(id).await?.ok_or(StoreError::NotFound(id))?;

        // validate the whole record as it would look after the change
        current.with_field(field, value.as_str()).check()?;

        // one autocommit statement takes the write lock directly and waits
        // out the busy timeout instead of failing a read-to-write upgrade
        let sql = match field {
            UserField::Name => r#"UPDATE "user" SET name = ? WHERE id = ? RETURNING id, name, email"#,
            UserField::Email => {
                r#"UPDATE "user" SET email = ? WHERE id = ? RETURNING id, name, email"#
            }
        };
        let user = sqlx::query_as::<_, User>(sql)
            .bind(&value)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))?;

        debug!(user_id = id, field = %field, "User updated");
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query(r#"DELETE FROM "user" WHERE id = ?"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        debug!(user_id = id, "User deleted");
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
