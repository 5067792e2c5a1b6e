use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::{CartStore, Result};

/// SQLite-backed cart store for single-client local persistence.
#[derive(Debug, Clone)]
pub struct SqliteCartStore {
    pool: SqlitePool,
}

impl SqliteCartStore {
    /// Opens (creating if missing) the database at `url` and ensures the table exists.
    ///
    /// `sqlite::memory:` gives a private in-memory database that lives only
    /// as long as its connection. The pool then holds exactly one connection
    /// and never recycles it, so every query sees the same data.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(4)
        };
        let pool = pool_options.connect_with(options).await?;

        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cart_snapshots (
                key         TEXT PRIMARY KEY,
                payload     TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Returns when the payload under `key` was last written.
    pub async fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let updated_at = sqlx::query_scalar("SELECT updated_at FROM cart_snapshots WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated_at)
    }
}

#[async_trait]
impl CartStore for SqliteCartStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let payload = sqlx::query_scalar("SELECT payload FROM cart_snapshots WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(payload)
    }

    async fn save(&self, key: &str, payload: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cart_snapshots (key, payload, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (key)
            DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!(key, bytes = payload.len(), "cart payload saved");
        Ok(())
    }
}
