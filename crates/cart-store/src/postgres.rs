use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{CartStore, Result};

/// PostgreSQL-backed cart store.
#[derive(Clone)]
pub struct PostgresCartStore {
    pool: PgPool,
}

impl PostgresCartStore {
    /// Creates a new PostgreSQL cart store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPool::connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Returns when the payload under `key` was last written.
    pub async fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let updated_at =
            sqlx::query_scalar("SELECT updated_at FROM cart_snapshots WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(updated_at)
    }
}

#[async_trait]
impl CartStore for PostgresCartStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let payload = sqlx::query_scalar("SELECT payload FROM cart_snapshots WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(payload)
    }

    async fn save(&self, key: &str, payload: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cart_snapshots (key, payload, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (key)
            DO UPDATE SET payload = EXCLUDED.payload, updated_at = EXCLUDED.updated_at
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
