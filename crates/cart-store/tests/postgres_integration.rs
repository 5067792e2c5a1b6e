//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p cart-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use cart_store::{CartStore, PostgresCartStore};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_cart_snapshots.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and a cleared table
async fn get_test_store() -> PostgresCartStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE cart_snapshots")
        .execute(&pool)
        .await
        .unwrap();

    PostgresCartStore::new(pool)
}

#[tokio::test]
async fn load_missing_key_returns_none() {
    let store = get_test_store().await;

    assert_eq!(store.load("@storefront:cart").await.unwrap(), None);
    assert_eq!(store.updated_at("@storefront:cart").await.unwrap(), None);
}

#[tokio::test]
async fn save_then_load() {
    let store = get_test_store().await;
    let payload = r#"[{"id":1,"amount":1,"title":"Shoe"}]"#;

    store.save("@storefront:cart", payload).await.unwrap();

    assert_eq!(
        store.load("@storefront:cart").await.unwrap().as_deref(),
        Some(payload)
    );
    assert!(store.updated_at("@storefront:cart").await.unwrap().is_some());
}

#[tokio::test]
async fn save_overwrites_previous_payload() {
    let store = get_test_store().await;

    store.save("@storefront:cart", "[]").await.unwrap();
    let first = store.updated_at("@storefront:cart").await.unwrap().unwrap();

    store
        .save("@storefront:cart", r#"[{"id":2,"amount":3}]"#)
        .await
        .unwrap();
    let second = store.updated_at("@storefront:cart").await.unwrap().unwrap();

    assert_eq!(
        store.load("@storefront:cart").await.unwrap().as_deref(),
        Some(r#"[{"id":2,"amount":3}]"#)
    );
    assert!(second >= first);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_snapshots")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn keys_do_not_collide() {
    let store = get_test_store().await;

    store.save("@storefront:cart", "[1]").await.unwrap();
    store.save("other", "[2]").await.unwrap();

    assert_eq!(
        store.load("@storefront:cart").await.unwrap().as_deref(),
        Some("[1]")
    );
    assert_eq!(store.load("other").await.unwrap().as_deref(), Some("[2]"));
}

#[tokio::test]
async fn run_migrations_is_idempotent() {
    let store = get_test_store().await;

    store.run_migrations().await.unwrap();
    store.save("@storefront:cart", "[]").await.unwrap();
    assert!(store.load("@storefront:cart").await.unwrap().is_some());
}
