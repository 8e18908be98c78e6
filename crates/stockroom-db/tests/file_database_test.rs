//! File-backed database tests: directory creation, persistence across
//! reconnects, and concurrent writers racing on the same name.

use std::sync::Arc;

use futures::future::join_all;
use stockroom_db::test_fixtures::CreateItemBuilder;
use stockroom_db::{
    Category, CreateOutcome, Database, Error, ItemRepository, ListItemsRequest, PoolConfig,
};
use tempfile::TempDir;

async fn open(dir: &TempDir, config: PoolConfig) -> Database {
    let url = format!(
        "sqlite://{}",
        dir.path().join("nested").join("warehouse.sqlite").display()
    );
    let db = Database::connect_with_config(&url, config)
        .await
        .expect("Failed to open file database");
    db.migrate().await.expect("Failed to run migrations");
    db
}

#[tokio::test]
async fn test_creates_parent_directory_and_reports_location() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir, PoolConfig::default()).await;

    assert!(dir.path().join("nested").join("warehouse.sqlite").exists());
    assert_eq!(db.location(), "warehouse.sqlite");
}

#[tokio::test]
async fn test_data_survives_reconnect_and_migrations_are_idempotent() {
    let dir = TempDir::new().unwrap();

    let id = {
        let db = open(&dir, PoolConfig::default()).await;
        let item = db
            .items
            .create_or_merge(CreateItemBuilder::new(Category::Raw, "Сталь").amount(5.0).build())
            .await
            .unwrap()
            .into_item();
        db.pool.close().await;
        item.id
    };

    let db = open(&dir, PoolConfig::default()).await;
    let item = db.items.fetch(id).await.unwrap();
    assert_eq!(item.name, "Сталь");
    assert_eq!(item.weight, 5.0);
}

#[tokio::test]
async fn test_storage_rejects_category_change() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir, PoolConfig::default()).await;
    let item = db
        .items
        .create_or_merge(CreateItemBuilder::new(Category::Equipment, "Дрель").amount(1.0).build())
        .await
        .unwrap()
        .into_item();

    let result = sqlx::query("UPDATE item SET category = 'supply' WHERE id = ?")
        .bind(item.id)
        .execute(&db.pool)
        .await;
    assert!(result.is_err(), "category must be immutable at the storage layer");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_yield_one_identity() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(open(&dir, PoolConfig::default().max_connections(8)).await);

    let tasks = (0..8).map(|i| {
        let db = db.clone();
        tokio::spawn(async move {
            let name = if i % 2 == 0 { "Кабель" } else { "КАБЕЛЬ" };
            db.items
                .create_or_merge(CreateItemBuilder::new(Category::Supply, name).amount(1.0).build())
                .await
        })
    });
    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.expect("task panicked"))
        .collect();

    let created = results
        .iter()
        .filter(|r| matches!(r, Ok(CreateOutcome::Created(_))))
        .count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(Error::DuplicateExists(_))))
        .count();
    assert_eq!(created, 1, "exactly one create wins: {:?}", results);
    assert_eq!(duplicates, 7);

    let all = db
        .items
        .list(ListItemsRequest::new(Category::Supply))
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_forced_merges_lose_no_amount() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(open(&dir, PoolConfig::default().max_connections(8)).await);

    let tasks = (0..10).map(|_| {
        let db = db.clone();
        tokio::spawn(async move {
            db.items
                .create_or_merge(
                    CreateItemBuilder::new(Category::Raw, "Сталь")
                        .amount(2.0)
                        .force()
                        .build(),
                )
                .await
        })
    });
    for result in join_all(tasks).await {
        result.expect("task panicked").expect("merge failed");
    }

    let all = db
        .items
        .list(ListItemsRequest::new(Category::Raw))
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].weight, 20.0);
}
