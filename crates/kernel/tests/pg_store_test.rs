#![allow(clippy::unwrap_used, clippy::expect_used)]
//! PostgreSQL content store tests.
//!
//! These need a reachable database:
//!
//! ```sh
//! DATABASE_URL=postgres://... cargo test -p dodo-kernel --test pg_store_test -- --ignored
//! ```
//!
//! Tests share the database, so each one uses unique titles and deletes the
//! pages it creates.

use std::sync::Arc;

use dodo_kernel::content::{ContentError, PageInput, PageService, SidebarService};
use dodo_kernel::db;
use dodo_kernel::store::{ContentStore, PgContentStore};
use dodo_test_utils::unique_title;

async fn store() -> Arc<PgContentStore> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = db::create_pool(&url, 5).await.expect("Failed to connect");
    db::run_migrations(&pool).await.expect("Failed to migrate");
    Arc::new(PgContentStore::new(pool))
}

fn input(title: &str) -> PageInput {
    PageInput {
        title: title.to_string(),
        slug: None,
        body: "<p>Postgres page</p>".to_string(),
        has_sidebar: false,
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_seed_data_present() {
    let store = store().await;
    let pages = PageService::new(store.clone());
    let sidebar = SidebarService::new(store);

    assert!(sidebar.get().await.is_ok());
    assert!(pages.find_by_slug("home").await.unwrap().is_some());
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_page_lifecycle() {
    let store = store().await;
    let pages = PageService::new(store);
    let title = unique_title("Pg Lifecycle");

    let page = pages.create(&input(&title)).await.unwrap();
    assert_eq!(page.slug, title.replace(' ', "-").to_lowercase());

    let found = pages.find_by_slug(&page.slug.to_uppercase()).await.unwrap();
    assert_eq!(found.map(|p| p.id), Some(page.id));

    let err = pages.create(&input(&title.to_uppercase())).await.unwrap_err();
    assert!(matches!(err, ContentError::Conflict));

    pages.delete(page.id).await.unwrap();
    assert!(matches!(
        pages.get(page.id).await,
        Err(ContentError::PageNotFound(_))
    ));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_reorder_is_atomic() {
    let store = store().await;
    let pages = PageService::new(store);
    let a = pages.create(&input(&unique_title("Pg Reorder"))).await.unwrap();
    let b = pages.create(&input(&unique_title("Pg Reorder"))).await.unwrap();

    let err = pages.reorder(&[b.id, a.id, -1]).await.unwrap_err();
    assert!(matches!(err, ContentError::PageNotFound(-1)));
    assert_eq!(
        pages.get(a.id).await.unwrap().sorting,
        PageService::DEFAULT_SORTING
    );

    pages.reorder(&[b.id, a.id]).await.unwrap();
    assert_eq!(pages.get(b.id).await.unwrap().sorting, 1);
    assert_eq!(pages.get(a.id).await.unwrap().sorting, 2);

    pages.delete(a.id).await.unwrap();
    pages.delete(b.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_dropped_transaction_rolls_back() {
    let store = store().await;
    let title = unique_title("Pg Rollback");

    {
        let mut tx = store.begin().await.unwrap();
        tx.insert_page(&dodo_kernel::models::NewPage {
            title: title.clone(),
            slug: title.replace(' ', "-").to_lowercase(),
            body: "body".to_string(),
            sorting: PageService::DEFAULT_SORTING,
            has_sidebar: false,
        })
        .await
        .unwrap();
    }

    let mut tx = store.begin().await.unwrap();
    let taken = tx.title_or_slug_taken(&title, "-", None).await.unwrap();
    tx.commit().await.unwrap();
    assert!(!taken);
}
