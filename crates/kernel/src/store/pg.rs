//! PostgreSQL content store.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::{ContentStore, ContentTx};
use crate::db;
use crate::models::{NewPage, Page, PageChanges, Sidebar};

/// Content store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn begin(&self) -> Result<Box<dyn ContentTx>> {
        let tx = self
            .pool
            .begin()
            .await
            .context("failed to start transaction")?;
        Ok(Box::new(PgContentTx { tx }))
    }

    async fn ping(&self) -> bool {
        db::check_health(&self.pool).await
    }
}

/// An open PostgreSQL transaction. Dropping it without commit rolls back.
struct PgContentTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ContentTx for PgContentTx {
    async fn list_pages(&mut self) -> Result<Vec<Page>> {
        Page::list(&mut *self.tx).await
    }

    async fn find_page(&mut self, id: i32) -> Result<Option<Page>> {
        Page::find_by_id(&mut *self.tx, id).await
    }

    async fn find_page_by_slug(&mut self, slug: &str) -> Result<Option<Page>> {
        Page::find_by_slug(&mut *self.tx, slug).await
    }

    async fn title_or_slug_taken(
        &mut self,
        title: &str,
        slug: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool> {
        Page::title_or_slug_taken(&mut *self.tx, title, slug, exclude_id).await
    }

    async fn insert_page(&mut self, page: &NewPage) -> Result<Page> {
        Page::create(&mut *self.tx, page).await
    }

    async fn update_page(&mut self, id: i32, changes: &PageChanges) -> Result<Option<Page>> {
        Page::update(&mut *self.tx, id, changes).await
    }

    async fn delete_page(&mut self, id: i32) -> Result<bool> {
        Page::delete(&mut *self.tx, id).await
    }

    async fn apply_sorting(&mut self, order: &[(i32, i32)]) -> Result<Vec<i32>> {
        Page::apply_sorting(&mut *self.tx, order).await
    }

    async fn find_sidebar(&mut self) -> Result<Option<Sidebar>> {
        Sidebar::find(&mut *self.tx).await
    }

    async fn update_sidebar(&mut self, body: &str) -> Result<bool> {
        Sidebar::update_body(&mut *self.tx, body).await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx
            .commit()
            .await
            .context("failed to commit transaction")
    }
}
