//! Content store abstraction.
//!
//! All page and sidebar reads/writes go through a [`ContentTx`] obtained from
//! [`ContentStore::begin`]. A transaction is a unit of work: it is applied by
//! [`ContentTx::commit`] and rolled back when dropped without committing, so
//! an early `?` return from a service operation leaves the store unchanged.
//!
//! # Backends
//!
//! - [`PgContentStore`] - PostgreSQL via sqlx (production).
//! - [`MemoryContentStore`] - in-process store with the same transactional
//!   behavior, used by tests and `CONTENT_STORE=memory`.

mod memory;
mod pg;

use anyhow::Result;
use async_trait::async_trait;

pub use memory::MemoryContentStore;
pub use pg::PgContentStore;

use crate::models::{NewPage, Page, PageChanges, Sidebar};

/// A handle that opens transactions against the content tables.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Begin a unit of work.
    async fn begin(&self) -> Result<Box<dyn ContentTx>>;

    /// Whether the backend is reachable.
    async fn ping(&self) -> bool;
}

/// Operations available inside a transaction.
#[async_trait]
pub trait ContentTx: Send {
    /// All pages ordered by sorting, then id.
    async fn list_pages(&mut self) -> Result<Vec<Page>>;

    async fn find_page(&mut self, id: i32) -> Result<Option<Page>>;

    /// Case-insensitive slug lookup.
    async fn find_page_by_slug(&mut self, slug: &str) -> Result<Option<Page>>;

    /// Whether any page other than `exclude_id` has this title or slug,
    /// compared case-insensitively.
    async fn title_or_slug_taken(
        &mut self,
        title: &str,
        slug: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool>;

    async fn insert_page(&mut self, page: &NewPage) -> Result<Page>;

    /// Returns `None` if the page does not exist.
    async fn update_page(&mut self, id: i32, changes: &PageChanges) -> Result<Option<Page>>;

    /// Returns `false` if the page does not exist.
    async fn delete_page(&mut self, id: i32) -> Result<bool>;

    /// Set sorting for each `(id, sorting)` pair. Ids must be unique.
    /// Returns the ids that matched a page.
    async fn apply_sorting(&mut self, order: &[(i32, i32)]) -> Result<Vec<i32>>;

    async fn find_sidebar(&mut self) -> Result<Option<Sidebar>>;

    /// Returns `false` if the sidebar row is missing.
    async fn update_sidebar(&mut self, body: &str) -> Result<bool>;

    /// Apply every change made in this transaction.
    async fn commit(self: Box<Self>) -> Result<()>;
}
