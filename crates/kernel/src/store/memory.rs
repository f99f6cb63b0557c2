//! In-process content store.
//!
//! Transactions are serialized: `begin` takes an owned lock on the data and
//! works on a copy, which `commit` writes back. Dropping the transaction
//! discards the copy.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{ContentStore, ContentTx};
use crate::content::PageService;
use crate::models::{NewPage, Page, PageChanges, SIDEBAR_ID, Sidebar};

/// Body of the seeded front page, as in the migration.
const HOME_BODY: &str = "<p>Welcome to the Dodo Pet Store.</p>";

#[derive(Debug, Clone, Default)]
struct ContentData {
    pages: BTreeMap<i32, Page>,
    sidebar: Option<Sidebar>,
    next_id: i32,
}

/// Content store held in memory.
#[derive(Clone, Default)]
pub struct MemoryContentStore {
    data: Arc<Mutex<ContentData>>,
}

impl MemoryContentStore {
    /// An empty store with no sidebar row.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with an empty sidebar row and no pages.
    pub fn with_sidebar() -> Self {
        let data = ContentData {
            sidebar: Some(Sidebar {
                id: SIDEBAR_ID,
                body: String::new(),
            }),
            ..ContentData::default()
        };
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// A store holding the same seed data as the database migration: an
    /// empty sidebar row and the front page.
    pub fn seeded() -> Self {
        let home = Page {
            id: 1,
            title: "Home".to_string(),
            slug: PageService::HOME_SLUG.to_string(),
            body: HOME_BODY.to_string(),
            sorting: 0,
            has_sidebar: false,
        };
        let data = ContentData {
            pages: BTreeMap::from([(home.id, home)]),
            sidebar: Some(Sidebar {
                id: SIDEBAR_ID,
                body: String::new(),
            }),
            next_id: 1,
        };
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn begin(&self) -> Result<Box<dyn ContentTx>> {
        let guard = Arc::clone(&self.data).lock_owned().await;
        let working = (*guard).clone();
        Ok(Box::new(MemoryContentTx { guard, working }))
    }

    async fn ping(&self) -> bool {
        true
    }
}

struct MemoryContentTx {
    guard: OwnedMutexGuard<ContentData>,
    working: ContentData,
}

#[async_trait]
impl ContentTx for MemoryContentTx {
    async fn list_pages(&mut self) -> Result<Vec<Page>> {
        let mut pages: Vec<Page> = self.working.pages.values().cloned().collect();
        pages.sort_by_key(|p| (p.sorting, p.id));
        Ok(pages)
    }

    async fn find_page(&mut self, id: i32) -> Result<Option<Page>> {
        Ok(self.working.pages.get(&id).cloned())
    }

    async fn find_page_by_slug(&mut self, slug: &str) -> Result<Option<Page>> {
        let slug = slug.to_lowercase();
        Ok(self
            .working
            .pages
            .values()
            .find(|p| p.slug.to_lowercase() == slug)
            .cloned())
    }

    async fn title_or_slug_taken(
        &mut self,
        title: &str,
        slug: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool> {
        let title = title.to_lowercase();
        let slug = slug.to_lowercase();
        Ok(self.working.pages.values().any(|p| {
            Some(p.id) != exclude_id
                && (p.title.to_lowercase() == title || p.slug.to_lowercase() == slug)
        }))
    }

    async fn insert_page(&mut self, page: &NewPage) -> Result<Page> {
        self.working.next_id += 1;
        let stored = Page {
            id: self.working.next_id,
            title: page.title.clone(),
            slug: page.slug.clone(),
            body: page.body.clone(),
            sorting: page.sorting,
            has_sidebar: page.has_sidebar,
        };
        self.working.pages.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_page(&mut self, id: i32, changes: &PageChanges) -> Result<Option<Page>> {
        let Some(page) = self.working.pages.get_mut(&id) else {
            return Ok(None);
        };
        page.title = changes.title.clone();
        page.slug = changes.slug.clone();
        page.body = changes.body.clone();
        page.has_sidebar = changes.has_sidebar;
        Ok(Some(page.clone()))
    }

    async fn delete_page(&mut self, id: i32) -> Result<bool> {
        Ok(self.working.pages.remove(&id).is_some())
    }

    async fn apply_sorting(&mut self, order: &[(i32, i32)]) -> Result<Vec<i32>> {
        let mut updated = Vec::with_capacity(order.len());
        for (id, sorting) in order {
            if let Some(page) = self.working.pages.get_mut(id) {
                page.sorting = *sorting;
                updated.push(*id);
            }
        }
        Ok(updated)
    }

    async fn find_sidebar(&mut self) -> Result<Option<Sidebar>> {
        Ok(self.working.sidebar.clone())
    }

    async fn update_sidebar(&mut self, body: &str) -> Result<bool> {
        let Some(sidebar) = self.working.sidebar.as_mut() else {
            return Ok(false);
        };
        sidebar.body = body.to_string();
        Ok(true)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryContentTx { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
