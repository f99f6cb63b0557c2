//! Page management service.
//!
//! Every operation runs in its own store transaction: it commits on success
//! and rolls back on any error, including validation and conflict failures.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::{ContentError, ContentResult};
use super::slug::derive_slug;
use super::validation::validate_page_input;
use crate::models::{NewPage, Page, PageChanges};
use crate::store::ContentStore;

/// Submitted page form values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInput {
    pub title: String,
    pub slug: Option<String>,
    pub body: String,
    pub has_sidebar: bool,
}

/// A public menu link to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub title: String,
    pub slug: String,
}

/// Service for page CRUD and ordering.
#[derive(Clone)]
pub struct PageService {
    store: Arc<dyn ContentStore>,
}

impl PageService {
    /// Sorting assigned to new pages so they follow manually ordered ones.
    pub const DEFAULT_SORTING: i32 = 100;

    /// Slug of the front page. Edits never regenerate it.
    pub const HOME_SLUG: &'static str = "home";

    /// Confirmation shown after a successful create.
    pub const PAGE_ADDED: &'static str = "New page has been added!";

    /// Confirmation shown after a successful edit.
    pub const PAGE_UPDATED: &'static str = "Page edit complete!";

    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// All pages, ascending by sorting.
    pub async fn list(&self) -> ContentResult<Vec<Page>> {
        let mut tx = self.store.begin().await?;
        let pages = tx.list_pages().await?;
        tx.commit().await?;
        Ok(pages)
    }

    /// Load one page.
    pub async fn get(&self, id: i32) -> ContentResult<Page> {
        let mut tx = self.store.begin().await?;
        let page = tx.find_page(id).await?.ok_or(ContentError::PageNotFound(id))?;
        tx.commit().await?;
        Ok(page)
    }

    /// Create a page from form input.
    pub async fn create(&self, input: &PageInput) -> ContentResult<Page> {
        let errors = validate_page_input(input);
        if !errors.is_empty() {
            return Err(ContentError::Validation(errors));
        }

        let slug = derive_slug(&input.title, input.slug.as_deref());

        let mut tx = self.store.begin().await?;
        if tx.title_or_slug_taken(&input.title, &slug, None).await? {
            debug!(title = %input.title, slug = %slug, "page title or slug already exists");
            return Err(ContentError::Conflict);
        }

        let page = tx
            .insert_page(&NewPage {
                title: input.title.clone(),
                slug,
                body: input.body.clone(),
                sorting: Self::DEFAULT_SORTING,
                has_sidebar: input.has_sidebar,
            })
            .await?;
        tx.commit().await?;

        info!(page_id = page.id, slug = %page.slug, "page created");
        Ok(page)
    }

    /// Edit a page. Sorting is left as is.
    ///
    /// A missing page is reported before any validation error.
    pub async fn update(&self, id: i32, input: &PageInput) -> ContentResult<Page> {
        let mut tx = self.store.begin().await?;
        let existing = tx.find_page(id).await?.ok_or(ContentError::PageNotFound(id))?;

        let errors = validate_page_input(input);
        if !errors.is_empty() {
            return Err(ContentError::Validation(errors));
        }

        let slug = if existing.slug == Self::HOME_SLUG {
            existing.slug
        } else {
            derive_slug(&input.title, input.slug.as_deref())
        };

        if tx.title_or_slug_taken(&input.title, &slug, Some(id)).await? {
            debug!(page_id = id, title = %input.title, slug = %slug, "page title or slug already exists");
            return Err(ContentError::Conflict);
        }

        let changes = PageChanges {
            title: input.title.clone(),
            slug,
            body: input.body.clone(),
            has_sidebar: input.has_sidebar,
        };
        let page = tx
            .update_page(id, &changes)
            .await?
            .ok_or(ContentError::PageNotFound(id))?;
        tx.commit().await?;

        info!(page_id = id, slug = %page.slug, "page updated");
        Ok(page)
    }

    /// Hard-delete a page.
    pub async fn delete(&self, id: i32) -> ContentResult<()> {
        let mut tx = self.store.begin().await?;
        if !tx.delete_page(id).await? {
            return Err(ContentError::PageNotFound(id));
        }
        tx.commit().await?;

        info!(page_id = id, "page deleted");
        Ok(())
    }

    /// Assign sorting 1..N following `ordered_ids`.
    ///
    /// All-or-nothing: an unknown id fails the whole reorder and no sorting
    /// value changes. When an id is listed more than once its last position
    /// wins.
    pub async fn reorder(&self, ordered_ids: &[i32]) -> ContentResult<()> {
        let order = sorting_assignments(ordered_ids);
        if order.is_empty() {
            return Ok(());
        }

        let mut tx = self.store.begin().await?;
        let updated = tx.apply_sorting(&order).await?;
        if let Some((missing, _)) = order.iter().find(|(id, _)| !updated.contains(id)) {
            return Err(ContentError::PageNotFound(*missing));
        }
        tx.commit().await?;

        info!(count = order.len(), "pages reordered");
        Ok(())
    }

    /// Look up a page by slug for public display.
    pub async fn find_by_slug(&self, slug: &str) -> ContentResult<Option<Page>> {
        let mut tx = self.store.begin().await?;
        let page = tx.find_page_by_slug(slug).await?;
        tx.commit().await?;
        Ok(page)
    }

    /// Menu links for every page except the front page, in display order.
    pub async fn menu(&self) -> ContentResult<Vec<MenuEntry>> {
        let pages = self.list().await?;
        Ok(pages
            .into_iter()
            .filter(|p| p.slug != Self::HOME_SLUG)
            .map(|p| MenuEntry {
                title: p.title,
                slug: p.slug,
            })
            .collect())
    }
}

/// Turn an ordered id list into unique `(id, sorting)` pairs, 1-indexed.
fn sorting_assignments(ordered_ids: &[i32]) -> Vec<(i32, i32)> {
    let mut positions: HashMap<i32, i32> = HashMap::with_capacity(ordered_ids.len());
    for (index, id) in ordered_ids.iter().enumerate() {
        positions.insert(*id, index as i32 + 1);
    }

    let mut order: Vec<(i32, i32)> = positions.into_iter().collect();
    order.sort_by_key(|(_, sorting)| *sorting);
    order
}
