//! Sidebar widget service.

use std::sync::Arc;

use tracing::info;

use super::error::{ContentError, ContentResult};
use crate::models::Sidebar;
use crate::store::ContentStore;

/// Service for reading and editing the shared sidebar.
#[derive(Clone)]
pub struct SidebarService {
    store: Arc<dyn ContentStore>,
}

impl SidebarService {
    /// Confirmation shown after a successful edit.
    pub const SIDEBAR_UPDATED: &'static str = "You have edited the sidebar!";

    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Load the sidebar. The row is seed data and is expected to exist.
    pub async fn get(&self) -> ContentResult<Sidebar> {
        let mut tx = self.store.begin().await?;
        let sidebar = tx.find_sidebar().await?.ok_or(ContentError::SidebarNotFound)?;
        tx.commit().await?;
        Ok(sidebar)
    }

    /// Overwrite the sidebar body. No validation is applied.
    pub async fn update(&self, body: &str) -> ContentResult<()> {
        let mut tx = self.store.begin().await?;
        if !tx.update_sidebar(body).await? {
            return Err(ContentError::SidebarNotFound);
        }
        tx.commit().await?;

        info!(len = body.len(), "sidebar updated");
        Ok(())
    }
}
