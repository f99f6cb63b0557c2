//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{Config, StoreBackend};
use crate::content::{PageService, SidebarService};
use crate::db;
use crate::store::{ContentStore, MemoryContentStore, PgContentStore};
use crate::theme::ThemeEngine;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Content store (PostgreSQL or memory).
    store: Arc<dyn ContentStore>,

    /// Page management service.
    pages: PageService,

    /// Sidebar widget service.
    sidebar: SidebarService,

    /// Theme engine for template rendering.
    theme: Arc<ThemeEngine>,

    /// Argon2 hash of the admin password, if admin login is enabled.
    admin_password_hash: Option<String>,

    /// Site name for page titles.
    site_name: String,
}

impl AppState {
    /// Create application state from configuration: connect the store, run
    /// migrations, and load templates.
    pub async fn new(config: &Config) -> Result<Self> {
        let store: Arc<dyn ContentStore> = match config.content_store {
            StoreBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL is required for the postgres content store")?;

                let pool = db::create_pool(database_url, config.database_max_connections)
                    .await
                    .context("failed to create database pool")?;

                db::run_migrations(&pool)
                    .await
                    .context("failed to run migrations")?;

                info!("PostgreSQL content store ready");
                Arc::new(PgContentStore::new(pool))
            }
            StoreBackend::Memory => {
                info!("using in-memory content store; content is lost on restart");
                Arc::new(MemoryContentStore::seeded())
            }
        };

        let theme = ThemeEngine::new(&config.templates_dir)
            .context("failed to load templates")?;

        Ok(Self::from_parts(
            store,
            Arc::new(theme),
            config.admin_password_hash.clone(),
            config.site_name.clone(),
        ))
    }

    /// Assemble state from already-built parts.
    pub fn from_parts(
        store: Arc<dyn ContentStore>,
        theme: Arc<ThemeEngine>,
        admin_password_hash: Option<String>,
        site_name: String,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pages: PageService::new(Arc::clone(&store)),
                sidebar: SidebarService::new(Arc::clone(&store)),
                store,
                theme,
                admin_password_hash,
                site_name,
            }),
        }
    }

    /// Get the content store.
    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.inner.store
    }

    /// Get the page service.
    pub fn pages(&self) -> &PageService {
        &self.inner.pages
    }

    /// Get the sidebar service.
    pub fn sidebar(&self) -> &SidebarService {
        &self.inner.sidebar
    }

    /// Get the theme engine.
    pub fn theme(&self) -> &Arc<ThemeEngine> {
        &self.inner.theme
    }

    /// Get the admin password hash.
    pub fn admin_password_hash(&self) -> Option<&str> {
        self.inner.admin_password_hash.as_deref()
    }

    /// Get the site name.
    pub fn site_name(&self) -> &str {
        &self.inner.site_name
    }

    /// Check if the content store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.inner.store.ping().await
    }
}
