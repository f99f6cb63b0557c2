//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Which content store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Which session store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Redis,
    Memory,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Content store backend (default: postgres).
    pub content_store: StoreBackend,

    /// PostgreSQL connection URL. Required for the postgres backend.
    pub database_url: Option<String>,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Session store backend (default: redis).
    pub session_store: SessionBackend,

    /// Redis connection URL for sessions.
    pub redis_url: String,

    /// Cookie SameSite policy: "strict", "lax", or "none" (default: "strict").
    pub cookie_same_site: String,

    /// Path to the Tera templates directory (default: ./templates).
    pub templates_dir: PathBuf,

    /// Argon2 PHC hash of the admin password. When None, admin login is disabled.
    pub admin_password_hash: Option<String>,

    /// Site name shown in page titles and the header.
    pub site_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let content_store = match env::var("CONTENT_STORE")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => bail!("CONTENT_STORE must be \"postgres\" or \"memory\", got {other:?}"),
        };

        let database_url = env::var("DATABASE_URL").ok();
        if content_store == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL environment variable is required");
        }

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let session_store = match env::var("SESSION_STORE")
            .unwrap_or_else(|_| "redis".to_string())
            .to_lowercase()
            .as_str()
        {
            "redis" => SessionBackend::Redis,
            "memory" => SessionBackend::Memory,
            other => bail!("SESSION_STORE must be \"redis\" or \"memory\", got {other:?}"),
        };

        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

        let cookie_same_site = env::var("COOKIE_SAME_SITE")
            .unwrap_or_else(|_| "strict".to_string())
            .to_lowercase();

        let templates_dir = env::var("TEMPLATES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./templates"));

        let admin_password_hash = env::var("ADMIN_PASSWORD_HASH")
            .ok()
            .filter(|h| !h.trim().is_empty());

        let site_name = env::var("SITE_NAME").unwrap_or_else(|_| "Dodo Pet Store".to_string());

        Ok(Self {
            port,
            content_store,
            database_url,
            database_max_connections,
            session_store,
            redis_url,
            cookie_same_site,
            templates_dir,
            admin_password_hash,
            site_name,
        })
    }
}
