//! Sidebar model: the single shared widget shown next to pages.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

/// Fixed primary key of the sidebar row.
pub const SIDEBAR_ID: i32 = 1;

/// Sidebar record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sidebar {
    pub id: i32,

    /// Widget content. Trusted markup, rendered unescaped.
    pub body: String,
}

impl Sidebar {
    /// Load the sidebar row.
    pub async fn find(conn: &mut PgConnection) -> Result<Option<Self>> {
        let sidebar = sqlx::query_as::<_, Sidebar>("SELECT id, body FROM sidebar WHERE id = $1")
            .bind(SIDEBAR_ID)
            .fetch_optional(conn)
            .await
            .context("failed to fetch sidebar")?;

        Ok(sidebar)
    }

    /// Overwrite the sidebar body. Returns `false` if the row is missing.
    pub async fn update_body(conn: &mut PgConnection, body: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE sidebar SET body = $1 WHERE id = $2")
            .bind(body)
            .bind(SIDEBAR_ID)
            .execute(conn)
            .await
            .context("failed to update sidebar")?;

        Ok(result.rows_affected() > 0)
    }
}
