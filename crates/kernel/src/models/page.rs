//! Page model for static content pages.
//!
//! Pages are the admin-managed content of the storefront ("About", "Contact
//! Us", the front page). Each page is reachable by its slug and ordered in the
//! site menu by its `sorting` value.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

/// Page record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Page {
    /// Surrogate key assigned by the store.
    pub id: i32,

    /// Display title (3-50 characters, unique).
    pub title: String,

    /// Lower-cased, hyphenated path segment (unique).
    pub slug: String,

    /// Page body. Trusted markup, rendered unescaped.
    pub body: String,

    /// Display order (lower sorts first).
    pub sorting: i32,

    /// Whether the sidebar widget is rendered next to this page.
    pub has_sidebar: bool,
}

/// Input for creating a page, after validation and slug derivation.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub title: String,
    pub slug: String,
    pub body: String,
    pub sorting: i32,
    pub has_sidebar: bool,
}

/// Content changes applied by an edit. `sorting` is never touched by edits.
#[derive(Debug, Clone)]
pub struct PageChanges {
    pub title: String,
    pub slug: String,
    pub body: String,
    pub has_sidebar: bool,
}

const PAGE_COLUMNS: &str = "id, title, slug, body, sorting, has_sidebar";

impl Page {
    /// List every page, ordered by sorting.
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<Self>> {
        let pages = sqlx::query_as::<_, Page>(&format!(
            "SELECT {PAGE_COLUMNS} FROM page ORDER BY sorting ASC, id ASC"
        ))
        .fetch_all(conn)
        .await
        .context("failed to list pages")?;

        Ok(pages)
    }

    /// Find a page by ID.
    pub async fn find_by_id(conn: &mut PgConnection, id: i32) -> Result<Option<Self>> {
        let page =
            sqlx::query_as::<_, Page>(&format!("SELECT {PAGE_COLUMNS} FROM page WHERE id = $1"))
                .bind(id)
                .fetch_optional(conn)
                .await
                .context("failed to fetch page by id")?;

        Ok(page)
    }

    /// Find a page by slug (case-insensitive).
    pub async fn find_by_slug(conn: &mut PgConnection, slug: &str) -> Result<Option<Self>> {
        let page = sqlx::query_as::<_, Page>(&format!(
            "SELECT {PAGE_COLUMNS} FROM page WHERE LOWER(slug) = LOWER($1) ORDER BY id LIMIT 1"
        ))
        .bind(slug)
        .fetch_optional(conn)
        .await
        .context("failed to fetch page by slug")?;

        Ok(page)
    }

    /// Check whether another page already uses `title` or `slug`.
    ///
    /// Comparison is case-insensitive. `exclude_id` skips the page being edited.
    pub async fn title_or_slug_taken(
        conn: &mut PgConnection,
        title: &str,
        slug: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM page
                WHERE (LOWER(title) = LOWER($1) OR LOWER(slug) = LOWER($2))
                  AND ($3::INTEGER IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(title)
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(conn)
        .await
        .context("failed to check page uniqueness")?;

        Ok(taken)
    }

    /// Insert a new page.
    pub async fn create(conn: &mut PgConnection, input: &NewPage) -> Result<Self> {
        let page = sqlx::query_as::<_, Page>(&format!(
            r#"
            INSERT INTO page (title, slug, body, sorting, has_sidebar)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PAGE_COLUMNS}
            "#
        ))
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.body)
        .bind(input.sorting)
        .bind(input.has_sidebar)
        .fetch_one(conn)
        .await
        .context("failed to create page")?;

        Ok(page)
    }

    /// Apply an edit. Returns `None` if the page does not exist.
    pub async fn update(
        conn: &mut PgConnection,
        id: i32,
        changes: &PageChanges,
    ) -> Result<Option<Self>> {
        let page = sqlx::query_as::<_, Page>(&format!(
            r#"
            UPDATE page
            SET title = $1, slug = $2, body = $3, has_sidebar = $4
            WHERE id = $5
            RETURNING {PAGE_COLUMNS}
            "#
        ))
        .bind(&changes.title)
        .bind(&changes.slug)
        .bind(&changes.body)
        .bind(changes.has_sidebar)
        .bind(id)
        .fetch_optional(conn)
        .await
        .context("failed to update page")?;

        Ok(page)
    }

    /// Delete a page. Returns `false` if no row matched.
    pub async fn delete(conn: &mut PgConnection, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM page WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await
            .context("failed to delete page")?;

        Ok(result.rows_affected() > 0)
    }

    /// Assign sorting values in one statement.
    ///
    /// Takes `(id, sorting)` pairs with unique ids and returns the ids that
    /// were updated.
    pub async fn apply_sorting(conn: &mut PgConnection, order: &[(i32, i32)]) -> Result<Vec<i32>> {
        let ids: Vec<i32> = order.iter().map(|(id, _)| *id).collect();
        let sortings: Vec<i32> = order.iter().map(|(_, sorting)| *sorting).collect();

        let updated: Vec<i32> = sqlx::query_scalar(
            r#"
            UPDATE page
            SET sorting = v.sorting
            FROM UNNEST($1::INTEGER[], $2::INTEGER[]) AS v(id, sorting)
            WHERE page.id = v.id
            RETURNING page.id
            "#,
        )
        .bind(&ids)
        .bind(&sortings)
        .fetch_all(conn)
        .await
        .context("failed to reorder pages")?;

        Ok(updated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_serializes_for_templates() {
        let page = Page {
            id: 7,
            title: "Contact Us".to_string(),
            slug: "contact-us".to_string(),
            body: "<p>Call us</p>".to_string(),
            sorting: 100,
            has_sidebar: true,
        };

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["slug"], "contact-us");
        assert_eq!(json["has_sidebar"], true);
        assert_eq!(json["body"], "<p>Call us</p>");
    }
}
