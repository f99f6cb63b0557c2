//! Dodo test utilities.
//!
//! Fixtures and request-body builders for exercising the admin page and
//! sidebar screens.

use std::sync::atomic::{AtomicUsize, Ordering};

static UNIQUE: AtomicUsize = AtomicUsize::new(1);

/// A title that no other call in this process returns.
///
/// Stays within the 50-character title limit for prefixes up to 40
/// characters.
pub fn unique_title(prefix: &str) -> String {
    format!("{prefix} {}", UNIQUE.fetch_add(1, Ordering::Relaxed))
}

/// Create a test page with a valid body and no explicit slug.
pub fn test_page(title: &str) -> TestPage {
    TestPage {
        title: title.to_string(),
        slug: None,
        body: "<p>Test page body</p>".to_string(),
        has_sidebar: false,
    }
}

/// A page form builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestPage {
    pub title: String,
    pub slug: Option<String>,
    pub body: String,
    pub has_sidebar: bool,
}

impl TestPage {
    /// Set an explicit slug.
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// Show the sidebar next to the page.
    pub fn with_sidebar(mut self) -> Self {
        self.has_sidebar = true;
        self
    }

    /// Encode as an `application/x-www-form-urlencoded` admin form body.
    ///
    /// The sidebar checkbox is omitted when unchecked, as browsers do.
    pub fn form_body(&self, csrf_token: &str) -> String {
        let mut fields = vec![
            ("_token", csrf_token.to_string()),
            ("title", self.title.clone()),
            ("slug", self.slug.clone().unwrap_or_default()),
            ("body", self.body.clone()),
        ];
        if self.has_sidebar {
            fields.push(("has_sidebar", "1".to_string()));
        }
        encode_form(&fields)
    }
}

/// Encode key/value pairs as a form body.
pub fn encode_form(fields: &[(&str, String)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// JSON body for the reorder endpoint.
pub fn reorder_body(ids: &[i32]) -> String {
    serde_json::json!({ "ids": ids }).to_string()
}
