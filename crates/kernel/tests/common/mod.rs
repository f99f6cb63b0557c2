#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Tests run against the REAL kernel routes, services and templates. Content
//! lives in a fresh in-memory store per [`TestApp`] and sessions in an
//! in-memory session store, so no database or Redis is needed.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_sessions::cookie::SameSite;

use dodo_kernel::AppState;
use dodo_kernel::content::PageInput;
use dodo_kernel::models::Page;
use dodo_kernel::store::{ContentStore, MemoryContentStore};
use dodo_kernel::theme::ThemeEngine;
use dodo_kernel::{password, routes, session};

/// Admin password accepted by every [`TestApp`].
pub const TEST_PASSWORD: &str = "dodo-test-password";

/// Hashing is slow; hash the test password once per test binary.
fn admin_password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| password::hash_password(TEST_PASSWORD).expect("Failed to hash password"))
}

/// Project root `templates/` directory.
///
/// Tests run from crates/kernel/, so we need to go up two levels.
pub fn templates_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TEMPLATES_DIR") {
        return PathBuf::from(dir);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("templates")
}

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// A new application over an in-memory store holding only the sidebar.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryContentStore::with_sidebar()))
    }

    /// A new application over the same seed data the migration installs.
    pub fn seeded() -> Self {
        Self::with_store(Arc::new(MemoryContentStore::seeded()))
    }

    /// A new application over the given store.
    pub fn with_store(store: Arc<dyn ContentStore>) -> Self {
        let theme = ThemeEngine::new(&templates_dir()).expect("Failed to load templates");

        let state = AppState::from_parts(
            store,
            Arc::new(theme),
            Some(admin_password_hash().to_string()),
            "Dodo Test Store".to_string(),
        );

        // Must match main.rs
        let router = routes::app_router()
            .layer(session::memory_session_layer(SameSite::Strict))
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .with_state(state.clone());

        Self { router, state }
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// Send a request with cookies from a previous response.
    pub async fn request_with_cookies(
        &self,
        mut request: Request<Body>,
        cookies: &str,
    ) -> Response {
        if !cookies.is_empty() {
            request.headers_mut().insert(
                header::COOKIE,
                cookies.parse().expect("Invalid cookie header"),
            );
        }
        self.request(request).await
    }

    /// GET a path with the given cookies.
    pub async fn get(&self, path: &str, cookies: &str) -> Response {
        self.request_with_cookies(Request::get(path).body(Body::empty()).unwrap(), cookies)
            .await
    }

    /// POST a urlencoded form body.
    pub async fn post_form(&self, path: &str, body: String, cookies: &str) -> Response {
        self.request_with_cookies(
            Request::post(path)
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
            cookies,
        )
        .await
    }

    /// POST a JSON body.
    pub async fn post_json(&self, path: &str, body: String, cookies: &str) -> Response {
        self.request_with_cookies(
            Request::post(path)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
            cookies,
        )
        .await
    }

    /// Log in as admin and return the session cookie.
    ///
    /// # Panics
    ///
    /// Panics if the login does not redirect to the pages list.
    pub async fn login(&self) -> String {
        let response = self.get("/admin/login", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookies = extract_cookies(&response);
        let html = response_text(response).await;
        let token = extract_csrf_token(&html).expect("Should find CSRF token in login form");

        let body = dodo_test_utils::encode_form(&[
            ("_token", token),
            ("password", TEST_PASSWORD.to_string()),
        ]);
        let response = self.post_form("/admin/login", body, &cookies).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "login failed");
        assert_eq!(location(&response), Some("/admin/pages"));

        let cycled = extract_cookies(&response);
        if cycled.is_empty() { cookies } else { cycled }
    }

    /// Fetch a form page and return the CSRF token embedded in it.
    pub async fn csrf_token(&self, path: &str, cookies: &str) -> String {
        let response = self.get(path, cookies).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path} failed");
        let html = response_text(response).await;
        extract_csrf_token(&html).expect("Should find CSRF token in form")
    }

    /// Create a page through the service layer.
    pub async fn create_page(&self, title: &str, slug: Option<&str>) -> Page {
        self.state
            .pages()
            .create(&page_input(title, slug))
            .await
            .expect("Failed to create page")
    }
}

/// Valid page input with the given title and slug.
pub fn page_input(title: &str, slug: Option<&str>) -> PageInput {
    PageInput {
        title: title.to_string(),
        slug: slug.map(str::to_string),
        body: format!("<p>{title} body</p>"),
        has_sidebar: false,
    }
}

/// Session cookies (`name=value` pairs) set by a response.
pub fn extract_cookies(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The `Location` header of a redirect.
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub async fn response_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&body).to_string()
}

pub async fn response_json(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        let text = String::from_utf8_lossy(&body);
        panic!("Failed to parse JSON: {text}");
    })
}

/// Look for: name="_token" value="..."
pub fn extract_csrf_token(html: &str) -> Option<String> {
    let pattern = r#"name="_token" value=""#;
    let start = html.find(pattern)? + pattern.len();
    let end = html[start..].find('"')?;
    Some(html[start..start + end].to_string())
}
