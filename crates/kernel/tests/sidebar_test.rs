#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests for the sidebar widget.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{TestApp, location, response_text};
use dodo_kernel::content::{ContentError, SidebarService};
use dodo_kernel::store::MemoryContentStore;

#[tokio::test]
async fn test_seeded_sidebar_is_empty() {
    let sidebar = SidebarService::new(Arc::new(MemoryContentStore::with_sidebar()));

    assert_eq!(sidebar.get().await.unwrap().body, "");
}

#[tokio::test]
async fn test_update_overwrites_body() {
    let sidebar = SidebarService::new(Arc::new(MemoryContentStore::with_sidebar()));

    sidebar.update("<p>Free shipping over $50</p>").await.unwrap();
    sidebar.update("<p>Closed Sundays</p>").await.unwrap();

    assert_eq!(sidebar.get().await.unwrap().body, "<p>Closed Sundays</p>");
}

#[tokio::test]
async fn test_update_accepts_empty_body() {
    let sidebar = SidebarService::new(Arc::new(MemoryContentStore::with_sidebar()));
    sidebar.update("something").await.unwrap();

    sidebar.update("").await.unwrap();

    assert_eq!(sidebar.get().await.unwrap().body, "");
}

#[tokio::test]
async fn test_missing_sidebar_row() {
    let sidebar = SidebarService::new(Arc::new(MemoryContentStore::new()));

    assert!(matches!(
        sidebar.get().await,
        Err(ContentError::SidebarNotFound)
    ));
    assert!(matches!(
        sidebar.update("x").await,
        Err(ContentError::SidebarNotFound)
    ));
}

#[tokio::test]
async fn test_sidebar_form_requires_admin() {
    let app = TestApp::new();

    let response = app.get("/admin/sidebar/edit", "").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login"));
}

#[tokio::test]
async fn test_sidebar_edit_flow_shows_flash_once() {
    let app = TestApp::new();
    let cookies = app.login().await;

    let token = app.csrf_token("/admin/sidebar/edit", &cookies).await;
    let body = dodo_test_utils::encode_form(&[
        ("_token", token),
        ("body", "<b>Sale this week</b>".to_string()),
    ]);
    let response = app.post_form("/admin/sidebar/edit", body, &cookies).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/sidebar/edit"));

    let response = app.get("/admin/sidebar/edit", &cookies).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = response_text(response).await;
    assert!(html.contains(SidebarService::SIDEBAR_UPDATED));
    // Escaped inside the textarea
    assert!(html.contains("&lt;b&gt;Sale this week"));

    let html = response_text(app.get("/admin/sidebar/edit", &cookies).await).await;
    assert!(!html.contains(SidebarService::SIDEBAR_UPDATED));

    assert_eq!(
        app.state.sidebar().get().await.unwrap().body,
        "<b>Sale this week</b>"
    );
}

#[tokio::test]
async fn test_sidebar_post_without_token_is_rejected() {
    let app = TestApp::new();
    let cookies = app.login().await;

    let body = dodo_test_utils::encode_form(&[("body", "hijacked".to_string())]);
    let response = app.post_form("/admin/sidebar/edit", body, &cookies).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.state.sidebar().get().await.unwrap().body, "");
}

#[tokio::test]
async fn test_sidebar_form_missing_row_is_server_error() {
    let app = TestApp::with_store(Arc::new(MemoryContentStore::new()));
    let cookies = app.login().await;

    let response = app.get("/admin/sidebar/edit", &cookies).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
