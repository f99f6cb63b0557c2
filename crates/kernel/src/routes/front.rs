//! Public page routes: the front page and pages by slug.
//!
//! Every public page carries the pages menu, and the sidebar widget when the
//! page asks for it.

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;

use crate::content::PageService;
use crate::models::Page;
use crate::state::AppState;

use super::helpers::{inject_site_context, render_message, render_server_error};

/// Create the public pages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(front_page))
        .route("/{slug}", get(page_by_slug))
}

/// Front page: the page with the `home` slug.
///
/// GET /
async fn front_page(State(state): State<AppState>) -> Response {
    match state.pages().find_by_slug(PageService::HOME_SLUG).await {
        Ok(Some(page)) => render_public_page(&state, &page).await,
        Ok(None) => render_message(
            axum::http::StatusCode::NOT_FOUND,
            "The front page has not been created yet.",
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to load front page");
            render_server_error("Failed to load page.")
        }
    }
}

/// A page by slug. Unknown slugs go back to the front page.
///
/// GET /{slug}
async fn page_by_slug(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.pages().find_by_slug(&slug).await {
        Ok(Some(page)) => render_public_page(&state, &page).await,
        Ok(None) => Redirect::to("/").into_response(),
        Err(e) => {
            tracing::error!(error = %e, slug = %slug, "failed to load page");
            render_server_error("Failed to load page.")
        }
    }
}

async fn render_public_page(state: &AppState, page: &Page) -> Response {
    let mut context = tera::Context::new();
    inject_site_context(state, &mut context).await;

    let sidebar = if page.has_sidebar {
        match state.sidebar().get().await {
            Ok(sidebar) => Some(sidebar.body),
            Err(e) => {
                // The page still renders without its widget
                tracing::warn!(error = %e, "failed to load sidebar");
                None
            }
        }
    } else {
        None
    };
    context.insert("sidebar", &sidebar);

    match state.theme().render_page(page, &mut context) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, slug = %page.slug, "failed to render page");
            render_server_error("Failed to render page.")
        }
    }
}
