//! Admin routes for content page management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use tower_sessions::Session;

use crate::content::{ContentError, PageInput, PageService};
use crate::error::AppResult;
use crate::form::csrf::generate_csrf_token;
use crate::models::Page;
use crate::state::AppState;

use super::helpers::{
    render_admin_template, render_page_not_found, render_server_error, require_admin,
    require_admin_json, require_csrf, take_flash,
};

/// Create the admin pages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(|| async { Redirect::to("/admin/pages") }))
        .route("/admin/pages", get(list_pages))
        .route("/admin/pages/add", get(add_page_form).post(add_page_submit))
        .route("/admin/pages/reorder", post(reorder_pages))
        .route("/admin/pages/{id}", get(page_details))
        .route(
            "/admin/pages/{id}/edit",
            get(edit_page_form).post(edit_page_submit),
        )
        .route("/admin/pages/{id}/delete", get(delete_page))
}

// =============================================================================
// Form data
// =============================================================================

#[derive(Debug, Deserialize)]
struct PageFormData {
    #[serde(rename = "_token", default)]
    token: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    body: String,
    /// Checkbox: present when checked.
    #[serde(default)]
    has_sidebar: Option<String>,
}

impl PageFormData {
    fn into_input(self) -> PageInput {
        PageInput {
            title: self.title,
            slug: self.slug,
            body: self.body,
            has_sidebar: self.has_sidebar.is_some(),
        }
    }
}

/// Reorder request body: page ids in their new display order.
#[derive(Debug, Deserialize)]
struct ReorderRequest {
    ids: Vec<i32>,
}

impl From<&Page> for PageInput {
    fn from(page: &Page) -> Self {
        PageInput {
            title: page.title.clone(),
            slug: Some(page.slug.clone()),
            body: page.body.clone(),
            has_sidebar: page.has_sidebar,
        }
    }
}

/// How the page form is being shown.
struct PageFormView<'a> {
    action: String,
    page_id: Option<i32>,
    values: &'a PageInput,
    error: Option<&'a ContentError>,
    flash: Option<&'a str>,
}

async fn render_page_form(state: &AppState, session: &Session, view: PageFormView<'_>) -> Response {
    let csrf_token = generate_csrf_token(session).await.unwrap_or_default();

    let field_errors = view.error.map(|e| e.field_errors()).unwrap_or_default();
    let form_error = match view.error {
        Some(ContentError::Conflict) => Some(ContentError::Conflict.to_string()),
        _ => None,
    };

    let mut context = tera::Context::new();
    context.insert("csrf_token", &csrf_token);
    context.insert("action", &view.action);
    context.insert("editing", &view.page_id.is_some());
    context.insert("page_id", &view.page_id);
    context.insert("values", view.values);
    context.insert("errors", field_errors);
    context.insert("form_error", &form_error);
    context.insert("flash", &view.flash);

    let mut response = render_admin_template(state, "admin/page-form.html", context);
    if view.error.is_some() && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::UNPROCESSABLE_ENTITY;
    }
    response
}

// =============================================================================
// Handlers
// =============================================================================

/// List all pages in display order.
///
/// GET /admin/pages
async fn list_pages(State(state): State<AppState>, session: Session) -> Response {
    if let Err(redirect) = require_admin(&session).await {
        return redirect;
    }

    let pages = match state.pages().list().await {
        Ok(pages) => pages,
        Err(e) => {
            tracing::error!(error = %e, "failed to list pages");
            return render_server_error("Failed to load pages.");
        }
    };

    let flash = take_flash(&session).await;

    let mut context = tera::Context::new();
    context.insert("pages", &pages);
    context.insert("home_slug", PageService::HOME_SLUG);
    context.insert("flash", &flash);

    render_admin_template(&state, "admin/pages.html", context)
}

/// Empty add-page form.
///
/// GET /admin/pages/add
async fn add_page_form(State(state): State<AppState>, session: Session) -> Response {
    if let Err(redirect) = require_admin(&session).await {
        return redirect;
    }

    let values = PageInput::default();
    render_page_form(
        &state,
        &session,
        PageFormView {
            action: "/admin/pages/add".to_string(),
            page_id: None,
            values: &values,
            error: None,
            flash: None,
        },
    )
    .await
}

/// Create a page.
///
/// POST /admin/pages/add
async fn add_page_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PageFormData>,
) -> Response {
    if let Err(redirect) = require_admin(&session).await {
        return redirect;
    }
    if let Err(resp) = require_csrf(&session, &form.token).await {
        return resp;
    }

    let input = form.into_input();
    let result = state.pages().create(&input).await;
    let (values, error, flash) = match result {
        Ok(_) => (PageInput::default(), None, Some(PageService::PAGE_ADDED)),
        Err(e @ (ContentError::Validation(_) | ContentError::Conflict)) => (input, Some(e), None),
        Err(e) => {
            tracing::error!(error = %e, "failed to create page");
            return render_server_error("Failed to create page.");
        }
    };

    render_page_form(
        &state,
        &session,
        PageFormView {
            action: "/admin/pages/add".to_string(),
            page_id: None,
            values: &values,
            error: error.as_ref(),
            flash,
        },
    )
    .await
}

/// Pre-filled edit form.
///
/// GET /admin/pages/{id}/edit
async fn edit_page_form(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Response {
    if let Err(redirect) = require_admin(&session).await {
        return redirect;
    }

    let page = match state.pages().get(id).await {
        Ok(page) => page,
        Err(ContentError::PageNotFound(_)) => return render_page_not_found(),
        Err(e) => {
            tracing::error!(error = %e, page_id = id, "failed to load page");
            return render_server_error("Failed to load page.");
        }
    };

    let values = PageInput::from(&page);
    render_page_form(
        &state,
        &session,
        PageFormView {
            action: format!("/admin/pages/{id}/edit"),
            page_id: Some(id),
            values: &values,
            error: None,
            flash: None,
        },
    )
    .await
}

/// Apply an edit.
///
/// POST /admin/pages/{id}/edit
async fn edit_page_submit(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<PageFormData>,
) -> Response {
    if let Err(redirect) = require_admin(&session).await {
        return redirect;
    }
    if let Err(resp) = require_csrf(&session, &form.token).await {
        return resp;
    }

    let input = form.into_input();
    let result = state.pages().update(id, &input).await;
    let (values, error, flash) = match result {
        Ok(page) => (PageInput::from(&page), None, Some(PageService::PAGE_UPDATED)),
        Err(ContentError::PageNotFound(_)) => return render_page_not_found(),
        Err(e @ (ContentError::Validation(_) | ContentError::Conflict)) => (input, Some(e), None),
        Err(e) => {
            tracing::error!(error = %e, page_id = id, "failed to update page");
            return render_server_error("Failed to update page.");
        }
    };

    render_page_form(
        &state,
        &session,
        PageFormView {
            action: format!("/admin/pages/{id}/edit"),
            page_id: Some(id),
            values: &values,
            error: error.as_ref(),
            flash,
        },
    )
    .await
}

/// Read-only page details.
///
/// GET /admin/pages/{id}
async fn page_details(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Response {
    if let Err(redirect) = require_admin(&session).await {
        return redirect;
    }

    let page = match state.pages().get(id).await {
        Ok(page) => page,
        Err(ContentError::PageNotFound(_)) => return render_page_not_found(),
        Err(e) => {
            tracing::error!(error = %e, page_id = id, "failed to load page");
            return render_server_error("Failed to load page.");
        }
    };

    let mut context = tera::Context::new();
    context.insert("page", &page);

    render_admin_template(&state, "admin/page-details.html", context)
}

/// Delete a page and return to the list.
///
/// GET /admin/pages/{id}/delete
async fn delete_page(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Response {
    if let Err(redirect) = require_admin(&session).await {
        return redirect;
    }

    match state.pages().delete(id).await {
        Ok(()) => Redirect::to("/admin/pages").into_response(),
        Err(ContentError::PageNotFound(_)) => render_page_not_found(),
        Err(e) => {
            tracing::error!(error = %e, page_id = id, "failed to delete page");
            render_server_error("Failed to delete page.")
        }
    }
}

/// Reorder pages (AJAX, from the sortable list).
///
/// POST /admin/pages/reorder
async fn reorder_pages(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<ReorderRequest>,
) -> AppResult<StatusCode> {
    require_admin_json(&session).await?;

    state.pages().reorder(&request.ids).await?;

    Ok(StatusCode::NO_CONTENT)
}
