//! Admin routes for the sidebar widget.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;
use tower_sessions::Session;

use crate::content::SidebarService;
use crate::form::csrf::generate_csrf_token;
use crate::state::AppState;

use super::helpers::{
    render_admin_template, render_server_error, require_admin, require_csrf, set_flash,
    take_flash,
};

/// Create the admin sidebar router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/admin/sidebar/edit",
        get(edit_sidebar_form).post(edit_sidebar_submit),
    )
}

#[derive(Debug, Deserialize)]
struct SidebarFormData {
    #[serde(rename = "_token", default)]
    token: String,
    #[serde(default)]
    body: String,
}

/// Pre-filled sidebar form.
///
/// GET /admin/sidebar/edit
async fn edit_sidebar_form(State(state): State<AppState>, session: Session) -> Response {
    if let Err(redirect) = require_admin(&session).await {
        return redirect;
    }

    let sidebar = match state.sidebar().get().await {
        Ok(sidebar) => sidebar,
        Err(e) => {
            tracing::error!(error = %e, "failed to load sidebar");
            return render_server_error("Failed to load sidebar.");
        }
    };

    let csrf_token = generate_csrf_token(&session).await.unwrap_or_default();
    let flash = take_flash(&session).await;

    let mut context = tera::Context::new();
    context.insert("csrf_token", &csrf_token);
    context.insert("sidebar", &sidebar);
    context.insert("flash", &flash);

    render_admin_template(&state, "admin/sidebar-form.html", context)
}

/// Save the sidebar and return to the form.
///
/// POST /admin/sidebar/edit
async fn edit_sidebar_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SidebarFormData>,
) -> Response {
    if let Err(redirect) = require_admin(&session).await {
        return redirect;
    }
    if let Err(resp) = require_csrf(&session, &form.token).await {
        return resp;
    }

    if let Err(e) = state.sidebar().update(&form.body).await {
        tracing::error!(error = %e, "failed to update sidebar");
        return render_server_error("Failed to update sidebar.");
    }

    set_flash(&session, SidebarService::SIDEBAR_UPDATED).await;
    Redirect::to("/admin/sidebar/edit").into_response()
}
