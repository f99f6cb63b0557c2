//! Admin login and logout.
//!
//! The content services trust their caller; this module grants the admin
//! capability that every `/admin/*` handler checks before calling them.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::form::csrf::generate_csrf_token;
use crate::password::verify_password;
use crate::state::AppState;

use super::helpers::{SESSION_IS_ADMIN, render_admin_template, render_server_error, require_csrf};

/// Create the admin auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/login", get(login_form).post(login_submit))
        .route("/admin/logout", get(logout))
}

/// Login form data.
#[derive(Debug, Deserialize)]
struct LoginFormData {
    #[serde(rename = "_token", default)]
    token: String,
    #[serde(default)]
    password: String,
}

/// Render the login form, optionally with an error.
async fn render_login(state: &AppState, session: &Session, error: Option<&str>) -> Response {
    let csrf_token = generate_csrf_token(session).await.unwrap_or_default();

    let mut context = tera::Context::new();
    context.insert("csrf_token", &csrf_token);
    context.insert("error", &error);
    context.insert("login_enabled", &state.admin_password_hash().is_some());

    render_admin_template(state, "admin/login.html", context)
}

/// Login form.
///
/// GET /admin/login
async fn login_form(State(state): State<AppState>, session: Session) -> Response {
    render_login(&state, &session, None).await
}

/// Login form submission.
///
/// POST /admin/login
async fn login_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginFormData>,
) -> Response {
    if let Err(resp) = require_csrf(&session, &form.token).await {
        return resp;
    }

    let verified = state
        .admin_password_hash()
        .is_some_and(|hash| verify_password(hash, &form.password));

    if !verified {
        warn!("admin login failed");
        let response = render_login(&state, &session, Some("Invalid password.")).await;
        return (StatusCode::UNAUTHORIZED, response).into_response();
    }

    // New session id on privilege change
    if let Err(e) = session.cycle_id().await {
        tracing::error!(error = %e, "failed to cycle session id");
        return render_server_error("Failed to start admin session.");
    }
    if let Err(e) = session.insert(SESSION_IS_ADMIN, true).await {
        tracing::error!(error = %e, "failed to store admin flag in session");
        return render_server_error("Failed to start admin session.");
    }

    info!("admin logged in");
    Redirect::to("/admin/pages").into_response()
}

/// Log out and drop the session.
///
/// GET /admin/logout
async fn logout(session: Session) -> Response {
    if let Err(e) = session.flush().await {
        tracing::error!(error = %e, "failed to flush session on logout");
    }
    Redirect::to("/admin/login").into_response()
}
