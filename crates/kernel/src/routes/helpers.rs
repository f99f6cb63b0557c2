//! Shared route helpers for page rendering.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tower_sessions::Session;

use crate::error::AppError;
use crate::form::csrf::verify_csrf_token;
use crate::state::AppState;

/// Session key for the admin capability flag.
pub const SESSION_IS_ADMIN: &str = "is_admin";

/// Session key for the one-shot status message.
const SESSION_FLASH: &str = "flash";

/// Whether the session carries the admin capability.
pub async fn is_admin(session: &Session) -> bool {
    session
        .get::<bool>(SESSION_IS_ADMIN)
        .await
        .ok()
        .flatten()
        .unwrap_or(false)
}

/// Require the admin capability, or redirect to the admin login form.
pub async fn require_admin(session: &Session) -> Result<(), Response> {
    if is_admin(session).await {
        return Ok(());
    }
    Err(Redirect::to("/admin/login").into_response())
}

/// Require the admin capability for JSON endpoints.
pub async fn require_admin_json(session: &Session) -> Result<(), AppError> {
    if is_admin(session).await {
        return Ok(());
    }
    Err(AppError::Forbidden)
}

/// Verify a submitted CSRF token, rejecting the request with 403 otherwise.
pub async fn require_csrf(session: &Session, token: &str) -> Result<(), Response> {
    match verify_csrf_token(session, token).await {
        Ok(true) => Ok(()),
        Ok(false) | Err(_) => Err((
            StatusCode::FORBIDDEN,
            Html("Invalid or expired form token. Please go back and try again."),
        )
            .into_response()),
    }
}

/// Store a status message to show on the next rendered admin page.
pub async fn set_flash(session: &Session, message: &str) {
    if let Err(e) = session.insert(SESSION_FLASH, message).await {
        tracing::warn!(error = %e, "failed to store flash message");
    }
}

/// Read and clear the pending status message.
pub async fn take_flash(session: &Session) -> Option<String> {
    session.remove::<String>(SESSION_FLASH).await.ok().flatten()
}

/// Inject site-wide context variables into a Tera context.
///
/// Adds: `site_name`, `menu`
pub async fn inject_site_context(state: &AppState, context: &mut tera::Context) {
    context.insert("site_name", state.site_name());

    let menu = match state.pages().menu().await {
        Ok(menu) => menu,
        Err(e) => {
            tracing::error!(error = %e, "failed to load pages menu");
            Vec::new()
        }
    };
    context.insert("menu", &menu);
}

/// Render a template, falling back to an error page if rendering fails.
pub fn render_template(state: &AppState, template: &str, context: &tera::Context) -> Response {
    match state.theme().render(template, context) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, template = %template, "failed to render template");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!(
                    r#"<!DOCTYPE html>
<html><head><title>Error</title></head>
<body><h1>Template Error</h1><pre>{}</pre></body></html>"#,
                    html_escape(&format!("{e:#}"))
                )),
            )
                .into_response()
        }
    }
}

/// Render an admin template with the site name available.
pub fn render_admin_template(
    state: &AppState,
    template: &str,
    mut context: tera::Context,
) -> Response {
    context.insert("site_name", state.site_name());
    render_template(state, template, &context)
}

/// Render a plain-text message with the given status.
pub fn render_message(status: StatusCode, message: &str) -> Response {
    (status, Html(html_escape(message))).into_response()
}

/// Render the "Page does not exist" message.
pub fn render_page_not_found() -> Response {
    render_message(StatusCode::NOT_FOUND, "Page does not exist")
}

/// Render a generic server error message.
pub fn render_server_error(message: &str) -> Response {
    render_message(StatusCode::INTERNAL_SERVER_ERROR, message)
}

/// HTML-escape a string for safe output.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape_special_chars() {
        assert_eq!(
            html_escape("<script>alert('xss')</script>"),
            "&lt;script&gt;alert(&#x27;xss&#x27;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_html_escape_ampersand() {
        assert_eq!(html_escape("a & b"), "a &amp; b");
    }

    #[test]
    fn test_html_escape_plain_text() {
        assert_eq!(html_escape("Page does not exist"), "Page does not exist");
    }

    #[test]
    fn test_page_not_found_status() {
        assert_eq!(render_page_not_found().status(), StatusCode::NOT_FOUND);
    }
}
