//! HTTP route handlers.

pub mod admin_pages;
pub mod admin_sidebar;
pub mod auth;
pub mod front;
pub mod health;
pub mod helpers;

use axum::Router;

use crate::state::AppState;

/// All application routes, without state or middleware.
///
/// The public `/{slug}` route is merged last; static admin paths take
/// precedence over it.
pub fn app_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(admin_pages::router())
        .merge(admin_sidebar::router())
        .merge(front::router())
}
