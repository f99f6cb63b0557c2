//! Form support for the admin screens.

pub mod csrf;

pub use csrf::{generate_csrf_token, verify_csrf_token};
