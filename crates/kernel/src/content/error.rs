//! Content service errors.

use serde::Serialize;
use thiserror::Error;

/// A validation failure tied to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors returned by the page and sidebar services.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Input failed field constraints.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Another page already uses the title or slug.
    #[error("Title or slug already exists")]
    Conflict,

    #[error("Page does not exist")]
    PageNotFound(i32),

    /// The seeded sidebar row is missing.
    #[error("sidebar does not exist")]
    SidebarNotFound,

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl ContentError {
    /// Field errors for re-rendering a form, empty for other variants.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}

/// Result type alias using ContentError.
pub type ContentResult<T> = Result<T, ContentError>;
