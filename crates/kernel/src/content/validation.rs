//! Page input validation.

use super::error::FieldError;
use super::page_service::PageInput;

/// Minimum title length in characters.
pub const TITLE_MIN_LEN: usize = 3;

/// Maximum title length in characters.
pub const TITLE_MAX_LEN: usize = 50;

/// Minimum body length in characters.
pub const BODY_MIN_LEN: usize = 3;

/// Check the field constraints of a page form.
///
/// Returns every violated constraint, not just the first.
pub fn validate_page_input(input: &PageInput) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let title_len = input.title.chars().count();
    if input.title.trim().is_empty() {
        errors.push(FieldError::new("title", "Title is required."));
    } else if !(TITLE_MIN_LEN..=TITLE_MAX_LEN).contains(&title_len) {
        errors.push(FieldError::new(
            "title",
            format!("Title must be between {TITLE_MIN_LEN} and {TITLE_MAX_LEN} characters."),
        ));
    }

    if input.body.trim().is_empty() {
        errors.push(FieldError::new("body", "Body is required."));
    } else if input.body.chars().count() < BODY_MIN_LEN {
        errors.push(FieldError::new(
            "body",
            format!("Body must be at least {BODY_MIN_LEN} characters."),
        ));
    }

    errors
}
