//! Application error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::content::ContentError;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("forbidden")]
    Forbidden,
}

impl From<ContentError> for AppError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::PageNotFound(_) => AppError::NotFound(err.to_string()),
            ContentError::Storage(e) => AppError::Internal(e),
            // Form errors are rendered by the HTML handlers, never here
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
        };

        // Internal details are logged, never returned
        let error = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FieldError;

    #[test]
    fn test_content_errors_map_to_status() {
        let cases = [
            (ContentError::PageNotFound(4), StatusCode::NOT_FOUND),
            (ContentError::Conflict, StatusCode::INTERNAL_SERVER_ERROR),
            (
                ContentError::Validation(vec![FieldError::new("title", "Title is required.")]),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ContentError::SidebarNotFound, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_not_found_message() {
        let err = AppError::from(ContentError::PageNotFound(9));
        assert_eq!(err.to_string(), "Page does not exist");
    }

    #[test]
    fn test_forbidden_status() {
        assert_eq!(
            AppError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
