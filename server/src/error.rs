//! HTTP error mapping. Domain and store failures become `{"detail": …}`
//! payloads with the right status; store internals are logged, not leaked.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// `sort_by` outside the recognized set.
    #[error("Invalid sort option")]
    InvalidSortOption,
    #[error("Course not found")]
    CourseNotFound,
    #[error("Chapter not found")]
    ChapterNotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::InvalidSortOption => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::CourseNotFound | ApiError::ChapterNotFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::Store(err) => {
                error!(error = %err, "store failure while serving request");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
