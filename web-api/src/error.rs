//! Error handling for the HTTP layer
//!
//! Maps core task errors to status codes and the JSON error bodies the
//! browser client expects.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use task_core::TaskError;
use thiserror::Error;

use crate::dto::ErrorBody;

/// Body text for a missing, blank or unparsable title
pub const TITLE_REQUIRED: &str = "Title is required";

/// Body text for an unknown or malformed task id
pub const NOT_FOUND: &str = "Not found";

/// Body text for any storage or rendering failure
pub const INTERNAL_ERROR: &str = "Internal server error";

/// HTTP API errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Title is required")]
    TitleRequired,

    #[error("Not found")]
    NotFound,

    /// Storage failure; the detail is logged, never sent to the client
    #[error("Storage error: {0}")]
    Storage(TaskError),

    #[error("Render error: {0}")]
    Render(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::TitleRequired => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::TitleRequired => TITLE_REQUIRED,
            ApiError::NotFound => NOT_FOUND,
            ApiError::Storage(_) | ApiError::Render(_) => INTERNAL_ERROR,
        }
    }
}

/// Convert from TaskError to ApiError
impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Validation(_) => ApiError::TitleRequired,
            TaskError::NotFound(_) => ApiError::NotFound,
            other => ApiError::Storage(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Storage(err) => tracing::error!(error = %err, "Storage operation failed"),
            ApiError::Render(err) => tracing::error!(error = %err, "Page rendering failed"),
            _ => {}
        }

        let body = ErrorBody {
            error: self.public_message().to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
