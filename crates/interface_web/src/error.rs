//! HTTP error handling
//!
//! Every failure leaves the server as a JSON body of the form
//! `{"error": "<kind>", "message": "...", "details": {...}}`.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::PortError;
use domain_blog::forms::INVALID_IMAGE;
use domain_blog::{BlogError, FormErrors};

use crate::media::MediaError;

/// Web error types
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid form: {0}")]
    Form(FormErrors),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FormErrors>,
}

impl WebError {
    /// The 404 answered for unknown routes and objects
    pub fn page_not_found() -> Self {
        WebError::NotFound("The requested page does not exist".to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            WebError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            WebError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            WebError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            WebError::Form(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "The submitted form is invalid".to_string(),
                Some(errors),
            ),
            WebError::Unavailable(msg) => {
                error!(message = %msg, "Backing store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    "Service temporarily unavailable".to_string(),
                    None,
                )
            }
            WebError::Internal(msg) => {
                error!(message = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PortError> for WebError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { .. } => WebError::NotFound(err.to_string()),
            PortError::Conflict { message } => WebError::Conflict(message),
            PortError::Validation { message } => {
                WebError::Form(FormErrors::single("__all__", message))
            }
            PortError::Connection { .. } | PortError::Timeout { .. } => {
                WebError::Unavailable(err.to_string())
            }
            PortError::Internal { .. } => WebError::Internal(err.to_string()),
        }
    }
}

impl From<BlogError> for WebError {
    fn from(err: BlogError) -> Self {
        match err {
            BlogError::NotFound { .. } => WebError::NotFound(err.to_string()),
            BlogError::Form(errors) => WebError::Form(errors),
            BlogError::InvalidCredentials => WebError::Unauthorized(err.to_string()),
            BlogError::SelfFollow => WebError::BadRequest(err.to_string()),
            BlogError::Credentials(_) => WebError::Internal(err.to_string()),
            BlogError::Port(port) => port.into(),
        }
    }
}

impl From<FormErrors> for WebError {
    fn from(errors: FormErrors) -> Self {
        WebError::Form(errors)
    }
}

impl From<MediaError> for WebError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::InvalidImage => WebError::Form(FormErrors::single("image", INVALID_IMAGE)),
            MediaError::Io(_) => WebError::Internal(err.to_string()),
        }
    }
}

impl From<MultipartError> for WebError {
    fn from(err: MultipartError) -> Self {
        WebError::BadRequest(err.to_string())
    }
}
