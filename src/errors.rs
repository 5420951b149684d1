use axum::{
    body::Body,
    http::{Response as HttpResponse, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

use crate::models::ErrorEnvelope;
use crate::request_trace::current_trace_id;

/// Fixed message returned to callers for uncategorized failures. Details are
/// logged server-side only.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

const UNPROCESSABLE_MESSAGE: &str = "Unprocessable Entity";

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Resource absent, locally or upstream.
    NotFound(String),
    /// Business-rule violation or invalid input.
    Domain(String),
    /// Upstream response the service could not process
    /// (deserialization or protocol mismatch).
    Unprocessable(String),
    /// Upstream returned an error the service could not resolve.
    Integration {
        /// Name of the external service that failed.
        service: String,
        /// Human-readable description, safe to return to the caller.
        message: String,
        /// HTTP status reported by the upstream, if any.
        status: Option<u16>,
    },
    /// Network-level failure reaching the upstream (connect, timeout, body read).
    Transport(String),
    /// Internal server error.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Domain(msg) => write!(f, "Domain error: {}", msg),
            AppError::Unprocessable(msg) => write!(f, "Unprocessable response: {}", msg),
            AppError::Integration {
                service, message, ..
            } => write!(f, "Integration error ({}): {}", service, message),
            AppError::Transport(msg) => write!(f, "Transport error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// This is the single point where internal failures become the external
    /// contract: every body is an `ErrorEnvelope` carrying the inbound
    /// request's trace id. Unexpected failures are logged with full detail
    /// and reported to the caller with a generic message.
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Domain(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unprocessable(detail) => {
                tracing::error!("Unprocessable upstream response: {}", detail);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    UNPROCESSABLE_MESSAGE.to_string(),
                )
            }
            AppError::Integration {
                service,
                message,
                status,
            } => {
                tracing::error!(
                    "Integration error from {}: {} (upstream status: {:?})",
                    service,
                    message,
                    status
                );
                (StatusCode::BAD_REQUEST, message.clone())
            }
            AppError::Transport(msg) => {
                tracing::error!("Transport error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UNEXPECTED_ERROR_MESSAGE.to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UNEXPECTED_ERROR_MESSAGE.to_string(),
                )
            }
        };

        let body = Json(ErrorEnvelope {
            message,
            trace_id: current_trace_id(),
        });

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

/// Responder for panics caught below the boundary.
///
/// Produces exactly one 500 envelope and one error log line, regardless of
/// where in the stack the panic originated.
pub fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> HttpResponse<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Unhandled panic while serving request: {}", detail);

    let body = Json(ErrorEnvelope {
        message: UNEXPECTED_ERROR_MESSAGE.to_string(),
        trace_id: current_trace_id(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}
