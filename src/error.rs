use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// App-wide error type. Every fallible handler returns `Result<T, AppError>`.
/// Renders as `{ "error": "..." }` so browser scripts get a stable shape.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotConfigured(String),

    #[error("Upstream error ({status}): {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream { status, .. } => *status,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Io(_)
            | AppError::Serde(_)
            | AppError::Http(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to a caller. Transport and I/O detail stays in
    /// the server log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotConfigured(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::Upstream { message, .. } => message.clone(),
            AppError::Io(_) | AppError::Serde(_) | AppError::Http(_) => {
                "Failed to process request".into()
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotConfigured(_) => "not_configured",
            AppError::Upstream { .. } => "upstream",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation",
            AppError::Io(_) => "io",
            AppError::Serde(_) => "serde",
            AppError::Http(_) => "http",
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), "{}", self);
        } else {
            tracing::debug!(kind = self.kind(), "{}", self);
        }
        (
            status,
            Json(serde_json::json!({ "error": self.public_message() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::NotConfigured("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        let upstream = AppError::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "slow down".into(),
        };
        assert_eq!(upstream.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(upstream.public_message(), "slow down");
    }

    #[test]
    fn test_io_detail_is_not_public() {
        let err = AppError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "/secret/path",
        ));
        assert_eq!(err.public_message(), "Failed to process request");
        assert!(err.to_string().contains("/secret/path"));
    }
}
