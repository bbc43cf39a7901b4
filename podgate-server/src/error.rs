//! Error types for the podgate server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use podgate_core::AuthorizationError;

/// Errors that can occur when building a router.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The base URL is not usable as a namespace root.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] podgate_core::Error),
}

/// Errors that can occur in the podgate server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Error from the authorization pipeline or the next handler.
    #[error("{0}")]
    Pipeline(#[from] podgate_core::Error),

    /// Invalid request from client.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ServerError {
    /// The status code this error is rendered with.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Pipeline(err) => match err {
                podgate_core::Error::Authorization(AuthorizationError::Unauthenticated { .. }) => {
                    StatusCode::UNAUTHORIZED
                }
                podgate_core::Error::Authorization(AuthorizationError::Forbidden { .. }) => {
                    StatusCode::FORBIDDEN
                }
                podgate_core::Error::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
                podgate_core::Error::Store(_)
                | podgate_core::Error::Config(_)
                | podgate_core::Error::Handler(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("request failed: {}", self);
        }

        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "code": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
