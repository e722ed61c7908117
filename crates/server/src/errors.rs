use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// JSON error body: `{"error": title, "message": detail, "code": n}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: Option<String>,
    pub code: u16,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, message: Option<String>) -> Self {
        Self { status, title, message, code: status.as_u16() }
    }

    fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let code = e.code();
        let (status, title) = match &e {
            ServiceError::InvalidParameter { .. } => (StatusCode::BAD_REQUEST, "Invalid Parameter"),
            ServiceError::MissingParameter { .. } => (StatusCode::BAD_REQUEST, "Missing Parameter"),
            ServiceError::EntityNotFound { .. } => (StatusCode::NOT_FOUND, "Entity Not Found"),
            ServiceError::Db(_) | ServiceError::Model(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        };
        JsonApiError::new(status, title, Some(e.to_string())).with_code(code)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), code = self.code, message = ?self.message, "request failed");
        } else {
            warn!(status = self.status.as_u16(), code = self.code, message = ?self.message, "request rejected");
        }
        let body = serde_json::json!({
            "error": self.title,
            "message": self.message,
            "code": self.code,
        });
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
