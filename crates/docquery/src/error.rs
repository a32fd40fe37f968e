//! Error types for the document query service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or invalid request field
    #[error("{0}")]
    Validation(String),

    /// Unknown document id or missing resource
    #[error("{0}")]
    NotFound(String),

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Model output that could not be parsed as the expected JSON shape
    #[error("Model output parse error: {0}")]
    ModelOutputParse(String),

    /// External service (embedding, LLM, vector database) failure
    #[error("{service} error: {message}")]
    ExternalService { service: String, message: String },

    /// Request to an external service exceeded the configured timeout
    #[error("Timed out waiting for {0}")]
    Timeout(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an external service error
    pub fn external(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Classify a reqwest failure, keeping timeouts distinct
    pub fn from_reqwest(service: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(service.to_string())
        } else {
            Self::ExternalService {
                service: service.to_string(),
                message: err.to_string(),
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::FileParse { filename, message } => (
                StatusCode::BAD_REQUEST,
                format!("Failed to parse '{}': {}", filename, message),
            ),
            Error::ModelOutputParse(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            Error::ExternalService { service, message } => (
                StatusCode::BAD_GATEWAY,
                format!("{} error: {}", service, message),
            ),
            Error::Timeout(service) => (
                StatusCode::GATEWAY_TIMEOUT,
                format!("Timed out waiting for {}", service),
            ),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Json(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "status": "fail",
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::from_reqwest("upstream", err)
    }
}
