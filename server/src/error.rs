//! Error types for the editor server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the editor server
#[derive(Debug, Error)]
pub enum Error {
    // Workspace errors (2000-2999)
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    #[error("Schema index {index} out of range ({configured} schemas configured)")]
    SchemaIndexOutOfRange { index: usize, configured: usize },

    // Project errors (3000-3999)
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    // Descriptor errors (4000-4999)
    #[error("Descriptor not found: {0}")]
    DescriptorNotFound(String),

    #[error("Failed to parse descriptor: {0}")]
    DescriptorParse(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    // Schema errors (5000-5999)
    #[error("Schema not loaded: {kind} at index {index}")]
    SchemaNotFound { kind: String, index: usize },

    #[error("Failed to fetch schema: {0}")]
    SchemaFetch(String),

    // Infrastructure errors (6000-6999)
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("I/O error: {0}")]
    Io(String),

    // General errors (1000-1999)
    #[error("Name conflict: {0}")]
    NameConflict(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the error code
    pub fn code(&self) -> u32 {
        match self {
            // Workspace errors (2000-2999)
            Error::WorkspaceNotFound(_) => 2001,
            Error::SchemaIndexOutOfRange { .. } => 2002,

            // Project errors (3000-3999)
            Error::ProjectNotFound(_) => 3001,

            // Descriptor errors (4000-4999)
            Error::DescriptorNotFound(_) => 4001,
            Error::DescriptorParse(_) => 4002,
            Error::MissingField(_) => 4003,
            Error::InvalidDescriptor(_) => 4004,

            // Schema errors (5000-5999)
            Error::SchemaNotFound { .. } => 5001,
            Error::SchemaFetch(_) => 5002,

            // Infrastructure errors (6000-6999)
            Error::DatabaseError(_) => 6001,
            Error::FileNotFound(_) => 6002,
            Error::Io(_) => 6003,

            // General errors (1000-1999)
            Error::NameConflict(_) => 1001,
            Error::InvalidRequest(_) => 1002,
            Error::Internal(_) => 1003,
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::WorkspaceNotFound(_)
            | Error::ProjectNotFound(_)
            | Error::DescriptorNotFound(_)
            | Error::SchemaNotFound { .. }
            | Error::FileNotFound(_) => StatusCode::NOT_FOUND,

            Error::NameConflict(_) => StatusCode::CONFLICT,

            Error::InvalidRequest(_)
            | Error::DescriptorParse(_)
            | Error::MissingField(_)
            | Error::InvalidDescriptor(_)
            | Error::SchemaIndexOutOfRange { .. } => StatusCode::BAD_REQUEST,

            Error::SchemaFetch(_) => StatusCode::BAD_GATEWAY,

            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

// Implement From for common error types
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::DatabaseError(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for Error {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Error::DatabaseError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound(err.to_string()),
            _ => Error::Io(err.to_string()),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::DescriptorParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::DescriptorParse(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::SchemaFetch(err.to_string())
    }
}
