//! Error handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pgmcp_prompts::PromptError;
use serde_json::json;
use thiserror::Error;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("Too many registered connections (max: {0})")]
    TooManyConnections(usize),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The database could not be reached or no pooled connection was free.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Introspection failed: {0}")]
    Introspection(String),

    /// User-supplied SQL was rejected or failed.
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ConnectionNotFound(_) => "CONNECTION_NOT_FOUND",
            AppError::TooManyConnections(_) => "TOO_MANY_CONNECTIONS",
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::ConnectionFailed(_) => "CONNECTION_FAILED",
            AppError::Introspection(_) => "INTROSPECTION_ERROR",
            AppError::Query(_) => "QUERY_ERROR",
            AppError::Prompt(_) => "PROMPT_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for the response.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ConnectionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::TooManyConnections(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InvalidRequest(_) | AppError::Query(_) | AppError::Prompt(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::ConnectionFailed(_) | AppError::Introspection(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify a failure while running user-supplied SQL.
    ///
    /// Errors reported by the server (syntax, permissions, read-only
    /// violations, statement timeouts) belong to the query; everything else is
    /// a connectivity problem.
    pub fn from_query(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => AppError::Query(db.message().to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                AppError::Query(err.to_string())
            }
            other => AppError::ConnectionFailed(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(code = self.code(), error = %self, "request failed");
        }

        let body = Json(json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<pgmcp_catalog::Error> for AppError {
    fn from(err: pgmcp_catalog::Error) -> Self {
        match err {
            pgmcp_catalog::Error::InvalidIdentifier(_) => AppError::InvalidRequest(err.to_string()),
            pgmcp_catalog::Error::Database(db) => AppError::Introspection(db.to_string()),
        }
    }
}

impl From<PromptError> for AppError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::Render(_) => AppError::Internal(err.to_string()),
            _ => AppError::Prompt(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
