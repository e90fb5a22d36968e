//! Error types for userbase
//!
//! Every handler error is returned to the serving layer unmodified; the
//! router turns it into a JSON failure response using `status_code()` and
//! `code()`.

use hyper::StatusCode;

/// Main error type for userbase operations
#[derive(Debug, thiserror::Error)]
pub enum UserbaseError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl UserbaseError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code carried in the JSON error body
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Database(_) => "DB_ERROR",
            Self::Internal(_) | Self::Config(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller caused the failure
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Convert to status code and body tuple for HTTP response
    pub fn into_status_code_and_body(self) -> (StatusCode, String) {
        let status = self.status_code();
        let body = self.to_string();
        (status, body)
    }
}

impl From<std::io::Error> for UserbaseError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for UserbaseError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<hyper::Error> for UserbaseError {
    fn from(err: hyper::Error) -> Self {
        Self::Internal(format!("HTTP error: {}", err))
    }
}

impl From<mongodb::error::Error> for UserbaseError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<bson::de::Error> for UserbaseError {
    fn from(err: bson::de::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<bson::ser::Error> for UserbaseError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Internal(format!("BSON encoding failed: {}", err))
    }
}

impl From<bson::oid::Error> for UserbaseError {
    fn from(err: bson::oid::Error) -> Self {
        Self::BadRequest(format!("Invalid user ID: {}", err))
    }
}

/// Result type alias for userbase operations
pub type Result<T> = std::result::Result<T, UserbaseError>;
