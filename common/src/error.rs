//! エラー型定義
//!
//! 統一エラー型（thiserror使用）

use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// watchcat error type
#[derive(Debug, Error)]
pub enum WatchcatError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Service not found
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// Service does not accept heartbeats (active services are probed instead)
    #[error("Service does not accept heartbeats: {0}")]
    NotFeedable(String),

    /// Required query parameter is absent
    #[error("Missing query parameter: {0}")]
    MissingQuery(String),

    /// Malformed request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing capability
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Token exists but is not the one presented
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Unknown token
    #[error("No such token")]
    TokenNotFound,

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Http(String),

    /// Timeout error
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WatchcatError {
    /// Returns a safe error message for external clients.
    ///
    /// Full details stay in the `Display` output, which only goes to server logs.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::Common(_) => "Request error",
            Self::ServiceNotFound(_) => "Service not found",
            Self::NotFeedable(_) => "Service not found",
            Self::MissingQuery(_) => "Query 'since' and 'until' are required",
            Self::BadRequest(_) => "Invalid 'since' or 'until'",
            Self::Unauthorized(_) => "Unauthorized",
            Self::Forbidden(_) => "Invalid token access",
            Self::TokenNotFound => "No such token",
            Self::Http(_) => "Backend service unavailable",
            Self::Timeout(_) => "Request timeout",
            Self::Internal(_) => "Internal server error",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Common(_) => 400,
            Self::ServiceNotFound(_) => 404,
            Self::NotFeedable(_) => 404,
            Self::MissingQuery(_) => 400,
            Self::BadRequest(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::TokenNotFound => 404,
            Self::Http(_) => 502,
            Self::Timeout(_) => 504,
            Self::Internal(_) => 500,
        }
    }
}

/// watchcat Result型
pub type WatchcatResult<T> = Result<T, WatchcatError>;

/// Common Result型
pub type CommonResult<T> = Result<T, CommonError>;
