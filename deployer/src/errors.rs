//! Error types for appdeploy

use thiserror::Error;

/// Main error type for deploy invocations
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// A remote call failed; `target` is the app id (or name while locating)
    #[error("{operation} failed for app {target}: {source}")]
    ApiError {
        operation: &'static str,
        target: String,
        #[source]
        source: Box<DeployError>,
    },

    #[error("Pagination error: {0}")]
    PaginationError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Rollout failed: {0}")]
    RolloutFailed(String),

    #[error("Timeout waiting for app ({app_id}) deployment")]
    Timeout { app_id: String },

    #[error("Deploy invocation cancelled")]
    Cancelled,

    #[error("Found {count} apps named {name}")]
    AmbiguousApp { name: String, count: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeployError {
    /// Attach the failed operation and its target. Cancellation passes through.
    pub fn api(operation: &'static str, target: impl Into<String>, source: DeployError) -> Self {
        match source {
            DeployError::Cancelled => DeployError::Cancelled,
            source => DeployError::ApiError {
                operation,
                target: target.into(),
                source: Box::new(source),
            },
        }
    }

    /// Whether this error came from the platform or the network
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DeployError::HttpError(_) | DeployError::HttpStatus { .. } | DeployError::ApiError { .. }
        )
    }
}
