//! Error types for the deployment client

use std::path::PathBuf;

use notehub_api::ErrorResponse;
use thiserror::Error;

/// Main error type for a deployment session
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("failed to read firmware file {}: {source}", .path.display())]
    FirmwareRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("{operation} failed with status {status}: {message}")]
    BackendError {
        operation: String,
        status: u16,
        /// Notehub's `err` text, or the raw body when it carries none
        message: String,
        body: String,
    },

    #[error("Invalid session transition: {0}")]
    InvalidTransition(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DeployError {
    /// Build a backend error from a non-2xx response
    pub fn backend(operation: &str, status: reqwest::StatusCode, body: String) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .map(|response| response.err)
            .filter(|err| !err.is_empty())
            .unwrap_or_else(|| body.clone());

        DeployError::BackendError {
            operation: operation.to_string(),
            status: status.as_u16(),
            message,
            body,
        }
    }

    /// Whether the backend rejected the request for missing or bad credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            DeployError::BackendError { status: 401 | 403, .. }
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, DeployError::Cancelled(_))
    }
}
