//! Error types for workspace operations
//!
//! Every failure is scoped to a single reconciliation call. Validation errors
//! are raised before any remote call is attempted; remote errors carry the
//! message reported by the workspace API unchanged.

use thiserror::Error;

/// Errors that can occur while talking to the workspace or fingerprinting content
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Malformed workspace path, rejected before any remote call
    #[error("Invalid workspace path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Payload is not valid base64
    #[error("Invalid content encoding: {0}")]
    InvalidEncoding(String),

    /// Payload decoded but could not be parsed (bad archive or notebook JSON)
    #[error("Invalid notebook payload: {0}")]
    InvalidPayload(String),

    /// Non-retryable rejection from the remote API
    #[error("{message}")]
    Remote {
        status: u16,
        code: String,
        message: String,
    },

    /// The remote object does not exist
    #[error("{message}")]
    NotFound { path: String, message: String },

    /// Transient overload persisted past the retry ceiling
    #[error("Remote API still rate limited after {attempts} attempts")]
    RetryExhausted { attempts: u32 },

    /// Network-level failure (connection refused, timeout, TLS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request or response body could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for WorkspaceError {
    fn from(err: serde_json::Error) -> Self {
        WorkspaceError::Serialization(err.to_string())
    }
}

/// Result type for workspace operations
pub type Result<T> = std::result::Result<T, WorkspaceError>;

impl WorkspaceError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            WorkspaceError::InvalidPath { path, reason } => {
                format!(
                    "Invalid workspace path '{path}': {reason}\n\n\
                    Hint: Workspace paths are absolute, e.g. /Users/me@example.com/notebook"
                )
            }
            WorkspaceError::RetryExhausted { attempts } => {
                format!(
                    "The workspace API kept rejecting requests with 429 Too Many Requests \
                    ({attempts} attempts).\n\n\
                    Hints:\n\
                    - Reduce the number of concurrent operations\n\
                    - Increase retry.max_attempts or retry.max_delay_ms"
                )
            }
            WorkspaceError::Transport(msg) => {
                format!(
                    "Failed to reach the workspace API: {msg}\n\n\
                    Hints:\n\
                    - Check DATABRICKS_HOST and your network connection\n\
                    - Increase timeout_seconds for slow workspaces"
                )
            }
            WorkspaceError::Config(msg) => {
                format!(
                    "Configuration error: {msg}\n\n\
                    Hint: Set DATABRICKS_HOST and DATABRICKS_TOKEN or provide a config file."
                )
            }
            _ => self.to_string(),
        }
    }

    /// Check if this error means the remote object is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, WorkspaceError::NotFound { .. })
    }

    /// Check if this error came from exhausting the transient-overload retries
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkspaceError::RetryExhausted { .. })
    }
}
