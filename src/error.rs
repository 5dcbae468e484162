//! Error handling module for podstack
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Library code returns these; `main` wraps them in `anyhow` for reporting.

use thiserror::Error;

/// Main error type for podstack
#[derive(Error, Debug)]
pub enum PodstackError {
    /// IO errors (file writes, permission changes, prompts)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings errors (loading, parsing)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Template registration or rendering errors
    #[error("Template error: {0}")]
    Template(String),

    /// External tool failures (openssl, podman)
    #[error("Tool execution failed: {0}")]
    Tool(String),

    /// Validation errors (settings values, target paths)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Required binaries missing from PATH
    #[error("Missing required binaries: {}", .0.join(", "))]
    Dependency(Vec<String>),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for podstack operations
pub type Result<T> = std::result::Result<T, PodstackError>;

impl PodstackError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a template error
    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }

    /// Create a tool execution error
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::Tool(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<tera::Error> for PodstackError {
    fn from(err: tera::Error) -> Self {
        // Tera nests the useful message in the source chain
        let mut msg = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            msg.push_str(": ");
            msg.push_str(&inner.to_string());
            source = inner.source();
        }
        Self::Template(msg)
    }
}
