//! Error types for the bridge.
//!
//! Every failure is converted into a structured value at the point of
//! origin; nothing crosses the tool boundary as a panic.

use thiserror::Error;

/// Main error type for bridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Required connection parameters absent. Reported before any
    /// connection attempt is made.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection, authentication, or SQL execution failure. Carries the
    /// driver's native error text and echoes the query for caller diagnosis.
    #[error("{message}: {detail}")]
    Database {
        message: String,
        detail: String,
        sql: String,
    },

    /// Text-generation API errors (auth, rate limits, timeouts, etc.)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Failure writing the generated context file.
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a database error wrapping the driver's error text.
    pub fn database(detail: impl Into<String>, sql: impl Into<String>) -> Self {
        Self::Database {
            message: "Failed to execute SQL query".to_string(),
            detail: detail.into(),
            sql: sql.into(),
        }
    }

    /// Creates an LLM error with the given message.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Creates an I/O error with the given message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Database { .. } => "Database Error",
            Self::Llm(_) => "LLM Error",
            Self::Io(_) => "I/O Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using BridgeError.
pub type Result<T> = std::result::Result<T, BridgeError>;
