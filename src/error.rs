//! Krishi Sakha error types

use std::time::Duration;

/// Krishi Sakha error types
#[derive(Debug, thiserror::Error)]
pub enum SakhaError {
    // Storage errors
    #[error("storage error: {0}")]
    Storage(String),

    /// Storage was read but its contents are not a valid store.
    #[error("corrupt storage: {0}")]
    CorruptStorage(String),

    #[error("storage quota exceeded: {needed} bytes needed, {limit} bytes allowed")]
    QuotaExceeded { needed: usize, limit: usize },

    // Advice backend errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("advice request timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid response from advice endpoint: {0}")]
    InvalidResponse(String),

    #[error("no advice backend configured and no demo answer matched")]
    NoBackend,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl SakhaError {
    /// Whether the failure is worth answering from demo data instead.
    ///
    /// Network failures, timeouts, rate limiting and server-side errors are
    /// transient. Client errors, bad input and malformed endpoint responses
    /// are not.
    pub fn is_transient(&self) -> bool {
        match self {
            SakhaError::Http(_) | SakhaError::Timeout(_) => true,
            SakhaError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias for Krishi Sakha operations
pub type Result<T> = std::result::Result<T, SakhaError>;
