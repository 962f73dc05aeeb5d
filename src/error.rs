//! Error types for the financial agent router

use thiserror::Error;

/// Result type alias for router operations
pub type Result<T> = std::result::Result<T, AgentError>;

#[derive(Error, Debug)]
pub enum AgentError {

    // =============================
    // Core Pipeline Errors
    // =============================

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Agent invocation error: {0}")]
    InvocationError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Market data error: {0}")]
    MarketDataError(String),

    #[error("Activity recording error: {0}")]
    RecordingError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
