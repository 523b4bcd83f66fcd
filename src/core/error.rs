//! Custom error types for Skybrief
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for Skybrief operations
#[derive(Error, Debug)]
pub enum SkybriefError {
    /// Model gateway connection or API errors
    #[error("Model gateway error: {0}")]
    Gateway(String),

    /// Tool execution errors (network failure inside an executor)
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// The model requested a tool that is not registered
    #[error("Unknown tool requested by the model: '{0}'")]
    UnknownTool(String),

    /// The run exceeded the tool-call iteration bound
    #[error("Too many tool-call iterations (bound: {0})")]
    IterationBound(usize),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for Skybrief operations
pub type Result<T> = std::result::Result<T, SkybriefError>;

impl SkybriefError {
    /// Create a model gateway error
    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    /// Create a tool execution error
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::ToolExecution(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
