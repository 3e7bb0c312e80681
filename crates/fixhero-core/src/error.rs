//! Unified error types for FixHero

use thiserror::Error;

/// Unified error type for all FixHero operations
#[derive(Error, Debug)]
pub enum InspectorError {
    // Browser/CDP errors
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Screenshot capture failed: {0}")]
    Screenshot(String),

    // Capture pipeline errors
    #[error("DOM capture error: {0}")]
    DomCapture(String),

    #[error("Issue sink error: {0}")]
    Sink(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    // Storage errors
    #[error("Issue store error: {0}")]
    Store(String),

    #[error("Issue not found: {0}")]
    IssueNotFound(String),

    // Export errors
    #[error("Export error: {0}")]
    Export(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

/// Result type alias using InspectorError
pub type Result<T> = std::result::Result<T, InspectorError>;
