//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// A required element is absent from the host document
    #[error("Element not found: {0}")]
    MissingElement(String),

    /// The host could not produce a usable measurement
    #[error("Layout measurement failed: {0}")]
    Measurement(String),

    /// Section index does not exist on this page
    #[error("No section at index {0}")]
    UnknownSection(usize),

    /// Unrecognized pin strategy name
    #[error("Unsupported pin strategy: {0}")]
    UnsupportedStrategy(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
