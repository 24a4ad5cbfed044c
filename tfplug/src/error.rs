//! Error types for tfplug

/// Error type for tfplug operations
#[derive(Debug, thiserror::Error)]
pub enum TfplugError {
    #[error("Resource type not found: {0}")]
    ResourceNotFound(String),

    #[error("Provider not configured")]
    ProviderNotConfigured,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Type mismatch at {path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    #[error("Logging setup failed: {0}")]
    LoggingError(String),
}

/// Result type alias for tfplug operations
pub type Result<T> = std::result::Result<T, TfplugError>;
