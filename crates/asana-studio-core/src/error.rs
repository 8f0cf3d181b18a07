//! Core error types for asana-studio-core.
//!
//! Queue and engine errors are local and recoverable: the operation is
//! rejected and state is left as it was. Collaborator failures carry the
//! service name and a message fit for display.

use thiserror::Error;

/// Core error type for asana-studio-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Command issued from a state that does not accept it
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// External service errors
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

impl CoreError {
    pub fn invalid(message: impl Into<String>) -> Self {
        CoreError::InvalidOperation(message.into())
    }
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Failures reported by the catalog, generation and storage services.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Request reached the service and was refused
    #[error("{service}: {message}")]
    Request { service: String, message: String },

    /// Requested record does not exist
    #[error("{service}: {what} not found")]
    NotFound { service: String, what: String },

    /// Service could not be reached
    #[error("{service} is unavailable: {message}")]
    Unavailable { service: String, message: String },

    /// Response body could not be understood
    #[error("{service}: malformed response: {message}")]
    Decode { service: String, message: String },
}

impl ServiceError {
    pub fn service(&self) -> &str {
        match self {
            ServiceError::Request { service, .. }
            | ServiceError::NotFound { service, .. }
            | ServiceError::Unavailable { service, .. }
            | ServiceError::Decode { service, .. } => service,
        }
    }
}

/// Speech backend failures. Never propagated past the announcement scheduler.
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("speech backend unavailable")]
    Unavailable,

    #[error("speech backend failed: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
