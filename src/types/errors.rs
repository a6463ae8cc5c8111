use thiserror::Error;

// === MapperError ===

/// Errors raised by the coordinate mapper.
#[derive(Debug, Error, PartialEq)]
pub enum MapperError {
    /// The rendering surface has a non-positive (or non-finite) dimension.
    #[error("Invalid surface dimensions: {width}x{height}")]
    InvalidSurface { width: f64, height: f64 },
}

// === SessionError ===

/// Errors related to session lookup and lifecycle.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// No live session exists for the given identifier.
    #[error("Session not initialized: {0}")]
    NotInitialized(String),
}

// === AdvisoryError ===

/// Errors returned by an advisory service implementation.
///
/// Never surfaced to end users; the request builder turns them into text.
#[derive(Debug, Error, PartialEq)]
pub enum AdvisoryError {
    /// No API key is configured.
    #[error("Advisory service unavailable: missing API key")]
    MissingCredentials,
    /// Credential rejected, or the service could not be reached.
    #[error("Advisory service unavailable: {0}")]
    Unavailable(String),
    /// Any other failure: timeout, error status, malformed response.
    #[error("Advisory service error: {0}")]
    ServiceError(String),
}

// === ConfigError ===

/// Errors related to loading and editing the simulator configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// File system I/O failed.
    #[error("Config I/O error: {0}")]
    IoError(String),
    /// JSON (de)serialization failed.
    #[error("Config serialization error: {0}")]
    SerializationError(String),
    /// The dot-path key does not name a config field.
    #[error("Invalid config key: {0}")]
    InvalidKey(String),
    /// The value has the wrong type for the field.
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}
