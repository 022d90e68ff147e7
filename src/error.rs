//! Error types for the SAML toolkit

use crate::validation::ValidationResult;
use thiserror::Error;

/// Result type alias for SAML operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the SAML toolkit
///
/// Validation findings are not errors: they are reported as data in a
/// [`ValidationResult`]. This enum covers everything that stops an operation
/// from producing a result at all, plus [`Error::Invalid`] for callers that
/// asked for a typed document and got a rejected one.
#[derive(Debug, Error)]
pub enum Error {
    /// Markup could not be parsed into a document tree
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document failed structural validation
    #[error("Invalid workflow document: {} error(s)", .0.blocking().count())]
    Invalid(ValidationResult),

    /// Vector database directory failure
    #[error("Vector database directory error: {0}")]
    Directory(String),

    /// No configured vector database can back a superrag index
    #[error("No compatible vector database found: {0}")]
    MissingVectorDatabase(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a directory error
    pub fn directory(msg: impl Into<String>) -> Self {
        Self::Directory(msg.into())
    }

    /// Create a missing vector database error
    pub fn missing_vector_database(msg: impl Into<String>) -> Self {
        Self::MissingVectorDatabase(msg.into())
    }

    /// Create an other error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// The validation report, if this error is a rejected document
    pub fn validation(&self) -> Option<&ValidationResult> {
        match self {
            Self::Invalid(result) => Some(result),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
