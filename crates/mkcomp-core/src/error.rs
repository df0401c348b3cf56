//! Error types and handling for component generation

use std::path::PathBuf;
use thiserror::Error;

use crate::abbreviation::AbbreviationError;

/// Main error type for mkcomp operations
#[derive(Debug, Error)]
pub enum MkcompError {
    /// Abbreviation could not be expanded
    #[error("Abbreviation error: {source}")]
    Abbreviation {
        #[source]
        source: AbbreviationError,
        /// The abbreviation that failed
        input: String,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// YAML manifest could not be read or validated
    #[error("Failed to process YAML file: {message}")]
    ManifestError { message: String },

    /// Invalid user input such as a bad component name
    #[error("{message}")]
    ValidationError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Abbreviation,
    Config,
    Manifest,
    Validation,
    Io,
    Internal,
}

impl MkcompError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MkcompError::Abbreviation { .. } => ErrorKind::Abbreviation,
            MkcompError::ConfigError { .. } => ErrorKind::Config,
            MkcompError::ManifestError { .. } => ErrorKind::Manifest,
            MkcompError::ValidationError { .. } => ErrorKind::Validation,
            MkcompError::IoError { .. } => ErrorKind::Io,
            MkcompError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (batch generation can move on to the
    /// next component)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Abbreviation | ErrorKind::Validation | ErrorKind::Io
        )
    }

    /// Create an abbreviation error for the given input
    pub fn abbreviation(source: AbbreviationError, input: impl Into<String>) -> Self {
        Self::Abbreviation {
            source,
            input: input.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a manifest error
    pub fn manifest_error(message: impl Into<String>) -> Self {
        Self::ManifestError {
            message: message.into(),
        }
    }

    /// Create a manifest validation error, `Invalid YAML: <detail>`
    pub fn invalid_manifest(detail: impl std::fmt::Display) -> Self {
        Self::ManifestError {
            message: format!("Invalid YAML: {detail}"),
        }
    }

    /// Create a validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for MkcompError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
