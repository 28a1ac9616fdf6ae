//! Error handling for check runs.

use crate::convert::ConversionError;
use crate::threshold::ThresholdParseError;
use std::fmt;

/// Result type for check operations
pub type Result<T> = std::result::Result<T, CheckError>;

/// Everything that can turn a check run into an UNKNOWN result.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Bad, missing or unrecognized command-line argument.
    #[error("Argument error: {message}")]
    Argument {
        /// Description of the argument problem
        message: String,
        /// The offending argument text if applicable
        value: Option<String>,
    },

    /// The data source was read but could not be understood.
    #[error("Source read error: {message}")]
    SourceRead {
        /// Description of what failed to parse
        message: String,
        /// Optional source error for chaining
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A required key is absent from the data source.
    #[error("Required key '{key}' missing from {source_name}")]
    MissingKey {
        key: String,
        source_name: String,
    },

    /// Permission denied accessing the data source.
    #[error("Permission denied: {resource}")]
    PermissionDenied {
        /// The resource that couldn't be accessed
        resource: String,
    },

    /// Arithmetic on the collected values was impossible.
    #[error("Compute error: {0}")]
    Compute(#[from] ConversionError),
}

/// Coarse classification of a [`CheckError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Argument,
    SourceRead,
    Compute,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Argument => "argument",
            Self::SourceRead => "source_read",
            Self::Compute => "compute",
        };
        f.write_str(name)
    }
}

impl CheckError {
    /// Create a new argument error.
    pub fn argument<S: Into<String>>(message: S) -> Self {
        Self::Argument {
            message: message.into(),
            value: None,
        }
    }

    /// Create a new argument error with the rejected value.
    pub fn argument_with_value<S: Into<String>, V: Into<String>>(message: S, value: V) -> Self {
        Self::Argument {
            message: message.into(),
            value: Some(value.into()),
        }
    }

    /// Create a new source read error with a simple message.
    pub fn source_read<S: Into<String>>(message: S) -> Self {
        Self::SourceRead {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new source read error with a source error.
    pub fn source_read_with_source<S: Into<String>, E>(message: S, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::SourceRead {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new missing key error.
    pub fn missing_key<K: Into<String>, S: Into<String>>(key: K, source_name: S) -> Self {
        Self::MissingKey {
            key: key.into(),
            source_name: source_name.into(),
        }
    }

    /// Create a new permission denied error.
    pub fn permission_denied<S: Into<String>>(resource: S) -> Self {
        Self::PermissionDenied {
            resource: resource.into(),
        }
    }

    /// Get the error category for diagnostics.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Argument { .. } => ErrorCategory::Argument,
            Self::SourceRead { .. }
            | Self::MissingKey { .. }
            | Self::PermissionDenied { .. } => ErrorCategory::SourceRead,
            Self::Compute(_) => ErrorCategory::Compute,
        }
    }
}

impl From<ThresholdParseError> for CheckError {
    fn from(err: ThresholdParseError) -> Self {
        Self::argument_with_value(err.to_string(), err.input())
    }
}
