//! Library error types.
//!
//! Errors are either wrapped external ones (filesystem, serde, HTTP transport) or custom library
//! errors carrying a [`CustomKind`]. Regardless of the origin every error maps onto one of
//! the [`ErrorKind`] categories which is what an operator actually cares about.

use std::fmt;

/// Custom library error categories.
#[non_exhaustive]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CustomKind {
    /// The remote store could not be reached or refused to answer.
    Connectivity,
    /// A value could not be represented as JSON.
    Serialization,
    /// An argument or a configuration value is not acceptable.
    InvalidArgument,
}

/// Error category an [`Error`] belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Enumeration or fetch against the store failed.
    Connectivity,
    /// A fetched value is not JSON-encodable.
    Serialization,
    /// The output file could not be created or written.
    Io,
    /// Invalid input supplied by the caller.
    InvalidArgument,
}

impl fmt::Display for CustomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CustomKind::Connectivity => "connectivity",
            CustomKind::Serialization => "serialization",
            CustomKind::InvalidArgument => "invalid argument",
        };
        f.write_str(name)
    }
}

/// A library error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Custom library error.
    #[error("{kind} error: {message}")]
    Custom {
        /// Error category.
        kind: CustomKind,
        /// Human readable description.
        message: String,
    },
}

impl Error {
    /// Create a custom library error.
    #[must_use]
    pub fn custom_err(kind: CustomKind, message: &str) -> Self {
        Self::Custom {
            kind,
            message: message.to_string(),
        }
    }

    /// Check whether the error is a custom library one.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }

    /// Return the kind of a custom error or `None` for wrapped external errors.
    #[must_use]
    pub fn get_custom_kind(&self) -> Option<&CustomKind> {
        match self {
            Self::Custom { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Return the category the error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::Serde(_) => ErrorKind::Serialization,
            Self::Http(_) => ErrorKind::Connectivity,
            Self::Custom { kind, .. } => match kind {
                CustomKind::Connectivity => ErrorKind::Connectivity,
                CustomKind::Serialization => ErrorKind::Serialization,
                CustomKind::InvalidArgument => ErrorKind::InvalidArgument,
            },
        }
    }
}

/// Library result type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(CustomKind::Connectivity, ErrorKind::Connectivity)]
    #[case(CustomKind::Serialization, ErrorKind::Serialization)]
    #[case(CustomKind::InvalidArgument, ErrorKind::InvalidArgument)]
    fn custom_kind_maps_onto_error_kind(#[case] custom: CustomKind, #[case] expected: ErrorKind) {
        let err = Error::custom_err(custom, "message");
        assert!(err.is_custom());
        assert_eq!(custom, *err.get_custom_kind().unwrap());
        assert_eq!(expected, err.kind());
    }

    #[test]
    fn wrapped_errors_are_not_custom() {
        let io = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert!(!io.is_custom());
        assert!(io.get_custom_kind().is_none());
        assert_eq!(ErrorKind::Io, io.kind());

        let serde = Error::from(serde_json::from_str::<i32>("nope").unwrap_err());
        assert_eq!(ErrorKind::Serialization, serde.kind());
    }

    #[test]
    fn custom_error_message_contains_kind_and_description() {
        let err = Error::custom_err(CustomKind::Connectivity, "store unreachable");
        assert_eq!("connectivity error: store unreachable", err.to_string());
    }
}
