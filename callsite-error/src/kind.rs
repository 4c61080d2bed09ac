//! Error kinds for callsite operations

use std::fmt;

/// The kind of error that occurred.
///
/// Users can match on ErrorKind to decide how to handle specific error cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A value handed to a marker cannot be turned into an error
    InvalidArgument,

    /// Marker configuration is unusable (e.g. an empty frame prefix)
    ConfigInvalid,

    /// Failed to parse serialized configuration
    ParseFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::ParseFailed => "ParseFailed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
