//! Usage-fault error for callsite

use crate::ErrorKind;
use std::fmt;

/// A way in which callsite was misused.
///
/// Carries the [`ErrorKind`], a message, the callsite operation that noticed
/// the fault, a few `key = value` pairs, and optionally the foreign error
/// behind it.
///
/// ```rust
/// use callsite_error::{Error, ErrorKind};
///
/// let err = Error::invalid_argument("payload is not error-like")
///     .with_operation("marker::merge_payload")
///     .with_context("payload", "u32");
///
/// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
/// assert_eq!(err.operation(), Some("marker::merge_payload"));
/// assert_eq!(
///     err.to_string(),
///     "InvalidArgument in marker::merge_payload: payload is not error-like [payload = u32]"
/// );
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    operation: Option<&'static str>,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error {
            kind,
            message: message.into(),
            operation: None,
            context: Vec::new(),
            source: None,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Configuration rejected because of `field`
    pub fn config_invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, reason).with_context("field", field)
    }

    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseFailed, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The callsite operation that reported the fault
    pub fn operation(&self) -> Option<&'static str> {
        self.operation
    }

    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    pub fn source_ref(&self) -> Option<&anyhow::Error> {
        self.source.as_ref()
    }

    /// Record the reporting operation. A previously recorded one is kept in
    /// context under `via`.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if let Some(previous) = self.operation.replace(operation) {
            self.context.push(("via", previous.to_string()));
        }
        self
    }

    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Attach the foreign error behind this fault. Only one source is kept.
    pub fn set_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if let Some(operation) = self.operation {
            write!(f, " in {}", operation)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(((first_key, first_value), rest)) = self.context.split_first() {
            write!(f, " [{} = {}", first_key, first_value)?;
            for (key, value) in rest {
                write!(f, ", {} = {}", key, value)?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Error");
        out.field("kind", &self.kind).field("message", &self.message);
        if let Some(operation) = self.operation {
            out.field("operation", &operation);
        }
        if !self.context.is_empty() {
            out.field("context", &self.context);
        }
        if let Some(source) = &self.source {
            out.field("source", source);
        }
        out.finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| {
            let source: &(dyn std::error::Error + 'static) = e.as_ref();
            source
        })
    }
}
