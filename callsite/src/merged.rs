//! Errors produced by a marker

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Input to [`Marker::merge_cause`](crate::Marker::merge_cause)
pub enum Cause {
    /// An error and the name of its type
    Error { name: &'static str, error: BoxError },
    /// Message for a new [`MessageError`]
    Message(String),
    /// Any value, e.g. a panic payload from `catch_unwind`
    Payload(Box<dyn Any + Send>),
}

impl Cause {
    pub fn error<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Cause::Error {
            name: std::any::type_name::<E>(),
            error: Box::new(error),
        }
    }
}

impl From<String> for Cause {
    fn from(message: String) -> Self {
        Cause::Message(message)
    }
}

impl From<&str> for Cause {
    fn from(message: &str) -> Self {
        Cause::Message(message.to_string())
    }
}

impl From<BoxError> for Cause {
    fn from(error: BoxError) -> Self {
        Cause::Error {
            name: std::any::type_name::<BoxError>(),
            error,
        }
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Error { name, error } => f
                .debug_struct("Error")
                .field("name", name)
                .field("error", error)
                .finish(),
            Cause::Message(message) => f.debug_tuple("Message").field(message).finish(),
            Cause::Payload(_) => f.write_str("Payload(..)"),
        }
    }
}

/// Error built from a plain message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageError(pub String);

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for MessageError {}

/// An error carrying another error's identity and the stack of the place a
/// marker was created.
///
/// `Display` prints the message only. `Debug` prints the whole stack:
///
/// ```text
/// std::io::error::Error: connection reset
///    3: app::fetch
///              at ./src/app.rs:12:17
///    4: app::main
///              at ./src/app.rs:30:5
/// ```
pub struct MergedError {
    name: &'static str,
    message: String,
    stack: String,
    source: BoxError,
}

impl MergedError {
    pub(crate) fn new(name: &'static str, source: BoxError, frames: &[&str]) -> Self {
        let message = source.to_string();
        let mut stack = header(name, &message);
        for part in frames.iter().filter(|p| !p.is_empty()) {
            stack.push('\n');
            stack.push_str(part);
        }

        MergedError {
            name,
            message,
            stack,
            source,
        }
    }

    /// Type name of the error this was built from
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Header line followed by the entry stack
    pub fn stack(&self) -> &str {
        &self.stack
    }

    pub fn source_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.source.as_ref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.source.downcast_ref::<E>()
    }

    /// Give back the original error
    pub fn into_source(self) -> BoxError {
        self.source
    }
}

fn header(name: &str, message: &str) -> String {
    if message.is_empty() {
        name.to_string()
    } else {
        format!("{}: {}", name, message)
    }
}

impl fmt::Display for MergedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for MergedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stack)
    }
}

impl StdError for MergedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        let source: &(dyn StdError + 'static) = &*self.source;
        Some(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_header_and_frames() {
        let err = MergedError::new(
            "std::io::error::Error",
            Box::new(io::Error::new(io::ErrorKind::Other, "boom")),
            &["   3: app::outer", "   4: app::main"],
        );
        assert_eq!(err.name(), "std::io::error::Error");
        assert_eq!(err.message(), "boom");
        assert_eq!(err.stack(), "std::io::error::Error: boom\n   3: app::outer\n   4: app::main");
        assert_eq!(err.to_string(), "boom");
        assert_eq!(format!("{:?}", err), err.stack());
    }

    #[test]
    fn test_empty_entry_gives_header_only() {
        let err = MergedError::new("MessageError", Box::new(MessageError("late".into())), &[""]);
        assert_eq!(err.stack(), "MessageError: late");
    }

    #[test]
    fn test_empty_message_header() {
        let err = MergedError::new("MessageError", Box::new(MessageError(String::new())), &[]);
        assert_eq!(err.stack(), "MessageError");
    }

    #[test]
    fn test_source_is_kept() {
        let err = MergedError::new("MessageError", Box::new(MessageError("x".into())), &[]);
        assert_eq!(err.downcast_ref::<MessageError>(), Some(&MessageError("x".into())));
        assert!(StdError::source(&err).is_some());

        let source = err.into_source();
        assert!(source.downcast_ref::<MessageError>().is_some());
    }

    #[test]
    fn test_cause_records_type_name() {
        match Cause::error(MessageError("x".into())) {
            Cause::Error { name, .. } => assert!(name.ends_with("MessageError")),
            other => panic!("unexpected cause {:?}", other),
        }
        assert!(matches!(Cause::from("m"), Cause::Message(m) if m == "m"));
    }
}
