//! # Markers
//!
//! A [`Marker`] is created where an operation starts and used wherever that
//! operation later fails. Each merge takes the failure's name and message
//! and puts them on top of the stack saved at creation.
//!
//! ```rust
//! let mark = callsite::create_marker(false);
//!
//! // ... later, possibly on another task
//! let err = mark.message("upstream closed");
//! assert_eq!(err.message(), "upstream closed");
//! assert!(err.stack().ends_with(mark.entry().as_str()));
//! ```

use crate::caller::Caller;
use crate::config::MarkerConfig;
use crate::entry::EntryStack;
use crate::error::{self, Error};
use crate::merged::{Cause, MergedError, MessageError};
use std::any::{type_name, Any};
use std::panic::Location;
use tracing::debug;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Turns errors into errors that point at the marker's creation site.
///
/// Cheap to clone and safe to share between threads; the entry stack is
/// never recomputed.
#[derive(Debug, Clone)]
pub struct Marker {
    entry: EntryStack,
    transparent: bool,
    caller: Option<Caller>,
    callee_frame: bool,
}

impl Marker {
    pub fn builder() -> MarkerBuilder {
        MarkerBuilder::default()
    }

    pub fn entry(&self) -> &EntryStack {
        &self.entry
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    /// Where the marker was created, when known
    pub fn caller(&self) -> Option<&Caller> {
        self.caller.as_ref()
    }

    /// Merge an error, keeping its type name and message
    #[track_caller]
    pub fn merge<E>(&self, error: E) -> MergedError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.merge_cause(Cause::error(error))
    }

    /// Build a [`MessageError`] with the given message
    #[track_caller]
    pub fn message(&self, message: impl Into<String>) -> MergedError {
        self.merge_cause(Cause::Message(message.into()))
    }

    /// Merge a panic payload or any other boxed value
    #[track_caller]
    pub fn merge_payload(&self, payload: Box<dyn Any + Send>) -> MergedError {
        self.merge_cause(Cause::Payload(payload))
    }

    /// Merge any [`Cause`].
    ///
    /// Payloads that are neither errors nor strings produce an
    /// `InvalidArgument` error describing the misuse, still carrying the
    /// entry stack.
    #[track_caller]
    pub fn merge_cause(&self, cause: Cause) -> MergedError {
        let callee = Location::caller();

        let (name, source) = match cause {
            Cause::Error { name, error } => (name, error),
            Cause::Message(message) => message_source(message),
            Cause::Payload(payload) => payload_source(payload),
        };

        let callee_line;
        let mut frames: Vec<&str> = Vec::with_capacity(2);
        if self.callee_frame && !self.transparent {
            callee_line = format!(
                "    at {}:{}:{}",
                callee.file(),
                callee.line(),
                callee.column()
            );
            frames.push(&callee_line);
        }
        frames.push(self.entry.as_str());

        MergedError::new(name, source, &frames)
    }
}

fn message_source(message: String) -> (&'static str, BoxError) {
    (type_name::<MessageError>(), Box::new(MessageError(message)))
}

fn payload_source(payload: Box<dyn Any + Send>) -> (&'static str, BoxError) {
    let payload = match payload.downcast::<String>() {
        Ok(message) => return message_source(*message),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<&'static str>() {
        Ok(message) => return message_source(message.to_string()),
        Err(payload) => payload,
    };
    match payload.downcast::<BoxError>() {
        Ok(error) => (type_name::<BoxError>(), *error),
        Err(_) => {
            debug!("marker received a payload that is not error-like");
            let error = error::unusable_payload("marker::merge_payload");
            (type_name::<Error>(), Box::new(error))
        }
    }
}

/// Options for creating a [`Marker`]
#[derive(Debug, Clone, Default)]
pub struct MarkerBuilder {
    transparent: bool,
    callee_frame: bool,
    config: MarkerConfig,
}

impl MarkerBuilder {
    /// Hide the frame that created the marker, so traces start in its caller
    pub fn transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    /// Put the position of each merge call above the entry stack.
    /// Ignored for transparent markers.
    pub fn callee_frame(mut self, callee_frame: bool) -> Self {
        self.callee_frame = callee_frame;
        self
    }

    pub fn config(mut self, config: MarkerConfig) -> Self {
        self.config = config;
        self
    }

    /// Capture the entry stack here
    #[track_caller]
    pub fn build(self) -> Marker {
        let caller = Caller::detect();
        let entry = EntryStack::capture(self.transparent, caller.as_ref(), &self.config);
        self.finish(entry, caller)
    }

    /// Use `raw` in place of a captured stack
    #[track_caller]
    pub fn from_raw(self, raw: &str) -> Marker {
        let caller = Caller::detect();
        let entry = EntryStack::from_raw(raw, self.transparent, caller.as_ref(), &self.config);
        self.finish(entry, caller)
    }

    fn finish(self, entry: EntryStack, caller: Option<Caller>) -> Marker {
        Marker {
            entry,
            transparent: self.transparent,
            caller,
            callee_frame: self.callee_frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io;

    const RAW: &str = "   0: callsite::create_marker
             at ./src/lib.rs:60:5
   1: app::outer
             at ./src/main.rs:12:5
   2: app::main
             at ./src/main.rs:20:5";

    fn marker(transparent: bool) -> Marker {
        Marker::builder().transparent(transparent).from_raw(RAW)
    }

    #[test]
    fn test_merge_keeps_name_and_message() {
        let err = marker(false).merge(io::Error::new(io::ErrorKind::NotFound, "boom"));
        assert_eq!(err.message(), "boom");
        assert_eq!(err.name(), type_name::<io::Error>());
        assert_eq!(
            err.stack(),
            format!(
                "{}: boom\n   1: app::outer\n             at ./src/main.rs:12:5\n   2: app::main\n             at ./src/main.rs:20:5",
                type_name::<io::Error>()
            )
        );
        assert_eq!(err.downcast_ref::<io::Error>().unwrap().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_transparent_stack() {
        let err = marker(true).message("boom");
        let mut lines = err.stack().lines();
        assert_eq!(lines.next(), Some("callsite::merged::MessageError: boom"));
        assert_eq!(lines.next(), Some("   2: app::main"));
    }

    #[test]
    fn test_repeated_merges_share_suffix() {
        let mark = marker(false);
        let a = mark.message("first");
        let b = mark.message("second");

        assert!(a.stack().ends_with(mark.entry().as_str()));
        assert!(b.stack().ends_with(mark.entry().as_str()));
        assert_ne!(a.stack(), b.stack());
    }

    #[test]
    fn test_string_payloads_become_messages() {
        let mark = marker(false);

        let err = mark.merge_payload(Box::new("static"));
        assert_eq!(err.message(), "static");
        assert!(err.downcast_ref::<MessageError>().is_some());

        let err = mark.merge_payload(Box::new(String::from("owned")));
        assert_eq!(err.message(), "owned");
    }

    #[test]
    fn test_boxed_error_payload() {
        let boxed: BoxError = Box::new(io::Error::new(io::ErrorKind::Other, "inner"));
        let err = marker(false).merge_payload(Box::new(boxed));
        assert_eq!(err.message(), "inner");
        assert!(err.downcast_ref::<io::Error>().is_some());
    }

    #[test]
    fn test_unusable_payload_is_reported() {
        let mark = marker(false);
        let err = mark.merge_payload(Box::new(42u32));

        let fault = err.downcast_ref::<Error>().unwrap();
        assert_eq!(fault.kind(), ErrorKind::InvalidArgument);
        assert_eq!(fault.operation(), Some("marker::merge_payload"));
        assert_eq!(err.name(), type_name::<Error>());
        assert!(err.stack().ends_with(mark.entry().as_str()));
    }

    #[test]
    fn test_callee_frame() {
        let mark = Marker::builder().callee_frame(true).from_raw(RAW);
        let err = mark.message("boom");
        let line = line!() - 1;

        let callee = err.stack().lines().nth(1).unwrap();
        assert!(callee.starts_with("    at "));
        assert!(callee.contains(&format!("marker.rs:{}:", line)));
        assert!(err.stack().ends_with(mark.entry().as_str()));
    }

    #[test]
    fn test_callee_frame_ignored_when_transparent() {
        let mark = Marker::builder().transparent(true).callee_frame(true).from_raw(RAW);
        let err = mark.message("boom");
        assert_eq!(err.stack().lines().nth(1), Some("   2: app::main"));
    }

    #[test]
    fn test_transparent_without_frames_below_is_header_only() {
        let mark = Marker::builder()
            .transparent(true)
            .from_raw("   0: callsite::create_marker\n   1: app::outer");
        let err = mark.message("boom");
        assert_eq!(err.stack(), "callsite::merged::MessageError: boom");
    }

    #[test]
    fn test_raw_fallback_is_appended_unmodified() {
        let raw = "no frames here";
        let mark = Marker::builder().from_raw(raw);
        let err = mark.message("boom");
        assert_eq!(err.stack(), "callsite::merged::MessageError: boom\nno frames here");
    }

    #[test]
    fn test_marker_records_caller() {
        let mark = marker(false);
        assert!(mark.caller().is_some());
        assert!(!mark.is_transparent());
    }
}
