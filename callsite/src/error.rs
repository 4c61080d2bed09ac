//! callsite error types
//!
//! Re-exports callsite-error and provides marker-specific conveniences.

pub use callsite_error::{Error, ErrorKind, Result};

/// Create an InvalidArgument error for a payload that is neither an error nor
/// a message
pub fn unusable_payload(operation: &'static str) -> Error {
    Error::invalid_argument(
        "marker payload must be an error, a String or a &'static str",
    )
    .with_operation(operation)
}

/// Create a ConfigInvalid error for an empty frame prefix
pub fn empty_prefix(field: &'static str) -> Error {
    Error::config_invalid(field, "frame prefix must not be empty")
        .with_operation("config::validate")
}

/// Create a ParseFailed error wrapping a serde_json failure
pub fn config_parse_failed(err: serde_json::Error) -> Error {
    Error::parse_failed("marker config is not valid json")
        .with_operation("config::from_json")
        .with_context("line", err.line().to_string())
        .set_source(err)
}
