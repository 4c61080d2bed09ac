//! # callsite-error
//!
//! Error handling for callsite. The library's job is to decorate other
//! people's errors, so this crate only describes the few ways a caller can
//! misuse it.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what went wrong (e.g., InvalidArgument, ConfigInvalid)
//! - **Error Context**: Assist in locating the cause with key-value context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use callsite_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::InvalidArgument, "payload is not error-like")
//!         .with_operation("marker::merge_cause")
//!         .with_context("payload", "u32"))
//! }
//! ```
//!
//! ## Principles
//!
//! - Fallible functions return `Result<T, callsite_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Don't abuse `From<OtherError>` to prevent raw error leakage

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using callsite Error
pub type Result<T> = std::result::Result<T, Error>;
