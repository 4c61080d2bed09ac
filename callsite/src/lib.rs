//! # callsite
//!
//! Errors whose stack trace points at the code that *started* an operation,
//! not at the executor or callback machinery that later noticed it failed.
//!
//! ## Core Concepts
//! - **Entry stack**: the caller's backtrace, captured once at setup and
//!   trimmed of this crate's own frames
//! - **Marker**: holds an entry stack and merges later failures onto it
//! - **Transparent mode**: also hides the frame that created the marker, for
//!   libraries that want traces to start in *their* caller
//! - **Merged error**: original name and message, entry stack as the trace
//!
//! ```rust
//! fn spawn_job() -> callsite::Marker {
//!     // capture before any work is deferred
//!     callsite::create_marker(false)
//! }
//!
//! let mark = spawn_job();
//! let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "job timed out");
//! let err = mark.merge(io);
//! assert_eq!(err.message(), "job timed out");
//! assert!(err.stack().ends_with(mark.entry().as_str()));
//! ```

pub mod caller;
pub mod config;
pub mod entry;
pub mod error;
pub mod marker;
pub mod merged;
pub mod stack;

pub use caller::Caller;
pub use config::MarkerConfig;
pub use entry::EntryStack;
pub use error::{Error, ErrorKind, Result};
pub use marker::{Marker, MarkerBuilder};
pub use merged::{Cause, MergedError, MessageError};
pub use stack::{Frame, FrameLocation, StackTrace};

/// Symbol prefix of every function in this crate
pub(crate) const CRATE_PREFIX: &str = concat!(module_path!(), "::");
/// Symbol prefix of trait impls on this crate's types
pub(crate) const CRATE_IMPL_PREFIX: &str = concat!("<", module_path!(), "::");

/// Capture the current stack and return a marker for later failures.
///
/// With `transparent`, the frame that called this function is hidden too.
#[track_caller]
pub fn create_marker(transparent: bool) -> Marker {
    Marker::builder().transparent(transparent).build()
}

/// Same as `create_marker(false)`
#[track_caller]
pub fn marker() -> Marker {
    Marker::builder().build()
}
