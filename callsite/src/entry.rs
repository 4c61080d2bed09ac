//! # Entry stack
//!
//! The part of a stack trace that describes where user code started an
//! operation. Captured once when a marker is created and appended to every
//! error the marker produces later.

use crate::caller::Caller;
use crate::config::MarkerConfig;
use crate::stack::{Frame, StackTrace};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Immutable stack suffix captured at setup
#[derive(Clone, PartialEq, Eq)]
pub struct EntryStack {
    text: Arc<str>,
}

impl EntryStack {
    /// Capture the current thread's stack and trim it to the entry stack.
    ///
    /// Never fails: without backtrace support the entry stack is empty.
    pub fn capture(transparent: bool, caller: Option<&Caller>, config: &MarkerConfig) -> Self {
        let backtrace = Backtrace::force_capture();
        match backtrace.status() {
            BacktraceStatus::Captured => {
                Self::from_raw(&backtrace.to_string(), transparent, caller, config)
            }
            status => {
                debug!(?status, "no backtrace available, entry stack left empty");
                Self::from_text(String::new())
            }
        }
    }

    /// Trim raw stack text to the entry stack.
    ///
    /// The call into setup is the frame at `caller`'s position, or else the
    /// first frame that is not internal. A transparent entry stack starts
    /// below that frame, and is empty when nothing is below it. Text that
    /// cannot be trimmed is kept as is.
    pub fn from_raw(
        raw: &str,
        transparent: bool,
        caller: Option<&Caller>,
        config: &MarkerConfig,
    ) -> Self {
        let Some(trace) = StackTrace::parse(raw) else {
            debug!("unrecognised stack format, keeping raw text");
            return Self::from_text(raw.to_string());
        };

        let Some(call) = setup_frame(&trace, caller, config) else {
            debug!(frames = trace.len(), "no frame outside of callsite, keeping raw text");
            return Self::from_text(raw.to_string());
        };

        let start = if transparent { call + 1 } else { call };
        let frames = &trace.frames()[start.min(trace.len())..];
        if frames.is_empty() {
            debug!(frames = trace.len(), "nothing below the setup frame, entry stack left empty");
            return Self::from_text(String::new());
        }

        let text = if config.clean {
            let kept: Vec<Frame> = frames
                .iter()
                .filter(|f| !f.symbol_starts_with(config.runtime_prefixes.as_slice()))
                .cloned()
                .collect();
            if kept.is_empty() {
                StackTrace::join(frames)
            } else {
                StackTrace::join(&kept)
            }
        } else {
            StackTrace::join(frames)
        };

        trace!(transparent, setup_frame = call, "captured entry stack");
        Self::from_text(text)
    }

    fn from_text(text: String) -> Self {
        EntryStack { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True when the host produced no stack at all
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn setup_frame(trace: &StackTrace, caller: Option<&Caller>, config: &MarkerConfig) -> Option<usize> {
    let frames = trace.frames();

    let internal = |f: &Frame| f.symbol_starts_with(config.internal_prefixes.as_slice());

    // own frames can share file and line with the caller (src/lib.rs:N in both)
    if let Some(caller) = caller {
        let hit = frames
            .iter()
            .position(|f| !internal(f) && f.location().is_some_and(|l| caller.matches(&l)));
        if hit.is_some() {
            return hit;
        }
        debug!(%caller, "caller position not found in stack, falling back to frame names");
    }

    frames.iter().position(|f| !internal(f))
}

impl fmt::Display for EntryStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for EntryStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntryStack").field(&self.text).finish()
    }
}
