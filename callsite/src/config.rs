//! Marker configuration
//!
//! Decides which frames count as this library's own and which ones are
//! runtime plumbing to be dropped from an entry stack.

use crate::error::{self, Result};
use serde::{Deserialize, Serialize};

/// Symbol prefixes of frames that belong to stack capture itself
pub const DEFAULT_INTERNAL_PREFIXES: &[&str] = &[
    crate::CRATE_PREFIX,
    crate::CRATE_IMPL_PREFIX,
    "std::backtrace",
    "std::backtrace_rs",
    "<std::backtrace::Backtrace",
    "backtrace::",
];

/// Symbol prefixes of runtime frames that say nothing about user code
pub const DEFAULT_RUNTIME_PREFIXES: &[&str] = &[
    "std::rt::",
    "std::panicking::",
    "std::panic::catch_unwind",
    "core::ops::function::",
    "<alloc::boxed::Box<F,A> as core::ops::function::",
    "std::sys::backtrace::",
    "std::sys_common::backtrace::",
    "__rust_",
    "__rustc::",
    "<fn(",
    "__libc_start",
    "_start",
    "test::",
    "tokio::runtime::",
];

/// Frame selection settings for a marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Frames whose symbol starts with one of these are skipped when looking
    /// for the call into setup
    pub internal_prefixes: Vec<String>,
    /// Frames whose symbol starts with one of these are removed from the
    /// entry stack when `clean` is set
    pub runtime_prefixes: Vec<String>,
    pub clean: bool,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        MarkerConfig {
            internal_prefixes: DEFAULT_INTERNAL_PREFIXES.iter().map(|p| p.to_string()).collect(),
            runtime_prefixes: DEFAULT_RUNTIME_PREFIXES.iter().map(|p| p.to_string()).collect(),
            clean: true,
        }
    }
}

impl MarkerConfig {
    /// Treat frames of another crate (e.g. a wrapper around markers) as internal
    pub fn with_internal_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.internal_prefixes.push(prefix.into());
        self
    }

    pub fn with_runtime_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.runtime_prefixes.push(prefix.into());
        self
    }

    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// An empty prefix would match every frame
    pub fn validate(&self) -> Result<()> {
        if self.internal_prefixes.iter().any(|p| p.is_empty()) {
            return Err(error::empty_prefix("internal_prefixes"));
        }
        if self.runtime_prefixes.iter().any(|p| p.is_empty()) {
            return Err(error::empty_prefix("runtime_prefixes"));
        }
        Ok(())
    }

    /// Load and validate a config from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: MarkerConfig = serde_json::from_str(json).map_err(error::config_parse_failed)?;
        config.validate()?;
        Ok(config)
    }
}
