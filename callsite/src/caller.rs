//! Caller detection.
//!
//! The public setup functions are `#[track_caller]`, so the location of the
//! user's call is known without inspecting the stack. It is used to pick the
//! exact frame that made the call when frame names alone are ambiguous.

use crate::stack::FrameLocation;
use std::fmt;
use std::panic::Location;

/// Source location of the code that called a setup function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    location: &'static Location<'static>,
}

impl Caller {
    /// The caller of the outermost `#[track_caller]` function on the stack.
    ///
    /// Always available in Rust, but callers must treat `None` as "unknown"
    /// rather than as a failure.
    #[track_caller]
    pub fn detect() -> Option<Caller> {
        Some(Caller {
            location: Location::caller(),
        })
    }

    pub fn file(&self) -> &'static str {
        self.location.file()
    }

    pub fn line(&self) -> u32 {
        self.location.line()
    }

    pub fn column(&self) -> u32 {
        self.location.column()
    }

    /// Whether a printed frame position refers to this call.
    ///
    /// Backtraces print paths relative to the working directory (`./src/..`)
    /// or absolute, while `Location` is relative to where the compiler ran,
    /// so files match when either path ends with the other at a `/`
    /// boundary.
    pub fn matches(&self, location: &FrameLocation) -> bool {
        if location.line != self.line() {
            return false;
        }
        let printed = normalize(&location.file);
        let own = normalize(self.file());
        if printed.is_empty() || own.is_empty() {
            return false;
        }
        path_suffix(&printed, &own) || path_suffix(&own, &printed)
    }
}

/// `suffix` is `path` or its trailing components
fn path_suffix(path: &str, suffix: &str) -> bool {
    match path.strip_suffix(suffix) {
        Some(rest) => rest.is_empty() || rest.ends_with('/'),
        None => false,
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file(), self.line(), self.column())
    }
}

fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.strip_prefix("./").unwrap_or(&path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_reports_this_file() {
        let caller = Caller::detect().unwrap();
        assert!(caller.file().ends_with("caller.rs"));
        assert_eq!(caller.to_string(), format!("{}:{}:{}", caller.file(), caller.line(), caller.column()));
    }

    #[test]
    fn test_matches_relative_and_absolute_paths() {
        let caller = Caller::detect().unwrap();
        let line = caller.line();

        let relative = FrameLocation {
            file: "./src/caller.rs".to_string(),
            line,
            column: Some(22),
        };
        assert!(caller.matches(&relative));

        let absolute = FrameLocation {
            file: format!("/home/dev/project/{}", caller.file()),
            line,
            column: None,
        };
        assert!(caller.matches(&absolute));
    }

    #[test]
    fn test_rejects_other_lines_and_files() {
        let caller = Caller::detect().unwrap();

        let other_line = FrameLocation {
            file: caller.file().to_string(),
            line: caller.line() + 1,
            column: None,
        };
        assert!(!caller.matches(&other_line));

        let other_file = FrameLocation {
            file: "src/marker.rs".to_string(),
            line: caller.line(),
            column: None,
        };
        assert!(!caller.matches(&other_file));
    }

    #[test]
    fn test_partial_component_does_not_match() {
        let caller = Caller::detect().unwrap();
        let name = caller.file().rsplit('/').next().unwrap();

        let longer_name = FrameLocation {
            file: format!("src/my{}", name),
            line: caller.line(),
            column: None,
        };
        assert!(!caller.matches(&longer_name));

        let same_name = FrameLocation {
            file: format!("/abs/{}", caller.file()),
            line: caller.line(),
            column: None,
        };
        assert!(caller.matches(&same_name));
    }

    #[test]
    fn test_path_suffix_boundaries() {
        assert!(path_suffix("tests/a.rs", "tests/a.rs"));
        assert!(path_suffix("crate/tests/a.rs", "tests/a.rs"));
        assert!(!path_suffix("mytests/a.rs", "tests/a.rs"));
        assert!(!path_suffix("tests/a.rs", "crate/tests/a.rs"));
    }
}
