//! # Stack trace text
//!
//! Splits the text a host runtime prints for a stack trace into an optional
//! header and an ordered list of frames. Frames are kept as their original
//! lines so that an entry stack can be re-joined byte for byte.
//!
//! Two layouts are understood:
//! - numbered, as printed by `std::backtrace::Backtrace`:
//!   ```text
//!      4: app::outer
//!                at ./src/main.rs:12:5
//!   ```
//! - one frame per line after a header line:
//!   ```text
//!   Error: boom
//!       at outer (src/main.js:12:5)
//!   ```

/// Source position printed next to a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLocation {
    pub file: String,
    pub line: u32,
    pub column: Option<u32>,
}

impl FrameLocation {
    /// Parse `path:line[:col]`, optionally wrapped as `name (path:line:col)`
    pub fn parse(text: &str) -> Option<Self> {
        let mut text = text.trim();
        if let Some(inner) = text.strip_suffix(')') {
            let open = inner.rfind('(')?;
            text = &inner[open + 1..];
        }

        let (rest, last) = text.rsplit_once(':')?;
        let last: u32 = last.parse().ok()?;

        match rest.rsplit_once(':') {
            Some((file, line)) if !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()) => {
                Some(FrameLocation {
                    file: file.to_string(),
                    line: line.parse().ok()?,
                    column: Some(last),
                })
            }
            _ if !rest.is_empty() => Some(FrameLocation {
                file: rest.to_string(),
                line: last,
                column: None,
            }),
            _ => None,
        }
    }
}

/// One frame of a stack trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    fn new(first: &str) -> Self {
        Frame {
            lines: vec![first.to_string()],
        }
    }

    /// Raw lines of this frame, first line first
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The function name this frame describes, if the first line has one
    pub fn symbol(&self) -> Option<&str> {
        let first = self.lines.first()?.trim();
        let symbol = match numbered_symbol(first) {
            Some(symbol) => symbol,
            None => first.strip_prefix("at ").unwrap_or(first),
        };
        let symbol = symbol.trim();
        if symbol.is_empty() {
            None
        } else {
            Some(symbol)
        }
    }

    /// The first source position found among this frame's lines
    pub fn location(&self) -> Option<FrameLocation> {
        self.lines.iter().find_map(|line| {
            let line = line.trim();
            let rest = line.strip_prefix("at ")?;
            FrameLocation::parse(rest)
        })
    }

    /// Whether the symbol starts with any of the given prefixes
    pub fn symbol_starts_with<S: AsRef<str>>(&self, prefixes: &[S]) -> bool {
        match self.symbol() {
            Some(symbol) => prefixes.iter().any(|p| symbol.starts_with(p.as_ref())),
            None => false,
        }
    }
}

/// A parsed stack trace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackTrace {
    header: Option<String>,
    frames: Vec<Frame>,
}

impl StackTrace {
    /// Parse stack trace text.
    ///
    /// Returns `None` when no frame can be recognised.
    pub fn parse(text: &str) -> Option<Self> {
        let trace = if text.lines().any(|l| numbered_symbol(l.trim()).is_some()) {
            Self::parse_numbered(text)
        } else {
            Self::parse_per_line(text)
        };

        if trace.frames.is_empty() {
            None
        } else {
            Some(trace)
        }
    }

    fn parse_numbered(text: &str) -> Self {
        let mut header: Vec<&str> = Vec::new();
        let mut frames: Vec<Frame> = Vec::new();

        for line in text.lines() {
            if numbered_symbol(line.trim()).is_some() {
                frames.push(Frame::new(line));
            } else if let Some(frame) = frames.last_mut() {
                if !line.trim().is_empty() {
                    frame.lines.push(line.to_string());
                }
            } else if !line.trim().is_empty() {
                header.push(line);
            }
        }

        StackTrace {
            header: if header.is_empty() {
                None
            } else {
                Some(header.join("\n"))
            },
            frames,
        }
    }

    fn parse_per_line(text: &str) -> Self {
        let mut lines = text.lines();
        let header = lines.next().map(str::to_string);
        let frames = lines
            .filter(|l| !l.trim().is_empty())
            .map(Frame::new)
            .collect();

        StackTrace { header, frames }
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Join the lines of the given frames back into text
    pub fn join(frames: &[Frame]) -> String {
        frames
            .iter()
            .flat_map(|f| f.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `"12: some::symbol"` -> `"some::symbol"`
fn numbered_symbol(line: &str) -> Option<&str> {
    let (index, symbol) = line.split_once(": ")?;
    if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
        Some(symbol)
    } else {
        None
    }
}
