//! Caller-location lookup.
//!
//! A record's `caller` field names the source line that invoked the logger,
//! as `directory/file:line`. Two strategies are available:
//!
//! - [`CallerLookup::Tracked`] asks the compiler: `log_event` is
//!   `#[track_caller]`, so [`Location::caller`] is the call site. Wrappers
//!   must also be `#[track_caller]` to stay transparent.
//! - [`CallerLookup::Backtrace`] captures a stack trace at a marker frame and
//!   walks outward from it. This needs debug info and is much slower.
//!
//! The two strategies spell the same file differently. `Tracked` reports the
//! path the compiler was given, relative to the workspace root
//! (`crates/app/src/main.rs:12`). `Backtrace` reports the path from debug
//! info as the standard library prints it, relative to the working directory
//! when possible (`./src/main.rs:12`).

use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::path::Path;

/// Symbol of the frame that captures the backtrace.
const MARKER_SYMBOL: &str = "event_log::caller::capture_marker";

/// Symbols of frames that belong to the logger itself.
const INTERNAL_SYMBOLS: &[&str] = &["event_log::caller::", "event_log::logger::EventLogger"];

/// How to find the caller frame.
///
/// See the module docs for how the reported paths differ between strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerLookup {
    /// Compiler-tracked call site (default).
    #[default]
    Tracked,
    /// Walk a captured backtrace.
    Backtrace(FrameSkip),
    /// Never report a caller.
    Disabled,
}

/// Which frame above the marker frame is the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSkip {
    /// First frame that is not part of the logger (default).
    #[default]
    FirstExternal,
    /// The frame this many positions above the marker; `0` is the marker's
    /// direct caller.
    Fixed(usize),
}

impl CallerLookup {
    /// Resolve the location of whoever called into the logger.
    ///
    /// Returns `None` when the location cannot be determined.
    #[must_use]
    #[track_caller]
    pub fn resolve(self) -> Option<CallerLocation> {
        match self {
            Self::Tracked => Some(CallerLocation::from_location(Location::caller())),
            Self::Backtrace(skip) => select_caller(&parse_backtrace(&capture_marker()), skip),
            Self::Disabled => None,
        }
    }
}

#[inline(never)]
fn capture_marker() -> String {
    Backtrace::force_capture().to_string()
}

/// A source file and line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerLocation {
    file: String,
    line: u32,
}

impl CallerLocation {
    /// Create a location.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Convert a compiler-provided location, dropping the column.
    #[must_use]
    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }

    /// Source file path as reported.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Line number.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for CallerLocation {
    /// Formats as `directory/basename:line`; a bare file name gets `.` as its
    /// directory.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = Path::new(&self.file);
        let directory = path
            .parent()
            .map(Path::to_string_lossy)
            .filter(|dir| !dir.is_empty())
            .unwrap_or(Cow::Borrowed("."));
        let file = path
            .file_name()
            .map_or(Cow::Borrowed(self.file.as_str()), |name| name.to_string_lossy());
        write!(f, "{directory}/{file}:{}", self.line)
    }
}

/// One frame of a rendered backtrace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Frame number; inlined symbols share the number of their host frame.
    pub index: usize,
    /// Demangled symbol name.
    pub symbol: String,
    /// Source location, when debug info had one.
    pub location: Option<CallerLocation>,
}

impl StackFrame {
    fn is_marker(&self) -> bool {
        has_path(&self.symbol, MARKER_SYMBOL)
    }

    fn is_internal(&self) -> bool {
        INTERNAL_SYMBOLS
            .iter()
            .any(|internal| has_path(&self.symbol, internal))
    }
}

/// Whether `symbol` mentions the item path `path` as a whole path, at the
/// start of the symbol or right after `<` or a space (`<T as path::Trait>`).
fn has_path(symbol: &str, path: &str) -> bool {
    symbol.match_indices(path).any(|(start, _)| {
        symbol[..start]
            .chars()
            .next_back()
            .is_none_or(|prev| prev == '<' || prev == ' ')
    })
}

/// Parse the text form of [`std::backtrace::Backtrace`] into frames,
/// innermost first.
///
/// Symbol lines look like `  3: crate::module::function`; inlined symbols
/// follow without a number. Location lines look like
/// `at src/lib.rs:10:5` and attach to the symbol above them. Anything else
/// before the first frame is ignored.
#[must_use]
pub fn parse_backtrace(text: &str) -> Vec<StackFrame> {
    let mut frames: Vec<StackFrame> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut()
                && frame.location.is_none()
            {
                frame.location = parse_location(location);
            }
            continue;
        }

        let numbered = line
            .split_once(':')
            .and_then(|(index, symbol)| Some((index.trim().parse::<usize>().ok()?, symbol)));

        match (numbered, frames.last()) {
            (Some((index, symbol)), _) => frames.push(StackFrame {
                index,
                symbol: symbol.trim().to_string(),
                location: None,
            }),
            (None, Some(previous)) => {
                let index = previous.index;
                frames.push(StackFrame {
                    index,
                    symbol: line.to_string(),
                    location: None,
                });
            },
            (None, None) => {},
        }
    }

    frames
}

/// Parse `path:line` or `path:line:column`. The path may contain `:`.
fn parse_location(text: &str) -> Option<CallerLocation> {
    let (head, last) = text.trim().rsplit_once(':')?;
    let last = last.parse::<u32>().ok()?;

    let (file, line) = match head.rsplit_once(':') {
        Some((file, line)) => match line.parse::<u32>() {
            Ok(line) => (file, line),
            Err(_) => (head, last),
        },
        None => (head, last),
    };

    if file.is_empty() {
        return None;
    }
    Some(CallerLocation::new(file, line))
}

/// Pick the caller frame out of a parsed backtrace.
///
/// Returns `None` when the marker frame is missing, the trace is too short,
/// or the chosen frame has no source location.
#[must_use]
pub fn select_caller(frames: &[StackFrame], skip: FrameSkip) -> Option<CallerLocation> {
    let marker = frames
        .iter()
        .position(StackFrame::is_marker)?;
    let outer = frames.get(marker.checked_add(1)?..)?;

    let frame = match skip {
        FrameSkip::Fixed(depth) => outer.get(depth)?,
        FrameSkip::FirstExternal => outer.iter().find(|frame| !frame.is_internal())?,
    };
    frame.location.clone()
}
