//! Call-site location.
//!
//! A [`CallSite`] names the physical source line a print call was made from.
//! The default way to obtain one is [`CallSite::caller()`], which relies on
//! `#[track_caller]` propagation: as long as every function between the
//! user's call and `CallSite::caller()` is `#[track_caller]`, the reported
//! location is the user's line no matter how many frames the entry point
//! adds.
//!
//! ```rust
//! use dbgx_introspect::CallSite;
//!
//! let site = CallSite::caller();
//! assert_eq!(site.line, line!() - 1);
//! assert!(site.is_known());
//! ```

use std::{borrow::Cow, fmt, path::Path};

/// Source code location of a print call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// The source file path, as recorded by the compiler or the debug info.
    pub file: Cow<'static, str>,
    /// The 1-based line number, or 0 when unknown.
    pub line: u32,
    /// The 1-based column, when known.
    pub column: Option<u32>,
}

impl CallSite {
    /// Captures the location of the outermost `#[track_caller]` call.
    #[track_caller]
    #[must_use]
    pub fn caller() -> Self {
        let location = core::panic::Location::caller();
        Self {
            file: Cow::Borrowed(location.file()),
            line: location.line(),
            column: Some(location.column()),
        }
    }

    /// A call site with no file and line 0.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            file: Cow::Borrowed(""),
            line: 0,
            column: None,
        }
    }

    /// Creates a call site for an explicit file and line.
    #[must_use]
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column: None,
        }
    }

    /// Returns a copy of this call site pinned to `column`.
    #[must_use]
    pub fn with_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }

    /// Whether the site points at an actual line of an actual file.
    ///
    /// A zero line also covers locations redacted with
    /// `-Zlocation-detail=none`.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !self.file.is_empty() && self.line != 0
    }

    /// The final component of [`file`](Self::file), or `""` when there is
    /// none.
    #[must_use]
    pub fn base_name(&self) -> Cow<'_, str> {
        Path::new(&*self.file)
            .file_name()
            .map_or(Cow::Borrowed(""), |name| name.to_string_lossy())
    }
}

impl Default for CallSite {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Formats as the report prefix, `file.rs:42:`.
impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:", self.base_name(), self.line)
    }
}
