//! Structural dumping of values.
//!
//! Every value is rendered as its type followed by its [`Debug`] output:
//!
//! ```text
//! (i32) 1
//! (Vec<String>) [
//!     "a",
//! ]
//! ```

use std::{
    borrow::Cow,
    fmt::{self, Debug},
    sync::OnceLock,
};

/// A value that can be dumped.
///
/// Implemented for every [`Debug`] type, so `&value as &dyn Dump` works for
/// anything printable with `{:?}`.
pub trait Dump {
    /// The full type name, as returned by [`core::any::type_name`].
    fn type_name(&self) -> &'static str;

    /// Formats the value with its [`Debug`] implementation.
    fn fmt_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: Debug + ?Sized> Dump for T {
    fn type_name(&self) -> &'static str {
        core::any::type_name::<T>()
    }

    fn fmt_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

struct AsDebug<'a>(&'a dyn Dump);

impl Debug for AsDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_debug(f)
    }
}

/// The rendering of a single value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DumpedValue {
    /// The rendered text, `(type) debug`.
    pub text: String,
}

impl DumpedValue {
    /// Whether the text spans several lines once surrounding whitespace is
    /// removed.
    #[must_use]
    pub fn is_multiline(&self) -> bool {
        self.text.trim().contains('\n')
    }
}

/// Renders values as `(type) debug`.
///
/// ```rust
/// use dbgx::Dumper;
///
/// let dumper = Dumper::DEFAULT;
/// assert_eq!(dumper.dump(&vec!["a"]).text, "(Vec<&str>) [\n    \"a\",\n]");
///
/// let compact = Dumper {
///     pretty: false,
///     ..Dumper::DEFAULT
/// };
/// assert_eq!(compact.dump(&vec!["a"]).text, "(Vec<&str>) [\"a\"]");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dumper {
    /// Use the alternate `{:#?}` format, which puts nested values on their
    /// own lines.
    pub pretty: bool,
    /// Strip module paths from type names, `alloc::string::String` becomes
    /// `String`.
    pub short_type_names: bool,
}

impl Dumper {
    /// Pretty output with short type names.
    pub const DEFAULT: Self = Self {
        pretty: true,
        short_type_names: true,
    };

    /// Renders a single value.
    #[must_use]
    pub fn dump(&self, value: &dyn Dump) -> DumpedValue {
        let type_name = if self.short_type_names {
            shorten_type_name(value.type_name())
        } else {
            Cow::Borrowed(value.type_name())
        };
        let text = if self.pretty {
            format!("({type_name}) {:#?}", AsDebug(value))
        } else {
            format!("({type_name}) {:?}", AsDebug(value))
        };
        DumpedValue { text }
    }

    /// Renders every value on its own line, each followed by a newline.
    #[must_use]
    pub fn dump_all(&self, values: &[&dyn Dump]) -> String {
        let mut out = String::new();
        for value in values {
            out.push_str(&self.dump(*value).text);
            out.push('\n');
        }
        out
    }
}

impl Default for Dumper {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn shorten_type_name(type_name: &str) -> Cow<'_, str> {
    static MODULE_PATH: OnceLock<regex::Regex> = OnceLock::new();
    let module_path = MODULE_PATH.get_or_init(|| {
        // Matches a run of `segment::` prefixes, e.g. `alloc::vec::`.
        regex::Regex::new(r"(?:[A-Za-z_][A-Za-z0-9_]*::)+")
            .expect("built-in regex pattern for module paths should be valid")
    });
    module_path.replace_all(type_name, "")
}
