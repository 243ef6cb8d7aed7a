//! The configurable printer behind [`dbg`](crate::dbg) and
//! [`dbg_to`](crate::dbg_to).

use std::{borrow::Cow, io};

#[cfg(feature = "backtrace")]
use dbgx_introspect::BacktraceLocator;
use dbgx_introspect::{CallSite, EntryPoint, find_call_arguments};

use crate::{Dump, Dumper, report};

/// How a [`Printer`] finds the call it reports on.
#[derive(Copy, Clone, Debug, Default)]
pub enum Locator {
    /// `#[track_caller]` propagation. Wrappers around the printer must be
    /// `#[track_caller]` themselves for the user's line to be reported.
    #[default]
    Caller,
    /// Walk the stack and report the first frame outside the skipped crates.
    #[cfg(feature = "backtrace")]
    #[cfg_attr(docsrs, doc(cfg(feature = "backtrace")))]
    Backtrace(BacktraceLocator),
}

impl Locator {
    /// Returns the call site of the user's call.
    #[track_caller]
    #[must_use]
    pub fn locate(&self) -> CallSite {
        match self {
            Self::Caller => CallSite::caller(),
            #[cfg(feature = "backtrace")]
            Self::Backtrace(locator) => locator.locate(),
        }
    }
}

/// Prints values together with the source text they were written as.
///
/// [`Printer::DEFAULT`] is what [`dbg`](crate::dbg) and
/// [`dbg_to`](crate::dbg_to) use. A customized printer is built from it:
///
/// ```rust
/// use dbgx::{Dump, Dumper, EntryPoint, Printer};
///
/// #[track_caller]
/// fn trace(values: &[&dyn Dump]) {
///     Printer::new()
///         .with_entry_point(EntryPoint::new("trace", 0))
///         .with_dumper(Dumper {
///             pretty: false,
///             ..Dumper::DEFAULT
///         })
///         .print_to(&mut std::io::stderr(), values);
/// }
///
/// let retries = 3;
/// trace(&[&retries]);
/// ```
#[derive(Clone, Debug)]
pub struct Printer {
    entry_points: Cow<'static, [EntryPoint]>,
    dumper: Dumper,
    locator: Locator,
}

impl Printer {
    /// The functions and macros of this crate whose calls are recognized.
    pub const ENTRY_POINTS: &'static [EntryPoint] = &[
        EntryPoint::new("dbg", 0),
        EntryPoint::new("dbg_to", 1),
        EntryPoint::new("print", 0),
        EntryPoint::new("print_to", 1),
    ];

    /// Recognizes [`ENTRY_POINTS`](Self::ENTRY_POINTS), dumps with
    /// [`Dumper::DEFAULT`] and locates with [`Locator::Caller`].
    pub const DEFAULT: Self = Self {
        entry_points: Cow::Borrowed(Self::ENTRY_POINTS),
        dumper: Dumper::DEFAULT,
        locator: Locator::Caller,
    };

    /// Creates a printer with the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Recognizes calls to `entry` in addition to the current entry points.
    ///
    /// Use this for your own `#[track_caller]` wrappers so that their
    /// arguments are named too.
    #[must_use]
    pub fn with_entry_point(mut self, entry: EntryPoint) -> Self {
        self.entry_points.to_mut().push(entry);
        self
    }

    /// Replaces the dumper.
    #[must_use]
    pub fn with_dumper(mut self, dumper: Dumper) -> Self {
        self.dumper = dumper;
        self
    }

    /// Replaces the locator.
    #[must_use]
    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    /// The recognized entry points.
    #[must_use]
    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.entry_points
    }

    /// The dumper in use.
    #[must_use]
    pub fn dumper(&self) -> Dumper {
        self.dumper
    }

    /// Prints `values` to standard output.
    #[track_caller]
    pub fn print(&self, values: &[&dyn Dump]) {
        self.print_to(&mut io::stdout().lock(), values);
    }

    /// Prints `values` to `w`.
    ///
    /// Write errors are logged and otherwise ignored.
    #[track_caller]
    pub fn print_to<W: io::Write + ?Sized>(&self, w: &mut W, values: &[&dyn Dump]) {
        let site = self.locator.locate();
        self.print_at(w, &site, values);
    }

    /// Prints `values` to `w` as if called from `site`.
    pub fn print_at<W: io::Write + ?Sized>(
        &self,
        w: &mut W,
        site: &CallSite,
        values: &[&dyn Dump],
    ) {
        let report = self.render(site, values);
        if let Err(error) = w.write_all(report.as_bytes()) {
            tracing::debug!(%error, "failed to write report");
        }
    }

    /// Returns the report for `values` as if called from `site`.
    #[must_use]
    pub fn render(&self, site: &CallSite, values: &[&dyn Dump]) -> String {
        let names = if values.is_empty() {
            Vec::new()
        } else {
            self.argument_names(site)
        };
        report::compose(site, &names, values, &self.dumper)
    }

    fn argument_names(&self, site: &CallSite) -> Vec<String> {
        match find_call_arguments(site, &self.entry_points) {
            Ok(names) => {
                tracing::trace!(
                    file = %site.file,
                    line = site.line,
                    ?names,
                    "recovered argument names"
                );
                names
            }
            Err(error) => {
                tracing::debug!(
                    file = %site.file,
                    line = site.line,
                    %error,
                    "argument names unavailable"
                );
                Vec::new()
            }
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_recognizes_the_crate_entry_points() {
        let names: Vec<_> = Printer::DEFAULT
            .entry_points()
            .iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, ["dbg", "dbg_to", "print", "print_to"]);
    }

    #[test]
    fn extra_entry_points_are_appended() {
        let printer = Printer::new().with_entry_point(EntryPoint::new("trace", 2));
        assert_eq!(printer.entry_points().len(), Printer::ENTRY_POINTS.len() + 1);
        assert_eq!(printer.entry_points().last(), Some(&EntryPoint::new("trace", 2)));
        assert_eq!(Printer::DEFAULT.entry_points().len(), Printer::ENTRY_POINTS.len());
    }

    #[test]
    fn renders_names_from_this_file() {
        let count = 7;
        let mut out = Vec::new();
        let line = line!() + 1;
        Printer::new().print_to(&mut out, &[&count]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("printer.rs:{line}: count = (i32) 7\n")
        );
    }

    #[test]
    fn locator_defaults_to_track_caller() {
        let site = Locator::default().locate();
        assert_eq!(site.line, line!() - 1);
    }

    struct FailingWriter;

    impl io::Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_errors_are_swallowed() {
        Printer::new().print_to(&mut FailingWriter, &[&1u8]);
    }
}
