#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A debug printer that prints values together with the expressions they
//! were written as.
//!
//! ## Quick Example
//!
//! ```rust
//! let width = 3;
//! let name = "box";
//! dbgx::dbg!(width, name, width * 2);
//! ```
//!
//! prints
//!
//! ```text
//! main.rs:3: width = (i32) 3, name = (&str) "box", width * 2 = (i32) 6
//! ```
//!
//! ## How it works
//!
//! At runtime a print call only sees evaluated values. To name them, dbgx
//! finds the file and line of the call, reads that source file from disk,
//! parses it, finds the print call on that line and takes the source text of
//! each argument. The details live in the [`introspect`] crate.
//!
//! Names are recovered on a best-effort basis. If the source file cannot be
//! read (for example a release binary running away from its sources), cannot
//! be parsed, or the call passes its values in a way that does not spell them
//! out, the values are printed without names:
//!
//! ```text
//! main.rs:3:(i32) 3
//! (&str) "box"
//! ```
//!
//! ## Entry points
//!
//! - [`dbg!`] and [`dbg_to!`] take the values directly.
//! - [`dbg()`] and [`dbg_to()`] take a literal slice, `dbgx::dbg(&[&a, &b])`.
//! - [`Printer`] configures the recognized entry points, the dumper and the
//!   locator, and has the same operations as methods.
//!
//! Every value is rendered by a [`Dumper`] as `(type) debug`, using the
//! pretty `{:#?}` format by default. Multi-line renderings are printed with
//! two spaces before every line break, so the output stays readable when
//! pasted into markdown.
//!
//! Every call re-reads and re-parses its source file. This is a tool for
//! debugging sessions, not for hot paths.
//!
//! ## Features
//!
//! - `backtrace`: adds `Locator::Backtrace`, which finds the call by walking
//!   the stack instead of through `#[track_caller]`.
//!
//! ## Logging
//!
//! The reason names could not be recovered is emitted as a `tracing` event at
//! debug level. Install a subscriber to see it.

use std::io;

#[doc(inline)]
pub use dbgx_introspect as introspect;
#[cfg(feature = "backtrace")]
#[cfg_attr(docsrs, doc(cfg(feature = "backtrace")))]
pub use dbgx_introspect::BacktraceLocator;
pub use dbgx_introspect::{CallSite, EntryPoint};

pub use self::{
    dump::{Dump, DumpedValue, Dumper},
    printer::{Locator, Printer},
};

mod dump;
mod macros;
mod printer;
mod report;

/// Prints `values` to standard output, each named by the expression it was
/// written as.
///
/// The values must be passed as a literal slice for their names to be found:
///
/// ```rust
/// let retries = 3;
/// let hosts = vec!["a", "b"];
/// dbgx::dbg(&[&retries, &hosts.len()]);
/// ```
///
/// The [`dbg!`] macro is usually more convenient.
#[track_caller]
pub fn dbg(values: &[&dyn Dump]) {
    Printer::DEFAULT.print(values);
}

/// Prints `values` to `w`, each named by the expression it was written as.
///
/// Write errors are ignored apart from a debug-level `tracing` event.
///
/// ```rust
/// let mut out = Vec::new();
/// let retries = 3;
/// dbgx::dbg_to(&mut out, &[&retries]);
/// assert!(String::from_utf8(out).unwrap().ends_with("(i32) 3\n"));
/// ```
#[track_caller]
pub fn dbg_to<W: io::Write + ?Sized>(w: &mut W, values: &[&dyn Dump]) {
    Printer::DEFAULT.print_to(w, values);
}
