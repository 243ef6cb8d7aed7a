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

//! Call-site introspection for the dbgx debug printer.
//!
//! A print call only ever receives evaluated values. This crate recovers the
//! source text those values were written as:
//!
//! 1. [`CallSite::caller()`] (or `BacktraceLocator` with the `backtrace`
//!    feature) finds the file and line of the user's call.
//! 2. [`SourceFile::load()`] reads that file and parses it with the
//!    tree-sitter Rust grammar.
//! 3. [`extract_arguments()`] finds the call to a recognized [`EntryPoint`] on
//!    that line and returns the source text of each argument.
//!
//! [`find_call_arguments()`] runs steps 2 and 3 for a call site.
//!
//! ```rust
//! use dbgx_introspect::{CallSite, EntryPoint, find_call_arguments};
//!
//! #[track_caller]
//! fn show(_values: &[&dyn std::fmt::Debug]) -> Vec<String> {
//!     let site = CallSite::caller();
//!     find_call_arguments(&site, &[EntryPoint::new("show", 0)]).unwrap_or_default()
//! }
//!
//! let width = 3;
//! let names = show(&[&width, &(width * 2)]);
//! # let _ = names;
//! ```
//!
//! Every step is redone per call: the file is read and parsed again each
//! time, nothing is cached.

#[cfg(feature = "backtrace")]
#[cfg_attr(docsrs, doc(cfg(feature = "backtrace")))]
mod backtrace;
mod error;
mod extract;
mod location;
mod source;

#[cfg(feature = "backtrace")]
pub use self::backtrace::BacktraceLocator;
pub use self::{
    error::IntrospectError,
    extract::{EntryPoint, extract_arguments},
    location::CallSite,
    source::SourceFile,
};

/// Recovers the argument source texts of the recognized call at `site`.
///
/// Reads and parses the file named by the call site, then defers to
/// [`extract_arguments()`].
pub fn find_call_arguments(
    site: &CallSite,
    entry_points: &[EntryPoint],
) -> Result<Vec<String>, IntrospectError> {
    if !site.is_known() {
        return Err(IntrospectError::LocationUnavailable);
    }
    let source = SourceFile::load(&site.file)?;
    extract_arguments(&source, site.line, site.column, entry_points)
}
