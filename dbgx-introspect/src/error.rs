//! Reasons why argument names could not be recovered.

use std::{io, path::PathBuf};

/// Why the argument names of a call could not be recovered.
///
/// None of these are fatal. The printer logs them and falls back to dumping
/// the values without names.
#[derive(Debug, thiserror::Error)]
pub enum IntrospectError {
    /// The call site has no usable file or line.
    #[error("call site location is unavailable")]
    LocationUnavailable,

    /// The source file could not be found or read.
    #[error("failed to read source file {path}")]
    SourceUnreadable {
        /// The path that was tried last.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The source file contains syntax errors, or the parser gave up.
    #[error("source file {path} does not parse cleanly")]
    SourceUnparsable {
        /// The resolved path of the source file.
        path: PathBuf,
    },

    /// No call to a recognized entry point starts on the line.
    #[error("no recognized call on line {line}")]
    NoMatchingCall {
        /// The 1-based target line.
        line: u32,
    },

    /// The matched call passes its values as something other than a literal
    /// list, so there is nothing to name.
    #[error("arguments of the call on line {line} are not a literal list")]
    OpaqueArguments {
        /// The 1-based target line.
        line: u32,
    },

    /// Names were recovered but do not line up with the runtime values.
    #[error("recovered {names} argument name(s) for {values} value(s)")]
    ArgumentCountMismatch {
        /// Number of recovered names.
        names: usize,
        /// Number of runtime values.
        values: usize,
    },
}
