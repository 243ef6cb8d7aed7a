//! Locating the caller by walking the stack.
//!
//! This is an alternative to `#[track_caller]` for programs that call the
//! printer through functions they cannot annotate. It needs debug info to
//! resolve file and line numbers.

use std::borrow::Cow;

use crate::CallSite;

/// Finds the first stack frame outside of a set of crates.
///
/// Frames are skipped while their symbol belongs to one of
/// [`skipped_initial_crates`](Self::skipped_initial_crates). After that,
/// [`skip_frames`](Self::skip_frames) more frames with a source location are
/// skipped, which accounts for wrapper functions between the user's call and
/// the printer. The next frame is the reported call site.
///
/// ```rust
/// use dbgx_introspect::BacktraceLocator;
///
/// let locator = BacktraceLocator {
///     skip_frames: 1,
///     ..BacktraceLocator::DEFAULT
/// };
/// let site = locator.locate();
/// println!("called from {site}");
/// ```
#[derive(Copy, Clone, Debug)]
pub struct BacktraceLocator {
    /// Crate names whose frames are skipped at the top of the stack.
    pub skipped_initial_crates: &'static [&'static str],
    /// Number of frames to skip after the initial crates.
    pub skip_frames: usize,
}

impl BacktraceLocator {
    /// Skips the printer itself, the unwinder and the standard library.
    pub const DEFAULT: Self = Self {
        skipped_initial_crates: &[
            "backtrace",
            "dbgx",
            "dbgx_introspect",
            "core",
            "std",
            "alloc",
        ],
        skip_frames: 0,
    };

    /// Walks the current stack and returns the first frame that is not
    /// skipped, or [`CallSite::unknown()`] if there is none.
    #[inline(never)]
    #[must_use]
    pub fn locate(&self) -> CallSite {
        let mut initial_filtering = !self.skipped_initial_crates.is_empty();
        let mut remaining = self.skip_frames;
        let mut site: Option<CallSite> = None;

        ::backtrace::trace(|frame| {
            ::backtrace::resolve_frame(frame, |symbol| {
                if site.is_some() {
                    return;
                }
                let Some(sym) = symbol.name() else {
                    return;
                };
                if initial_filtering {
                    if self.is_skipped(&format!("{sym:#}")) {
                        return;
                    }
                    initial_filtering = false;
                }

                let (Some(path), Some(line)) = (symbol.filename(), symbol.lineno()) else {
                    return;
                };
                if remaining > 0 {
                    remaining -= 1;
                    return;
                }
                site = Some(CallSite {
                    file: Cow::Owned(path.to_string_lossy().into_owned()),
                    line,
                    column: symbol.colno(),
                });
            });

            site.is_none()
        });

        site.unwrap_or_else(|| {
            tracing::debug!(
                skip_frames = self.skip_frames,
                "no stack frame outside the skipped crates"
            );
            CallSite::unknown()
        })
    }

    fn is_skipped(&self, sym_demangled: &str) -> bool {
        sym_demangled
            .trim_start_matches('<')
            .split("::")
            .next()
            .is_some_and(|name| self.skipped_initial_crates.contains(&name))
    }
}

impl Default for BacktraceLocator {
    fn default() -> Self {
        Self::DEFAULT
    }
}
