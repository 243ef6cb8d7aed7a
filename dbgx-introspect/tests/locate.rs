//! Locating calls in this file and recovering their arguments from disk.

use std::fmt::Debug;

use dbgx_introspect::{CallSite, EntryPoint, IntrospectError, find_call_arguments};

const ENTRY_POINTS: &[EntryPoint] = &[
    EntryPoint::new("show", 0),
    EntryPoint::new("show_to", 1),
];

#[track_caller]
fn show(_values: &[&dyn Debug]) -> Result<Vec<String>, IntrospectError> {
    find_call_arguments(&CallSite::caller(), ENTRY_POINTS)
}

#[track_caller]
fn show_to(_out: &mut Vec<u8>, values: &[&dyn Debug]) -> Result<Vec<String>, IntrospectError> {
    show(values)
}

#[derive(Debug)]
struct Rect {
    width: u32,
    height: u32,
}

#[test]
fn recovers_names_from_this_file() {
    let width = 4;
    let rect = Rect {
        width: 2,
        height: 3,
    };
    let names = show(&[&width, &rect.height, &(width * rect.width)]).unwrap();
    assert_eq!(names, ["width", "rect.height", "(width * rect.width)"]);
}

#[test]
fn wrapped_calls_report_the_outer_line() {
    let mut out = Vec::new();
    let label = "area";
    // `show_to` forwards to `show`, but the location stays on this line.
    let names = show_to(&mut out, &[&label]).unwrap();
    assert_eq!(names, ["label"]);
}

#[test]
fn multi_line_calls_are_found_from_their_first_line() {
    let a = 1;
    let b = [1, 2, 3];
    let names = show(&[
        &a,
        &b.iter()
            .map(|v| v * 2)
            .sum::<i32>(),
    ])
    .unwrap();
    assert_eq!(
        names,
        ["a", "b.iter()\n            .map(|v| v * 2)\n            .sum::<i32>()"]
    );
}

#[test]
fn opaque_value_lists_are_reported() {
    let a = 1;
    let values: [&dyn Debug; 1] = [&a];
    let error = show(&values).unwrap_err();
    assert!(matches!(error, IntrospectError::OpaqueArguments { .. }));
}

#[test]
fn unreadable_sources_are_reported() {
    let site = CallSite::new("does/not/exist.rs", 7);
    let error = find_call_arguments(&site, ENTRY_POINTS).unwrap_err();
    assert!(matches!(error, IntrospectError::SourceUnreadable { .. }));
}

#[test]
fn unknown_locations_are_reported() {
    let error = find_call_arguments(&CallSite::unknown(), ENTRY_POINTS).unwrap_err();
    assert!(matches!(error, IntrospectError::LocationUnavailable));
}

#[cfg(feature = "backtrace")]
#[test]
fn backtrace_locator_finds_this_function() {
    let site = dbgx_introspect::BacktraceLocator::DEFAULT.locate();
    assert_eq!(site.line, line!() - 1);
    assert_eq!(site.base_name(), "locate.rs");
}

static_assertions::assert_impl_all!(CallSite: Send, Sync, Clone, Default);
static_assertions::assert_impl_all!(EntryPoint: Copy, Send, Sync);
static_assertions::assert_impl_all!(IntrospectError: Send, Sync, std::error::Error);
