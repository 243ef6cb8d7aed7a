/// Prints values to standard output, each named by the expression it was
/// written as.
///
/// Unlike [`std::dbg!`], the values are only borrowed and nothing is returned.
/// Every value must implement [`Debug`](std::fmt::Debug).
///
/// # Examples
///
/// ```
/// let a = 1;
/// let b = "two";
/// dbgx::dbg!(a, b, a + 2);
/// // lib.rs:4: a = (i32) 1, b = (&str) "two", a + 2 = (i32) 3
///
/// dbgx::dbg!();
/// // lib.rs:7:
/// ```
#[macro_export]
macro_rules! dbg {
    ($($value:expr),* $(,)?) => {
        $crate::dbg(&[$(&$value as &dyn $crate::Dump),*])
    };
}

/// Prints values to a writer, each named by the expression it was written
/// as.
///
/// The first argument is the writer, any `&mut impl std::io::Write`.
///
/// # Examples
///
/// ```
/// let mut out = Vec::new();
/// let total = 2 + 2;
/// dbgx::dbg_to!(&mut out, total);
/// assert!(String::from_utf8(out).unwrap().ends_with("(i32) 4\n"));
/// ```
#[macro_export]
macro_rules! dbg_to {
    ($w:expr $(, $value:expr)* $(,)?) => {
        $crate::dbg_to($w, &[$(&$value as &dyn $crate::Dump),*])
    };
}
