//! Recovering the source text of call arguments.
//!
//! Given a parsed [`SourceFile`] and a target line, the extractor walks the
//! syntax tree depth-first in pre-order and collects the calls on that line
//! whose callee is one of the recognized [`EntryPoint`]s. Two call shapes are
//! understood:
//!
//! - function and method calls taking their values as a literal slice,
//!   `dbgx::dbg(&[&x, &y])`, `printer.print(&[&x])`;
//! - macro invocations, `dbgx::dbg!(x, y)`, whose token tree is parsed as
//!   a call argument list, or split on top-level commas when it is not one.
//!
//! The first recognized call in traversal order wins. When the call site
//! carries a column and one of the calls starts exactly there, that call
//! wins instead, which separates several calls on one line.

use tree_sitter::Node;

use crate::{IntrospectError, SourceFile};

/// A function or macro name whose calls should be recognized.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntryPoint {
    /// The final path segment of the callee, e.g. `dbg` for `dbgx::dbg`.
    pub name: &'static str,
    /// Number of leading arguments that are not values, e.g. the writer of
    /// `dbg_to(w, ...)`.
    pub leading_args: usize,
}

impl EntryPoint {
    /// Creates a new [`EntryPoint`].
    #[must_use]
    pub const fn new(name: &'static str, leading_args: usize) -> Self {
        Self { name, leading_args }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum CallForm {
    Function,
    Macro,
}

#[derive(Copy, Clone, Debug)]
struct RecognizedCall<'t> {
    node: Node<'t>,
    /// Where the compiler places the call: the method name for method calls,
    /// the start of the expression otherwise.
    anchor: Node<'t>,
    form: CallForm,
    entry: EntryPoint,
}

impl<'t> RecognizedCall<'t> {
    fn new(node: Node<'t>, text: &str, entry_points: &[EntryPoint]) -> Option<Self> {
        let (form, callee) = match node.kind() {
            "call_expression" => (CallForm::Function, node.child_by_field_name("function")?),
            "macro_invocation" => (CallForm::Macro, node.child_by_field_name("macro")?),
            _ => return None,
        };
        let (selector, anchor) = selector(callee, node)?;
        let name = node_text(selector, text)?;
        let entry = *entry_points.iter().find(|entry| entry.name == name)?;
        Some(Self {
            node,
            anchor,
            form,
            entry,
        })
    }

    fn arguments(&self, text: &str, line: u32) -> Result<Vec<String>, IntrospectError> {
        match self.form {
            CallForm::Function => function_arguments(self.node, self.entry, text, line),
            CallForm::Macro => macro_arguments(self.node, self.entry, text, line),
        }
    }
}

/// Returns the argument source texts of the recognized call on `line`.
///
/// `line` and `column` are 1-based, as reported by
/// [`core::panic::Location`]. Errors mean that names are unavailable; they
/// never indicate a problem with the caller's program.
pub fn extract_arguments(
    source: &SourceFile,
    line: u32,
    column: Option<u32>,
    entry_points: &[EntryPoint],
) -> Result<Vec<String>, IntrospectError> {
    let Some(row) = (line as usize).checked_sub(1) else {
        return Err(IntrospectError::LocationUnavailable);
    };
    let text = source.text();
    let calls = recognized_calls(source.tree().root_node(), row, text, entry_points);

    let by_column = column.and_then(|column| {
        calls
            .iter()
            .find(|call| column_of(call.anchor, text) == column as usize)
    });
    if by_column.is_none() && calls.len() > 1 {
        tracing::trace!(
            line,
            candidates = calls.len(),
            "several recognized calls on one line, using the first"
        );
    }
    let Some(call) = by_column.or(calls.first()) else {
        return Err(IntrospectError::NoMatchingCall { line });
    };

    call.arguments(text, line)
}

/// Pre-order walk collecting every recognized call anchored on `row`.
///
/// Subtrees that do not cover `row` are skipped; a call anchored on `row` is
/// always inside a subtree that covers it.
fn recognized_calls<'t>(
    root: Node<'t>,
    row: usize,
    text: &str,
    entry_points: &[EntryPoint],
) -> Vec<RecognizedCall<'t>> {
    let mut calls = Vec::new();
    let mut cursor = root.walk();

    'walk: loop {
        let node = cursor.node();
        if node.start_position().row <= row && row <= node.end_position().row {
            if let Some(call) = RecognizedCall::new(node, text, entry_points)
                && call.anchor.start_position().row == row
            {
                calls.push(call);
            }
            if cursor.goto_first_child() {
                continue;
            }
        }
        loop {
            if cursor.goto_next_sibling() {
                continue 'walk;
            }
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }

    calls
}

/// Finds the selector name of a callee together with the call's anchor.
fn selector<'t>(callee: Node<'t>, call: Node<'t>) -> Option<(Node<'t>, Node<'t>)> {
    match callee.kind() {
        "identifier" => Some((callee, call)),
        "scoped_identifier" => Some((callee.child_by_field_name("name")?, call)),
        "field_expression" => {
            let field = callee.child_by_field_name("field")?;
            Some((field, field))
        }
        "generic_function" => selector(callee.child_by_field_name("function")?, call),
        _ => None,
    }
}

fn function_arguments(
    call: Node<'_>,
    entry: EntryPoint,
    text: &str,
    line: u32,
) -> Result<Vec<String>, IntrospectError> {
    let opaque = || IntrospectError::OpaqueArguments { line };

    let arguments = call.child_by_field_name("arguments").ok_or_else(opaque)?;
    let mut cursor = arguments.walk();
    let values = arguments
        .named_children(&mut cursor)
        .filter(|node| is_expression(*node))
        .nth(entry.leading_args)
        .ok_or_else(opaque)?;

    let list = strip_borrow(values);
    if list.kind() != "array_expression" || list.child_by_field_name("length").is_some() {
        return Err(opaque());
    }

    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|node| is_expression(*node))
        .map(|element| {
            node_text(value_of(element), text)
                .map(str::to_owned)
                .ok_or_else(opaque)
        })
        .collect()
}

fn macro_arguments(
    invocation: Node<'_>,
    entry: EntryPoint,
    text: &str,
    line: u32,
) -> Result<Vec<String>, IntrospectError> {
    let opaque = || IntrospectError::OpaqueArguments { line };

    let mut cursor = invocation.walk();
    let tokens = invocation
        .children(&mut cursor)
        .find(|node| node.kind() == "token_tree")
        .ok_or_else(opaque)?;

    if let Some(arguments) = reparsed_arguments(tokens, text) {
        return Ok(arguments.into_iter().skip(entry.leading_args).collect());
    }
    tracing::trace!(line, "macro arguments are not expressions, splitting on commas");

    // Nested delimiters form their own token trees, so the only bare
    // delimiters here are the outer ones.
    let mut segments: Vec<Option<(usize, usize)>> = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    let mut cursor = tokens.walk();
    for token in tokens.children(&mut cursor) {
        match token.kind() {
            _ if token.is_extra() => {}
            "(" | ")" | "[" | "]" | "{" | "}" => {}
            "," => segments.push(current.take()),
            _ => {
                let start = current.map_or(token.start_byte(), |(start, _)| start);
                current = Some((start, token.end_byte()));
            }
        }
    }
    if current.is_some() {
        segments.push(current);
    }

    segments
        .into_iter()
        .skip(entry.leading_args)
        .map(|segment| {
            segment
                .and_then(|(start, end)| text.get(start..end))
                .map(str::to_owned)
                .ok_or_else(opaque)
        })
        .collect()
}

/// Parses the contents of a macro token tree as the argument list of a
/// function call.
///
/// Commas inside generics and closure parameters are not nested in a token
/// tree of their own, so only the parser can tell them apart from argument
/// separators. Returns `None` if the contents are not a list of expressions.
fn reparsed_arguments(tokens: Node<'_>, text: &str) -> Option<Vec<String>> {
    const PREFIX: &str = "fn f() { ";

    let open = tokens.child(0)?;
    let close = tokens.child(tokens.child_count().checked_sub(1)?)?;
    let inner = text.get(open.end_byte()..close.start_byte())?;

    let source = SourceFile::parse("", format!("{PREFIX}f({inner}); }}")).ok()?;
    let end = PREFIX.len() + "f(".len() + inner.len() + ")".len();
    let call = source
        .tree()
        .root_node()
        .descendant_for_byte_range(PREFIX.len(), end)?;
    if call.kind() != "call_expression" {
        return None;
    }

    let arguments = call.child_by_field_name("arguments")?;
    let mut cursor = arguments.walk();
    arguments
        .named_children(&mut cursor)
        .filter(|node| is_expression(*node))
        .map(|node| node_text(node, source.text()).map(str::to_owned))
        .collect()
}

fn is_expression(node: Node<'_>) -> bool {
    !node.is_extra() && node.kind() != "attribute_item"
}

fn strip_borrow(node: Node<'_>) -> Node<'_> {
    if node.kind() == "reference_expression"
        && let Some(value) = node.child_by_field_name("value")
    {
        value
    } else {
        node
    }
}

/// Sees through the `&x` and `&x as &dyn Dump` wrappers around a value.
fn value_of(element: Node<'_>) -> Node<'_> {
    let element = if element.kind() == "type_cast_expression"
        && let Some(value) = element.child_by_field_name("value")
        && value.kind() == "reference_expression"
    {
        value
    } else {
        element
    };
    strip_borrow(element)
}

fn node_text<'s>(node: Node<'_>, text: &'s str) -> Option<&'s str> {
    text.get(node.start_byte()..node.end_byte())
}

/// 1-based character column, matching [`core::panic::Location::column`].
fn column_of(node: Node<'_>, text: &str) -> usize {
    let start = node.start_byte();
    let line_start = start.saturating_sub(node.start_position().column);
    text.get(line_start..start)
        .map_or(0, |prefix| prefix.chars().count())
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY_POINTS: &[EntryPoint] = &[
        EntryPoint::new("dbg", 0),
        EntryPoint::new("dbg_to", 1),
        EntryPoint::new("print", 0),
    ];

    const SOURCE: &str = r#"fn main() {
    let x = 1;
    dbgx::dbg(&[&x, &"a"]);
    dbgx::dbg!(x + 1, foo(a, b),);
    dbgx::dbg_to(&mut out, &[&x]);
    dbgx::dbg_to!(&mut out, x, y);
    printer.print(&[&x]);
    dbgx::dbg(&values);
    dbgx::dbg(&[&x; 2]);
    let v = vec![1, 2];
    dbgx::dbg(&[&x]); dbgx::dbg(&[&x, &v]);
    dbgx::dbg(&[
        &Point {
            x: 1,
        },
        &x,
    ]);
    dbg(&[&x as &dyn Dump]);
    dbgx::dbg_to::<Vec<u8>>(&mut out, &[&x]);
    dbgx::dbg(&[&dbgx::dbg(&[&x])]);
    printer
        .print(&[&y]);
    dbgx::dbg!();
    dbgx::dbg!(HashMap::<u8, u8>::new(), x);
    dbgx::dbg_to!(&mut out, |a, b| a + b, Result::<u8, E>::Ok(1));
    dbgx::dbg!(%x, ?y);
}
"#;

    fn source() -> SourceFile {
        SourceFile::parse("main.rs", SOURCE).unwrap()
    }

    fn names(line: u32, column: Option<u32>) -> Result<Vec<String>, IntrospectError> {
        extract_arguments(&source(), line, column, ENTRY_POINTS)
    }

    #[test]
    fn slice_elements_are_named_without_borrows() {
        assert_eq!(names(3, None).unwrap(), ["x", r#""a""#]);
    }

    #[test]
    fn macro_arguments_split_on_top_level_commas() {
        assert_eq!(names(4, None).unwrap(), ["x + 1", "foo(a, b)"]);
    }

    #[test]
    fn writer_argument_is_not_a_value() {
        assert_eq!(names(5, None).unwrap(), ["x"]);
        assert_eq!(names(6, None).unwrap(), ["x", "y"]);
    }

    #[test]
    fn method_calls_match_on_the_method_name() {
        assert_eq!(names(7, None).unwrap(), ["x"]);
    }

    #[test]
    fn non_literal_value_lists_are_opaque() {
        assert!(matches!(
            names(8, None),
            Err(IntrospectError::OpaqueArguments { line: 8 })
        ));
        assert!(matches!(
            names(9, None),
            Err(IntrospectError::OpaqueArguments { line: 9 })
        ));
    }

    #[test]
    fn lines_without_recognized_calls_have_no_match() {
        assert!(matches!(
            names(10, None),
            Err(IntrospectError::NoMatchingCall { line: 10 })
        ));
        assert!(matches!(
            names(500, None),
            Err(IntrospectError::NoMatchingCall { line: 500 })
        ));
    }

    #[test]
    fn first_call_on_a_line_wins_without_a_column() {
        assert_eq!(names(11, None).unwrap(), ["x"]);
        assert_eq!(names(11, Some(99)).unwrap(), ["x"]);
    }

    #[test]
    fn column_selects_between_calls_on_one_line() {
        assert_eq!(names(11, Some(5)).unwrap(), ["x"]);
        assert_eq!(names(11, Some(23)).unwrap(), ["x", "v"]);
    }

    #[test]
    fn multi_line_arguments_keep_their_formatting() {
        assert_eq!(
            names(12, None).unwrap(),
            ["Point {\n            x: 1,\n        }", "x"]
        );
    }

    #[test]
    fn bare_and_turbofish_callees_are_recognized() {
        assert_eq!(names(18, None).unwrap(), ["x"]);
        assert_eq!(names(19, None).unwrap(), ["x"]);
    }

    #[test]
    fn nested_calls_prefer_the_outer_call() {
        assert_eq!(names(20, None).unwrap(), ["dbgx::dbg(&[&x])"]);
        assert_eq!(names(20, Some(18)).unwrap(), ["x"]);
    }

    #[test]
    fn method_chains_are_anchored_on_the_method_line() {
        assert!(matches!(
            names(21, None),
            Err(IntrospectError::NoMatchingCall { line: 21 })
        ));
        assert_eq!(names(22, None).unwrap(), ["y"]);
    }

    #[test]
    fn empty_macro_invocation_has_no_names() {
        assert!(names(23, None).unwrap().is_empty());
    }

    #[test]
    fn commas_inside_generics_do_not_split_macro_arguments() {
        assert_eq!(names(24, None).unwrap(), ["HashMap::<u8, u8>::new()", "x"]);
    }

    #[test]
    fn commas_inside_closure_parameters_do_not_split_macro_arguments() {
        assert_eq!(
            names(25, None).unwrap(),
            ["|a, b| a + b", "Result::<u8, E>::Ok(1)"]
        );
    }

    #[test]
    fn non_expression_macro_arguments_split_on_commas() {
        assert_eq!(names(26, None).unwrap(), ["%x", "?y"]);
    }

    #[test]
    fn line_zero_is_unavailable() {
        assert!(matches!(
            names(0, None),
            Err(IntrospectError::LocationUnavailable)
        ));
    }

    #[test]
    fn unrecognized_names_do_not_match() {
        let result = extract_arguments(&source(), 3, None, &[EntryPoint::new("show", 0)]);
        assert!(matches!(
            result,
            Err(IntrospectError::NoMatchingCall { line: 3 })
        ));
    }

    #[test]
    fn columns_count_characters() {
        let text = "fn f() { let é = 1; dbg(&[&é]); dbg(&[&é, &é]); }\n";
        let source = SourceFile::parse("u.rs", text).unwrap();
        let names = extract_arguments(&source, 1, Some(33), ENTRY_POINTS).unwrap();
        assert_eq!(names, ["é", "é"]);
    }
}
