//! Composing the printed report.

use dbgx_introspect::{CallSite, IntrospectError};

use crate::{Dump, Dumper};

/// Composes the report for `values` printed at `site`.
///
/// `names` pairs up with `values` by position. When the counts differ, the
/// names are dropped entirely and the values are dumped without them.
pub(crate) fn compose(
    site: &CallSite,
    names: &[String],
    values: &[&dyn Dump],
    dumper: &Dumper,
) -> String {
    let mut out = site.to_string();
    if values.is_empty() {
        out.push('\n');
        return out;
    }

    if names.len() != values.len() {
        if !names.is_empty() {
            let error = IntrospectError::ArgumentCountMismatch {
                names: names.len(),
                values: values.len(),
            };
            tracing::debug!(
                file = %site.file,
                line = site.line,
                %error,
                "discarding argument names"
            );
        }
        out.push_str(&dumper.dump_all(values));
        return out;
    }

    let last = values.len() - 1;
    for (index, (name, value)) in names.iter().zip(values).enumerate() {
        let dumped = dumper.dump(*value);
        let multiline = dumped.is_multiline();
        // Two trailing spaces keep continuation lines as hard line breaks in
        // markdown viewers.
        let text = dumped.text.trim().replace('\n', "  \n");
        out.push(' ');
        out.push_str(name);
        out.push_str(" = ");
        out.push_str(&text);
        out.push(if multiline || index == last { '\n' } else { ',' });
    }
    out
}
