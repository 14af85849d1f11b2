//! Helper functions for template rendering

/// Marker that introduces a macro parameter inside a macro body
pub(crate) const PARAMETER_MARKER: &str = "DTIG>";

/// Drop a trailing `\n[ \t]*` so a directive on its own line leaves no blank line
///
/// Text whose last non-blank character is not a newline is returned unchanged.
pub(crate) fn trim_directive_line(text: &str) -> &str {
    let without_indent = text.trim_end_matches([' ', '\t']);
    without_indent.strip_suffix('\n').unwrap_or(text)
}

/// Replace `DTIG>NAME` markers with the matching argument text
///
/// Single pass; when several parameter names match at one marker the longest
/// wins, so `DTIG>VALUE` is never read as `DTIG>VAL` followed by `UE`.
/// Markers naming no parameter are kept as they are.
pub(crate) fn substitute_parameters(body: &str, params: &[String], args: &[&str]) -> String {
    let mut output = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(found) = rest.find(PARAMETER_MARKER) {
        output.push_str(&rest[..found]);
        let after = &rest[found + PARAMETER_MARKER.len()..];

        let best = params
            .iter()
            .zip(args)
            .filter(|(param, _)| !param.is_empty() && after.starts_with(param.as_str()))
            .max_by_key(|(param, _)| param.len());

        match best {
            Some((param, arg)) => {
                output.push_str(arg);
                rest = &after[param.len()..];
            }
            None => {
                output.push_str(PARAMETER_MARKER);
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}
