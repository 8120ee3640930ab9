use super::syntax::{find_marker, Marker, Syntax};

/// Rewrite every echo tag in the given text as host code.
///
/// Runs the regular and escaped sub-passes. The pass whose opening tag is
/// longer always runs first, otherwise the shorter tag would match inside
/// the text of the longer one.
pub(crate) fn compile_echos(syntax: &Syntax, value: &str) -> String {
    let (content_begin, _) = syntax.content();
    let (escaped_begin, _) = syntax.escaped();

    if content_begin.len() > escaped_begin.len() {
        compile_escaped_echos(syntax, &compile_regular_echos(syntax, value))
    } else {
        compile_regular_echos(syntax, &compile_escaped_echos(syntax, value))
    }
}

/// Rewrite `{{ expression }}` as `<?php echo expression; ?>`.
///
/// An `@` immediately before the opening tag suppresses compilation and
/// emits the tag text without the `@`. A newline directly after the
/// closing tag is emitted doubled, which keeps the line layout of the
/// generated code roughly aligned with the source.
pub(crate) fn compile_regular_echos(syntax: &Syntax, value: &str) -> String {
    let finder = syntax.content_finder();
    let mut result = String::with_capacity(value.len());
    let mut cursor = 0;

    while let Some((begin, end)) = find_marker(finder, value, cursor, Marker::Open) {
        let Some((close_begin, close_end)) = find_marker(finder, value, end, Marker::Close)
        else {
            break;
        };

        let body = &value[end..close_begin];
        if body.is_empty() {
            result.push_str(&value[cursor..end]);
            cursor = end;
            continue;
        }

        if begin > cursor && value[..begin].ends_with('@') {
            result.push_str(&value[cursor..begin - 1]);
            result.push_str(&value[begin..close_end]);
            cursor = close_end;
            continue;
        }

        result.push_str(&value[cursor..begin]);
        result.push_str("<?php echo ");
        result.push_str(&compile_echo_defaults(body.trim()));
        result.push_str("; ?>");
        cursor = double_newline(&mut result, value, close_end);
    }
    result.push_str(&value[cursor..]);

    result
}

/// Rewrite `{{{ expression }}}` as `<?php echo escape(expression); ?>`.
///
/// The `escape()` helper must exist in the rendering environment. The
/// trailing newline rule matches the regular pass.
pub(crate) fn compile_escaped_echos(syntax: &Syntax, value: &str) -> String {
    let finder = syntax.escaped_finder();
    let mut result = String::with_capacity(value.len());
    let mut cursor = 0;

    while let Some((begin, end)) = find_marker(finder, value, cursor, Marker::Open) {
        let Some((close_begin, close_end)) = find_marker(finder, value, end, Marker::Close)
        else {
            break;
        };

        let body = &value[end..close_begin];
        if body.is_empty() {
            result.push_str(&value[cursor..end]);
            cursor = end;
            continue;
        }

        result.push_str(&value[cursor..begin]);
        result.push_str("<?php echo escape(");
        result.push_str(&compile_echo_defaults(body.trim()));
        result.push_str("); ?>");
        cursor = double_newline(&mut result, value, close_end);
    }
    result.push_str(&value[cursor..]);

    result
}

/// Expand the default-value operator.
///
/// An expression beginning with the variable sigil splits on the first
/// whitespace-delimited `or` into an isset check:
///
/// ```text
/// $name or "anonymous"  =>  isset($name) ? $name : "anonymous"
/// ```
///
/// Any other expression is returned unchanged.
pub(crate) fn compile_echo_defaults(expression: &str) -> String {
    if !expression.starts_with('$') {
        return expression.to_string();
    }

    let mut search = 0;
    while let Some(found) = expression[search..].find("or") {
        let at = search + found;
        search = at + 2;

        let before = &expression[..at];
        let after = &expression[at + 2..];
        if !before.ends_with(char::is_whitespace) || !after.starts_with(char::is_whitespace) {
            continue;
        }

        let left = before.trim_end();
        let right = after.trim_start();
        if left.is_empty() || right.is_empty() {
            continue;
        }

        return format!("isset({left}) ? {left} : {right}");
    }

    expression.to_string()
}

/// Emit the newline that directly follows a compiled tag twice.
///
/// Returns the position compilation should resume from.
fn double_newline(result: &mut String, value: &str, from: usize) -> usize {
    let rest = &value[from..];

    if rest.starts_with("\r\n") {
        result.push_str("\r\n\r\n");
        from + 2
    } else if rest.starts_with('\n') {
        result.push_str("\n\n");
        from + 1
    } else {
        from
    }
}
