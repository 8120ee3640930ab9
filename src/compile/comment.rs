use super::syntax::{find_marker, Marker, Syntax};

/// Rewrite every template comment as a host-code comment.
///
/// The body is preserved verbatim inside `/* ... */`, so the note
/// survives for debugging but is never executed or echoed. Matching is
/// non-greedy: a comment ends at the first closing marker, and comments
/// may span multiple lines. An unterminated comment is left alone.
pub(crate) fn compile_comments(syntax: &Syntax, value: &str) -> String {
    let finder = syntax.comment_finder();
    let mut result = String::with_capacity(value.len());
    let mut cursor = 0;

    while let Some((begin, end)) = find_marker(finder, value, cursor, Marker::Open) {
        let Some((close_begin, close_end)) = find_marker(finder, value, end, Marker::Close)
        else {
            break;
        };

        result.push_str(&value[cursor..begin]);
        result.push_str("<?php /*");
        result.push_str(&value[end..close_begin]);
        result.push_str("*/ ?>");
        cursor = close_end;
    }
    result.push_str(&value[cursor..]);

    result
}

#[cfg(test)]
mod tests {
    use super::compile_comments;
    use crate::compile::Builder;

    #[test]
    fn test_comment() {
        assert_eq!(
            helper_compile_comments("a {{-- note --}} b"),
            "a <?php /* note */ ?> b"
        );
    }

    #[test]
    fn test_multiline_comment() {
        assert_eq!(
            helper_compile_comments("{{--\n  draft\n--}}"),
            "<?php /*\n  draft\n*/ ?>"
        );
    }

    #[test]
    fn test_comment_non_greedy() {
        assert_eq!(
            helper_compile_comments("{{-- a --}}x{{-- b --}}"),
            "<?php /* a */ ?>x<?php /* b */ ?>"
        );
    }

    #[test]
    fn test_unterminated_comment() {
        assert_eq!(helper_compile_comments("{{-- open"), "{{-- open");
    }

    /// Compile the given text with the default Syntax.
    fn helper_compile_comments(value: &str) -> String {
        compile_comments(&Builder::new().to_syntax(), value)
    }
}
