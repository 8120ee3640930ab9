use super::Scratch;
use crate::{compiler::Compiler, directive::Directive};

use std::collections::HashMap;

/// Rewrite every directive in the given text through the compiler's
/// dispatch table.
///
/// A directive is an `@` that does not directly follow a word character,
/// a name, optional horizontal whitespace, and an optional
/// balanced-parenthesis argument string. Names with no registered
/// [`Directive`] pass through verbatim, arguments included, so prose
/// like an email address is never mangled.
pub(crate) fn compile_statements(
    compiler: &Compiler,
    value: &str,
    scratch: &mut Scratch,
) -> String {
    let mut result = String::with_capacity(value.len());
    let mut cursor = 0;
    let mut search = 0;

    while let Some(found) = value[search..].find('@') {
        let at = search + found;
        search = at + 1;

        // An `@` directly after a word character is prose, not a directive.
        if value[..at].chars().next_back().is_some_and(is_word) {
            continue;
        }

        let name_length = scan_name(&value[at + 1..]);
        if name_length == 0 {
            continue;
        }
        let name_end = at + 1 + name_length;
        let name = &value[at + 1..name_end];

        let whitespace_end = name_end
            + value[name_end..]
                .chars()
                .take_while(|c| matches!(c, ' ' | '\t'))
                .count();

        let (expression, match_end) = match scan_arguments(&value[whitespace_end..]) {
            Some(length) => (
                Some(&value[whitespace_end..whitespace_end + length]),
                whitespace_end + length,
            ),
            None => (None, whitespace_end),
        };

        result.push_str(&value[cursor..at]);
        match compiler.get_directive(name) {
            Some(directive) => {
                result.push_str(&directive.expand(expression, scratch));
                if expression.is_none() {
                    // Keep the captured whitespace after a bare directive.
                    result.push_str(&value[name_end..whitespace_end]);
                }
            }
            None => result.push_str(&value[at..match_end]),
        }
        cursor = match_end;
        search = match_end;
    }
    result.push_str(&value[cursor..]);

    result
}

/// Return the byte length of the identifier run at the start of `rest`.
fn scan_name(rest: &str) -> usize {
    let mut chars = rest.chars();
    let Some(first) = chars.next() else {
        return 0;
    };
    if !is_ident_start(first) {
        return 0;
    }

    first.len_utf8()
        + chars
            .take_while(|c| is_ident_continue(*c))
            .map(char::len_utf8)
            .sum::<usize>()
}

/// Return the byte length of the balanced-parenthesis argument string at
/// the start of `rest`, delimiters included.
///
/// Returns None when `rest` does not open with a parenthesis, or when the
/// parentheses never balance before the end of the text. In the second
/// case only the directive name is consumed and the unbalanced remainder
/// stays literal, deferring the failure to render time.
fn scan_arguments(rest: &str) -> Option<usize> {
    if !rest.starts_with('(') {
        return None;
    }

    let mut depth = 0usize;
    for (index, char) in rest.char_indices() {
        match char {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Return true if the given character is a word character, meaning the
/// `@` before it cannot begin a directive.
fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Return true if the given character is a recognized beginning identifier,
/// meaning '_' or an `xid_start`.
fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

/// Return true if the given character is a recognized continue identifier,
/// meaning an `xid_continue`.
fn is_ident_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// Strip one layer of parentheses from the given expression.
///
/// When the expression opens with `(`, the first and last characters are
/// dropped without checking that they pair up, which reproduces the
/// original include behavior exactly.
fn strip_parentheses(expression: &str) -> &str {
    match expression.strip_prefix('(') {
        Some(inner) => match inner.char_indices().next_back() {
            Some((index, _)) => &inner[..index],
            None => inner,
        },
        None => expression,
    }
}

/// Return the built-in directive table.
pub(crate) fn builtins() -> HashMap<String, Box<dyn Directive>> {
    let mut table: HashMap<String, Box<dyn Directive>> = HashMap::new();

    fn put<T>(table: &mut HashMap<String, Box<dyn Directive>>, name: &str, directive: T)
    where
        T: Directive + 'static,
    {
        table.insert(name.to_string(), Box::new(directive));
    }

    put(&mut table, "if", compile_if);
    put(&mut table, "elseif", compile_elseif);
    put(&mut table, "else", compile_else);
    put(&mut table, "endif", compile_endif);
    put(&mut table, "unless", compile_unless);
    put(&mut table, "endunless", compile_endif);
    put(&mut table, "for", compile_for);
    put(&mut table, "endfor", compile_endfor);
    put(&mut table, "foreach", compile_foreach);
    put(&mut table, "endforeach", compile_endforeach);
    put(&mut table, "forelse", compile_forelse);
    put(&mut table, "empty", compile_empty);
    put(&mut table, "endforelse", compile_endif);
    put(&mut table, "while", compile_while);
    put(&mut table, "endwhile", compile_endwhile);
    put(&mut table, "each", compile_each);
    put(&mut table, "include", compile_include);
    put(&mut table, "yield", compile_yield);
    put(&mut table, "section", compile_section);
    put(&mut table, "endsection", compile_stop);
    put(&mut table, "stop", compile_stop);
    put(&mut table, "show", compile_show);
    put(&mut table, "append", compile_append);
    put(&mut table, "overwrite", compile_overwrite);
    put(&mut table, "extends", compile_extends);

    table
}

fn compile_if(expression: Option<&str>, _: &mut Scratch) -> String {
    format!("<?php if{}: ?>", expression.unwrap_or_default())
}

fn compile_elseif(expression: Option<&str>, _: &mut Scratch) -> String {
    format!("<?php elseif{}: ?>", expression.unwrap_or_default())
}

fn compile_else(_: Option<&str>, _: &mut Scratch) -> String {
    "<?php else: ?>".to_string()
}

/// Shared by `@endif`, `@endunless` and `@endforelse`.
fn compile_endif(_: Option<&str>, _: &mut Scratch) -> String {
    "<?php endif; ?>".to_string()
}

fn compile_unless(expression: Option<&str>, _: &mut Scratch) -> String {
    format!("<?php if (!{}): ?>", expression.unwrap_or_default())
}

fn compile_for(expression: Option<&str>, _: &mut Scratch) -> String {
    format!("<?php for{}: ?>", expression.unwrap_or_default())
}

fn compile_endfor(_: Option<&str>, _: &mut Scratch) -> String {
    "<?php endfor; ?>".to_string()
}

fn compile_foreach(expression: Option<&str>, _: &mut Scratch) -> String {
    format!("<?php foreach{}: ?>", expression.unwrap_or_default())
}

fn compile_endforeach(_: Option<&str>, _: &mut Scratch) -> String {
    "<?php endforeach; ?>".to_string()
}

fn compile_forelse(expression: Option<&str>, scratch: &mut Scratch) -> String {
    let flag = format!("$__empty_{}", scratch.begin_forelse());

    format!(
        "<?php {flag} = true; foreach{}: {flag} = false; ?>",
        expression.unwrap_or_default()
    )
}

fn compile_empty(_: Option<&str>, scratch: &mut Scratch) -> String {
    format!("<?php endforeach; if ($__empty_{}): ?>", scratch.end_forelse())
}

fn compile_while(expression: Option<&str>, _: &mut Scratch) -> String {
    format!("<?php while{}: ?>", expression.unwrap_or_default())
}

fn compile_endwhile(_: Option<&str>, _: &mut Scratch) -> String {
    "<?php endwhile; ?>".to_string()
}

fn compile_each(expression: Option<&str>, _: &mut Scratch) -> String {
    format!(
        "<?php echo $__env->renderEach{}; ?>",
        expression.unwrap_or_default()
    )
}

fn compile_include(expression: Option<&str>, _: &mut Scratch) -> String {
    let expression = strip_parentheses(expression.unwrap_or_default());

    format!(
        "<?php echo $__env->make({expression}, \
        array_except(get_defined_vars(), array('__data', '__path')))->render(); ?>"
    )
}

fn compile_yield(expression: Option<&str>, _: &mut Scratch) -> String {
    format!(
        "<?php echo $__env->yieldContent{}; ?>",
        expression.unwrap_or_default()
    )
}

fn compile_section(expression: Option<&str>, _: &mut Scratch) -> String {
    format!(
        "<?php $__env->startSection{}; ?>",
        expression.unwrap_or_default()
    )
}

/// Shared by `@stop` and `@endsection`.
fn compile_stop(_: Option<&str>, _: &mut Scratch) -> String {
    "<?php $__env->stopSection(); ?>".to_string()
}

fn compile_show(_: Option<&str>, _: &mut Scratch) -> String {
    "<?php echo $__env->yieldSection(); ?>".to_string()
}

fn compile_append(_: Option<&str>, _: &mut Scratch) -> String {
    "<?php $__env->appendSection(); ?>".to_string()
}

fn compile_overwrite(_: Option<&str>, _: &mut Scratch) -> String {
    "<?php $__env->stopSection(true); ?>".to_string()
}

fn compile_extends(expression: Option<&str>, scratch: &mut Scratch) -> String {
    let line = compile_include(expression, scratch);
    scratch.push_footer(line);

    String::new()
}

#[cfg(test)]
mod tests {
    use super::{compile_statements, scan_arguments, strip_parentheses};
    use crate::{compile::Scratch, Compiler};

    #[test]
    fn test_if_block() {
        assert_eq!(
            helper_compile_statements("@if($x) a @endif"),
            "<?php if($x): ?> a <?php endif; ?>"
        );
    }

    #[test]
    fn test_elseif_else() {
        assert_eq!(
            helper_compile_statements("@if($x) a @elseif($y) b @else c @endif"),
            "<?php if($x): ?> a <?php elseif($y): ?> b <?php else: ?> c <?php endif; ?>"
        );
    }

    #[test]
    fn test_unless() {
        assert_eq!(
            helper_compile_statements("@unless($done) pending @endunless"),
            "<?php if (!($done)): ?> pending <?php endif; ?>"
        );
    }

    #[test]
    fn test_loops() {
        assert_eq!(
            helper_compile_statements("@for($i = 0; $i < 3; $i++) x @endfor"),
            "<?php for($i = 0; $i < 3; $i++): ?> x <?php endfor; ?>"
        );
        assert_eq!(
            helper_compile_statements("@foreach($users as $user) x @endforeach"),
            "<?php foreach($users as $user): ?> x <?php endforeach; ?>"
        );
        assert_eq!(
            helper_compile_statements("@while($more) x @endwhile"),
            "<?php while($more): ?> x <?php endwhile; ?>"
        );
    }

    #[test]
    fn test_directive_after_word_character_is_prose() {
        assert_eq!(helper_compile_statements("b@endif"), "b@endif");
    }

    #[test]
    fn test_forelse() {
        assert_eq!(
            helper_compile_statements("@forelse($users as $user) x @empty y @endforelse"),
            "<?php $__empty_1 = true; foreach($users as $user): $__empty_1 = false; ?> \
             x <?php endforeach; if ($__empty_1): ?> y <?php endif; ?>"
        );
    }

    #[test]
    fn test_forelse_nesting_allocates_distinct_flags() {
        let result = helper_compile_statements(
            "@forelse($lists as $list)\n@forelse($list as $item)\ni\n@empty\ninner\n\
             @endforelse\n@empty\nouter\n@endforelse",
        );

        assert_eq!(
            result,
            "<?php $__empty_1 = true; foreach($lists as $list): $__empty_1 = false; ?>\n\
             <?php $__empty_2 = true; foreach($list as $item): $__empty_2 = false; ?>\n\
             i\n<?php endforeach; if ($__empty_2): ?>\ninner\n<?php endif; ?>\n\
             <?php endforeach; if ($__empty_1): ?>\nouter\n<?php endif; ?>"
        );
    }

    #[test]
    fn test_sequential_forelse_reuses_first_flag() {
        let result = helper_compile_statements(
            "@forelse($a as $x)\n@empty\n@endforelse\n@forelse($b as $y)\n@empty\n@endforelse",
        );

        assert_eq!(result.matches("$__empty_1 = true").count(), 2);
        assert!(!result.contains("$__empty_2"));
    }

    #[test]
    fn test_each() {
        assert_eq!(
            helper_compile_statements("@each('partials.user', $users, 'user')"),
            "<?php echo $__env->renderEach('partials.user', $users, 'user'); ?>"
        );
    }

    #[test]
    fn test_include() {
        assert_eq!(
            helper_compile_statements("@include('partials.nav')"),
            "<?php echo $__env->make('partials.nav', \
            array_except(get_defined_vars(), array('__data', '__path')))->render(); ?>"
        );
    }

    #[test]
    fn test_yield_and_sections() {
        assert_eq!(
            helper_compile_statements("@yield('content')"),
            "<?php echo $__env->yieldContent('content'); ?>"
        );
        assert_eq!(
            helper_compile_statements("@section('head') x @stop"),
            "<?php $__env->startSection('head'); ?> x <?php $__env->stopSection(); ?>"
        );
        assert_eq!(
            helper_compile_statements("@section('head') x @show"),
            "<?php $__env->startSection('head'); ?> x <?php echo $__env->yieldSection(); ?>"
        );
    }

    #[test]
    fn test_unknown_directive_passes_through() {
        assert_eq!(
            helper_compile_statements("@unknownDirective(1,2)"),
            "@unknownDirective(1,2)"
        );
    }

    #[test]
    fn test_unknown_directive_keeps_arguments_uncompiled() {
        // The consumed argument string is never rescanned, so a known
        // directive inside it stays literal.
        assert_eq!(
            helper_compile_statements("@wrap(@if($x))"),
            "@wrap(@if($x))"
        );
    }

    #[test]
    fn test_unknown_directive_keeps_whitespace() {
        assert_eq!(
            helper_compile_statements("email me @taylor today"),
            "email me @taylor today"
        );
    }

    #[test]
    fn test_email_address_untouched() {
        assert_eq!(
            helper_compile_statements("mail taylor@example.com"),
            "mail taylor@example.com"
        );
    }

    #[test]
    fn test_nested_parentheses() {
        assert_eq!(
            helper_compile_statements("@if(count($x) > (1 + 2)) y @endif"),
            "<?php if(count($x) > (1 + 2)): ?> y <?php endif; ?>"
        );
    }

    #[test]
    fn test_unbalanced_arguments_fail_late() {
        // The arguments never close, so only the name is consumed and the
        // remainder stays literal.
        assert_eq!(
            helper_compile_statements("@if(count($x)"),
            "<?php if: ?>(count($x)"
        );
    }

    #[test]
    fn test_scan_arguments() {
        assert_eq!(scan_arguments("($a, ($b))!"), Some(10));
        assert_eq!(scan_arguments("($a"), None);
        assert_eq!(scan_arguments("x"), None);
    }

    #[test]
    fn test_strip_parentheses_blind() {
        assert_eq!(strip_parentheses("('view')"), "'view'");
        assert_eq!(strip_parentheses("'view'"), "'view'");
        // The strip does not verify the pair: the last character is
        // dropped even when it is not the matching parenthesis.
        assert_eq!(strip_parentheses("($a) . $b"), "$a) . $");
    }

    /// Compile the given text with a default Compiler and a fresh Scratch.
    fn helper_compile_statements(value: &str) -> String {
        let compiler = Compiler::default();
        let mut scratch = Scratch::new();

        compile_statements(&compiler, value, &mut scratch)
    }
}
