//! Contains the `Directive` trait and other types useful for creating and using directives.
//!
//! A directive is any type which implements the [`Directive`][`crate::directive::Directive`]
//! trait. You can assign a directive to a [`Compiler`][`crate::Compiler`] with the
//! [`add_directive`][`crate::Compiler::add_directive()`] method, and it will be recognized
//! in any document compiled by that compiler.
//!
//! Given this text:
//!
//! ```html
//! @cache('sidebar', 300)
//! ```
//!
//! The compiler looks up "cache" in its dispatch table and, when a directive with that
//! name is registered, replaces the whole marker with whatever the directive returns.
//! The argument string is handed over verbatim, parentheses included, so the directive
//! decides how much structure to read into it.
//!
//! A name with no registered directive is not an error. The marker is emitted unchanged,
//! which keeps literal `@` usages such as email addresses intact.
//!
//! # Examples
//!
//! The built-in directives are plain functions, and yours can be too. Any function
//! matching the trait signature is accepted:
//!
//! ```rust
//! use sable::{compile::Scratch, Compiler};
//!
//! fn spaceless(expression: Option<&str>, _: &mut Scratch) -> String {
//!     format!(
//!         "<?php echo preg_replace('/>\\s+</', '><', {}); ?>",
//!         expression.unwrap_or_default()
//!     )
//! }
//!
//! let compiler = Compiler::default()
//!     .with_directive_must("spaceless", spaceless);
//!
//! let result = compiler.compile_must("@spaceless($html)");
//! assert_eq!(result, "<?php echo preg_replace('/>\\s+</', '><', ($html)); ?>");
//! ```
//!
//! Directives that generate loops can allocate per-document state through the
//! [`Scratch`][`crate::compile::Scratch`] argument, the same way the built-in
//! forelse support numbers its empty flags.

pub use crate::log::Error;

use crate::compile::Scratch;

/// Describes a type which can expand a directive marker into host code.
pub trait Directive: Sync + Send {
    /// Expand the directive with the given argument string, if any.
    ///
    /// The expression includes its surrounding parentheses, exactly as
    /// matched in the source.
    fn expand(&self, expression: Option<&str>, scratch: &mut Scratch) -> String;
}

/// Allows assignment of any function matching the signature of `expand` as a
/// `Directive` to `Compiler`, instead of requiring a struct be created.
impl<F> Directive for F
where
    F: Fn(Option<&str>, &mut Scratch) -> String + Sync + Send,
{
    fn expand(&self, expression: Option<&str>, scratch: &mut Scratch) -> String {
        self(expression, scratch)
    }
}

#[cfg(test)]
mod tests {
    use crate::{compile::Scratch, Compiler};

    #[test]
    fn test_custom_directive() {
        let compiler = Compiler::default().with_directive_must("upper", upper);

        assert_eq!(
            compiler.compile_must("@upper($name)"),
            "<?php echo strtoupper($name); ?>"
        );
    }

    #[test]
    fn test_custom_directive_without_arguments() {
        let compiler = Compiler::default().with_directive_must("csrf", csrf);

        assert_eq!(
            compiler.compile_must("@csrf token"),
            "<?php echo csrf_field(); ?> token"
        );
    }

    /// A Directive used to test Compiler.
    fn upper(expression: Option<&str>, _: &mut Scratch) -> String {
        format!(
            "<?php echo strtoupper{}; ?>",
            expression.unwrap_or_default()
        )
    }

    /// A Directive used to test Compiler.
    fn csrf(_: Option<&str>, _: &mut Scratch) -> String {
        "<?php echo csrf_field(); ?>".to_string()
    }
}
