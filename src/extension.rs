//! Contains the `Extension` trait, the hook for rewriting template text before
//! the built-in passes run.
//!
//! An extension is any type which implements the
//! [`Extension`][`crate::extension::Extension`] trait. You can append one to a
//! [`Compiler`][`crate::Compiler`] with the
//! [`add_extension`][`crate::Compiler::add_extension()`] method.
//!
//! During compilation every literal segment of the document is passed through
//! the registered extensions in registration order, before directives, comments
//! and echoes are compiled. Each extension receives the current text and a
//! reference to the `Compiler`, so it may call back into the compiler's own
//! passes while building its replacement.
//!
//! There is no removal or de-duplication: registering the same extension twice
//! runs it twice. An extension returning an [`Error`] aborts the whole compile
//! call, and no partial output is produced.
//!
//! # Examples
//!
//! An extension that rewrites a shorthand into regular echo tags, which the
//! later echo pass then compiles:
//!
//! ```rust
//! use sable::{Compiler, Error};
//!
//! fn shorthand(value: String, _: &Compiler) -> Result<String, Error> {
//!     Ok(value.replace("{!", "{{").replace("!}", "}}"))
//! }
//!
//! let compiler = Compiler::default().with_extension(shorthand);
//!
//! let result = compiler.compile_must("{! $name !}");
//! assert_eq!(result, "<?php echo $name; ?>");
//! ```

pub use crate::log::Error;

use crate::compiler::Compiler;

/// Describes a type which can rewrite template text ahead of the built-in passes.
pub trait Extension: Sync + Send {
    /// Rewrite the given text, returning the replacement.
    ///
    /// # Errors
    ///
    /// Returning an [`Error`] aborts the compile call that invoked the
    /// extension.
    fn apply(&self, value: String, compiler: &Compiler) -> Result<String, Error>;
}

/// Allows assignment of any function matching the signature of `apply` as an
/// `Extension` to `Compiler`, instead of requiring a struct be created.
impl<F> Extension for F
where
    F: Fn(String, &Compiler) -> Result<String, Error> + Sync + Send,
{
    fn apply(&self, value: String, compiler: &Compiler) -> Result<String, Error> {
        self(value, compiler)
    }
}

#[cfg(test)]
mod tests {
    use crate::{log::Error, Compiler};

    #[test]
    fn test_extensions_run_in_registration_order() {
        let compiler = Compiler::default()
            .with_extension(|value: String, _: &Compiler| Ok(value.replace('a', "b")))
            .with_extension(|value: String, _: &Compiler| Ok(value.replace('b', "c")));

        assert_eq!(compiler.compile_must("a"), "c");
    }

    #[test]
    fn test_extension_error_aborts_compile() {
        let compiler = Compiler::default()
            .with_extension(|_: String, _: &Compiler| Err(Error::build("broken extension")));

        assert_eq!(
            compiler.compile("text"),
            Err(Error::build("broken extension"))
        );
    }

    #[test]
    fn test_extension_may_call_back_into_compiler() {
        let compiler = Compiler::default().with_extension(reversed_comments);

        assert_eq!(
            compiler.compile_must("{{-- note --}}"),
            "<?php /* eton */ ?>"
        );
    }

    /// An Extension used to test Compiler.
    ///
    /// Reverses the body of every comment, then hands the text to the
    /// compiler's own comment pass.
    fn reversed_comments(value: String, compiler: &Compiler) -> Result<String, Error> {
        let reversed = match (value.find("{{--"), value.find("--}}")) {
            (Some(begin), Some(end)) if begin < end => {
                let body: String = value[begin + 4..end].trim().chars().rev().collect();
                format!("{}{{{{-- {body} --}}}}{}", &value[..begin], &value[end + 4..])
            }
            _ => value,
        };

        Ok(compiler.compile_comments(&reversed))
    }
}
