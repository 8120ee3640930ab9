mod comment;
mod echo;
mod lex;
mod scratch;
mod statement;
mod syntax;

pub use lex::{Lexer, Token};
pub use scratch::Scratch;
pub use syntax::{Builder, Marker, Syntax};

pub(crate) use comment::compile_comments;
pub(crate) use echo::compile_echos;
pub(crate) use statement::{builtins, compile_statements};

use crate::{compiler::Compiler, log::Error};

/// Compile the given text with the default configuration.
///
/// Provides a shortcut to quickly compile a document without creating
/// a [`Compiler`].
///
/// # Errors
///
/// Returns an [`Error`] when an extension aborts the compilation, which
/// cannot happen here because the default `Compiler` has none registered.
///
/// # Examples
///
/// ```
/// use sable::compile;
///
/// let result = compile("Hello, {{ $name }}!");
/// assert_eq!(result.unwrap(), "Hello, <?php echo $name; ?>!");
/// ```
pub fn compile(text: &str) -> Result<String, Error> {
    Compiler::default().compile(text)
}
