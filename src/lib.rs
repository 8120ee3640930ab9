//! Sable - Template Compiler
//!
//! Compiles template text into executable host code. Echo tags such as
//! `{{ $name }}`, escaped echoes like `{{{ $bio }}}`, comments, and `@`
//! directives are rewritten into code the rendering environment evaluates
//! later; raw host-code islands pass through untouched, so compiled output
//! can safely be compiled again.
//!
//! ```
//! use sable::Compiler;
//!
//! let compiler = Compiler::default();
//! let result = compiler.compile_must("Hello, {{ $name }}!");
//!
//! assert_eq!(result, "Hello, <?php echo $name; ?>!");
//! ```
//!
//! Delimiters are configurable through a [`Builder`], custom directives and
//! extensions register on the [`Compiler`], and compiled artifacts may be
//! cached on disk with staleness decided by file modification times.
mod cache;
mod compiler;
mod log;
mod region;

pub mod compile;
pub mod directive;
pub mod extension;

pub use compile::{compile, Builder, Marker, Syntax, Token};
pub use compiler::Compiler;
pub use log::Error;
pub use region::Region;
