use crate::{
    cache,
    compile::{self, Lexer, Scratch, Syntax, Token},
    directive::Directive,
    extension::Extension,
    log::{error_read, error_write, Error, INVALID_DIRECTIVE},
};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// Facilitates compiling template documents, and provides storage for
/// directives and extensions.
///
/// All configuration happens before the first compile call. Compilation
/// itself borrows the `Compiler` immutably and keeps its mutable state in a
/// per-call [`Scratch`], so one `Compiler` may compile different documents
/// from multiple threads at once.
pub struct Compiler {
    /// Delimiters recognized in template text.
    syntax: Syntax,
    /// Directives that this Compiler is aware of, by name.
    directives: HashMap<String, Box<dyn Directive>>,
    /// Extensions applied to every literal segment, in registration order.
    extensions: Vec<Box<dyn Extension>>,
    /// Directory that compiled artifacts are written to, if any.
    cache: Option<PathBuf>,
}

impl Compiler {
    /// Create a new instance of [`Compiler`] with the given [`Syntax`].
    ///
    /// The built-in directives are registered; no extensions are.
    ///
    /// # Examples
    ///
    /// ```
    /// use sable::{Builder, Compiler};
    ///
    /// let compiler = Compiler::new(
    ///     Builder::new()
    ///         .with_content("[[", "]]")
    ///         .with_escaped("[[[", "]]]")
    ///         .to_syntax(),
    /// );
    /// ```
    #[inline]
    pub fn new(syntax: Syntax) -> Self {
        Self {
            syntax,
            directives: compile::builtins(),
            extensions: Vec::new(),
            cache: None,
        }
    }

    /// Compile the given text.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a registered [`Extension`] aborts the
    /// compilation. Malformed template text is never an error; it passes
    /// through and fails at render time instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use sable::Compiler;
    ///
    /// let compiler = Compiler::default();
    /// let result = compiler.compile("hello, {{ $name }}!");
    ///
    /// assert_eq!(result.unwrap(), "hello, <?php echo $name; ?>!");
    /// ```
    pub fn compile(&self, text: &str) -> Result<String, Error> {
        let mut scratch = Scratch::new();
        let mut result = String::with_capacity(text.len());

        let mut lexer = Lexer::new(text, self.syntax.raw_finder());
        while let Some((token, region)) = lexer.next() {
            match token {
                Token::Raw => result.push_str(region.literal(text)),
                Token::Literal => {
                    let mut segment = region.literal(text).to_string();
                    for extension in &self.extensions {
                        segment = extension.apply(segment, self)?;
                    }
                    let segment = compile::compile_statements(self, &segment, &mut scratch);
                    let segment = compile::compile_comments(&self.syntax, &segment);
                    let segment = compile::compile_echos(&self.syntax, &segment);

                    result.push_str(&segment);
                }
            }
        }

        let mut footer = scratch.take_footer();
        if !footer.is_empty() {
            footer.reverse();
            result = format!("{}\n{}", result.trim_start_matches('\n'), footer.join("\n"));
        }

        Ok(result)
    }

    /// Compile the given text.
    ///
    /// # Panics
    ///
    /// Panics when compilation fails, which can only be caused by a
    /// registered [`Extension`] returning an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use sable::Compiler;
    ///
    /// let compiler = Compiler::default();
    /// let result = compiler.compile_must("hello, {{ $name }}!");
    /// ```
    #[inline]
    pub fn compile_must(&self, text: &str) -> String {
        self.compile(text).unwrap()
    }

    /// Compile the document at the given path.
    ///
    /// When a cache directory is configured, the output is also written to
    /// [`compiled_path`][`Compiler::compiled_path`]. The cache directory is
    /// expected to exist.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the source cannot be read, when an
    /// [`Extension`] aborts the compilation, or when the compiled artifact
    /// cannot be written.
    pub fn compile_file<T>(&self, source: T) -> Result<String, Error>
    where
        T: AsRef<Path>,
    {
        let source = source.as_ref();
        let text = fs::read_to_string(source).map_err(|error| error_read(source, error))?;
        let result = self
            .compile(&text)
            .map_err(|error| error.with_name(source.display().to_string()))?;

        if let Some(compiled) = self.compiled_path(source) {
            fs::write(&compiled, &result).map_err(|error| error_write(&compiled, error))?;
        }

        Ok(result)
    }

    /// Return the path the compiled artifact for the given source path is
    /// stored at, or None when no cache directory is configured.
    ///
    /// Derivation is pure: the name depends on the source path alone, not
    /// on its contents, so an edited document reuses the same artifact.
    pub fn compiled_path<T>(&self, source: T) -> Option<PathBuf>
    where
        T: AsRef<Path>,
    {
        self.cache
            .as_deref()
            .map(|directory| cache::compiled_path(directory, source.as_ref()))
    }

    /// Return true if the compiled artifact for the given source path must
    /// be regenerated.
    ///
    /// Always true when no cache directory is configured or no artifact
    /// exists. An existing artifact is valid while its modified time is at
    /// least the source's modified time.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a modified timestamp cannot be read.
    pub fn is_expired<T>(&self, source: T) -> Result<bool, Error>
    where
        T: AsRef<Path>,
    {
        match self.compiled_path(source.as_ref()) {
            Some(compiled) => cache::is_expired(source.as_ref(), &compiled),
            None => Ok(true),
        }
    }

    /// Set the cache directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use sable::Compiler;
    ///
    /// let mut compiler = Compiler::default();
    /// compiler.set_cache("storage/views");
    /// ```
    #[inline]
    pub fn set_cache<T>(&mut self, path: T)
    where
        T: Into<PathBuf>,
    {
        self.cache = Some(path.into());
    }

    /// Set the cache directory.
    ///
    /// Returns the [`Compiler`], so additional methods may be chained.
    ///
    /// # Examples
    ///
    /// ```
    /// use sable::Compiler;
    ///
    /// let compiler = Compiler::default().with_cache("storage/views");
    /// ```
    #[inline]
    pub fn with_cache<T>(mut self, path: T) -> Self
    where
        T: Into<PathBuf>,
    {
        self.set_cache(path);

        self
    }

    /// Add a [`Directive`].
    ///
    /// # Errors
    ///
    /// If a `Directive` with the given name already exists in the compiler,
    /// an [`Error`] is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use sable::{compile::Scratch, Compiler};
    ///
    /// fn now(_: Option<&str>, _: &mut Scratch) -> String {
    ///     "<?php echo date('c'); ?>".to_string()
    /// }
    ///
    /// let mut compiler = Compiler::default();
    /// let result = compiler.add_directive("now", now);
    ///
    /// assert!(result.is_ok());
    /// ```
    pub fn add_directive<T>(&mut self, name: &str, directive: T) -> Result<(), Error>
    where
        T: Directive + 'static,
    {
        let as_string = name.to_string();
        if self.directives.get(&as_string).is_some() {
            return Err(Error::build(INVALID_DIRECTIVE).with_help(format!(
                "directive with name `{name}` already exists in compiler, \
                overwrite it with `.add_directive_must`"
            )));
        }
        self.directives.insert(as_string, Box::new(directive));
        Ok(())
    }

    /// Add a [`Directive`].
    ///
    /// If a `Directive` with the given name already exists in the
    /// [`Compiler`], it is overwritten.
    #[inline]
    pub fn add_directive_must<T>(&mut self, name: &str, directive: T)
    where
        T: Directive + 'static,
    {
        self.directives.insert(name.to_string(), Box::new(directive));
    }

    /// Add a [`Directive`].
    ///
    /// Returns the [`Compiler`], so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// If a `Directive` with the given name already exists in the compiler,
    /// an [`Error`] is returned.
    #[inline]
    pub fn with_directive<T>(mut self, name: &str, directive: T) -> Result<Self, Error>
    where
        T: Directive + 'static,
    {
        self.add_directive(name, directive)?;
        Ok(self)
    }

    /// Add a [`Directive`].
    ///
    /// Returns the [`Compiler`], so additional methods may be chained.
    ///
    /// If a `Directive` with the given name already exists in the compiler,
    /// it is overwritten.
    #[inline]
    pub fn with_directive_must<T>(mut self, name: &str, directive: T) -> Self
    where
        T: Directive + 'static,
    {
        self.add_directive_must(name, directive);
        self
    }

    /// Return the directive with the given name, if it exists in Compiler.
    #[inline]
    pub fn get_directive(&self, name: &str) -> Option<&Box<dyn Directive>> {
        self.directives.get(name)
    }

    /// Add an [`Extension`].
    ///
    /// Extensions run against every literal segment before the built-in
    /// passes, in registration order. There is no removal or
    /// de-duplication.
    #[inline]
    pub fn add_extension<T>(&mut self, extension: T)
    where
        T: Extension + 'static,
    {
        self.extensions.push(Box::new(extension));
    }

    /// Add an [`Extension`].
    ///
    /// Returns the [`Compiler`], so additional methods may be chained.
    ///
    /// # Examples
    ///
    /// ```
    /// use sable::Compiler;
    ///
    /// let compiler = Compiler::default()
    ///     .with_extension(|value: String, _: &Compiler| Ok(value.replace("~", "&tilde;")));
    ///
    /// assert_eq!(compiler.compile_must("x ~ y"), "x &tilde; y");
    /// ```
    #[inline]
    pub fn with_extension<T>(mut self, extension: T) -> Self
    where
        T: Extension + 'static,
    {
        self.add_extension(extension);
        self
    }

    /// Run the directive pass over the given text.
    ///
    /// Exposed so an [`Extension`] can delegate to the built-in behavior
    /// while building its replacement text.
    #[inline]
    pub fn compile_statements(&self, value: &str, scratch: &mut Scratch) -> String {
        compile::compile_statements(self, value, scratch)
    }

    /// Run the comment pass over the given text.
    #[inline]
    pub fn compile_comments(&self, value: &str) -> String {
        compile::compile_comments(&self.syntax, value)
    }

    /// Run both echo passes over the given text.
    #[inline]
    pub fn compile_echos(&self, value: &str) -> String {
        compile::compile_echos(&self.syntax, value)
    }

    /// Return the [`Syntax`] this compiler recognizes.
    #[inline]
    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(Syntax::default())
    }
}
