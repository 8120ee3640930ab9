use morel::Finder;

/// Markers that identify the boundaries of a delimited area within text.
///
/// Every [`Finder`] built by this module recognizes exactly one pair of
/// markers, so the identifier only needs to distinguish an opening marker
/// from a closing one.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Marker {
    /// Beginning of a delimited area.
    Open = 0,
    /// End of a delimited area.
    Close = 1,
}

impl From<usize> for Marker {
    fn from(value: usize) -> Self {
        match value {
            0 => Self::Open,
            1 => Self::Close,
            _ => unreachable!(),
        }
    }
}

impl From<Marker> for usize {
    fn from(k: Marker) -> Self {
        k as usize
    }
}

/// Return the next marker of the given kind at or beyond `from`,
/// as a `(begin, end)` pair of byte offsets.
///
/// Markers of the other kind are skipped over, so a stray closing
/// marker never terminates a search for an opening one.
pub(crate) fn find_marker(
    finder: &Finder,
    source: &str,
    mut from: usize,
    marker: Marker,
) -> Option<(usize, usize)> {
    while let Some((id, begin, end)) = finder.next(source, from) {
        if Marker::from(id) == marker {
            return Some((begin, end));
        }
        from = end;
    }

    None
}

/// Delimiters recognized during compilation.
///
/// Holds the configured tag pairs and a compiled [`Finder`] for each,
/// so the passes can search for markers without rescanning tag text.
///
/// Create one with a [`Builder`].
pub struct Syntax {
    /// Content tags marking an echoed expression.
    content: (String, String),
    /// Escaped tags marking an expression echoed through `escape()`.
    escaped: (String, String),
    /// Delimiters of a raw host-code island.
    raw: (String, String),
    content_finder: Finder,
    escaped_finder: Finder,
    comment_finder: Finder,
    raw_finder: Finder,
}

impl Syntax {
    /// Return the content tag pair.
    #[inline]
    pub fn content(&self) -> (&str, &str) {
        (&self.content.0, &self.content.1)
    }

    /// Return the escaped tag pair.
    #[inline]
    pub fn escaped(&self) -> (&str, &str) {
        (&self.escaped.0, &self.escaped.1)
    }

    /// Return the raw host-code delimiter pair.
    #[inline]
    pub fn raw(&self) -> (&str, &str) {
        (&self.raw.0, &self.raw.1)
    }

    #[inline]
    pub(crate) fn content_finder(&self) -> &Finder {
        &self.content_finder
    }

    #[inline]
    pub(crate) fn escaped_finder(&self) -> &Finder {
        &self.escaped_finder
    }

    #[inline]
    pub(crate) fn comment_finder(&self) -> &Finder {
        &self.comment_finder
    }

    #[inline]
    pub(crate) fn raw_finder(&self) -> &Finder {
        &self.raw_finder
    }
}

impl Default for Syntax {
    fn default() -> Self {
        Builder::new().to_syntax()
    }
}

/// Provides methods to build a [`Syntax`].
///
/// # Example
///
/// ```
/// use sable::Builder;
///
/// let syntax = Builder::new()
///     .with_content("[[", "]]")
///     .with_escaped("[[[", "]]]")
///     .to_syntax();
/// ```
pub struct Builder<'marker> {
    content: (&'marker str, &'marker str),
    escaped: (&'marker str, &'marker str),
    raw: (&'marker str, &'marker str),
}

impl<'marker> Builder<'marker> {
    /// Create a new [`Builder`].
    ///
    /// The `Builder` has default markers:
    ///
    /// ```text
    /// Content: {{ name }}
    /// Escaped: {{{ name }}}
    /// Comments: {{-- note --}}
    /// Raw code: <?php ... ?>
    /// ```
    ///
    /// To proceed with these defaults, you may immediately call `to_syntax` to receive the
    /// [`Syntax`] instance.
    #[inline]
    pub fn new() -> Self {
        Self {
            content: ("{{", "}}"),
            escaped: ("{{{", "}}}"),
            raw: ("<?php", "?>"),
        }
    }

    /// Set the content tags.
    ///
    /// Comment markers are derived from the content tags, so changing the
    /// content tags also moves the comment markers.
    ///
    /// # Examples
    ///
    /// ```
    /// use sable::Builder;
    ///
    /// let mut builder = Builder::new();
    /// builder.set_content("[[", "]]");
    /// ```
    #[inline]
    pub fn set_content(&mut self, begin: &'marker str, end: &'marker str) {
        self.content = (begin, end);
    }

    /// Set the content tags.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    ///
    /// ```
    /// use sable::Builder;
    ///
    /// Builder::new()
    ///     .with_content("[[", "]]");
    /// ```
    #[inline]
    pub fn with_content(mut self, begin: &'marker str, end: &'marker str) -> Self {
        self.set_content(begin, end);

        self
    }

    /// Set the escaped tags.
    ///
    /// # Examples
    ///
    /// ```
    /// use sable::Builder;
    ///
    /// let mut builder = Builder::new();
    /// builder.set_escaped("[[[", "]]]");
    /// ```
    #[inline]
    pub fn set_escaped(&mut self, begin: &'marker str, end: &'marker str) {
        self.escaped = (begin, end);
    }

    /// Set the escaped tags.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    ///
    /// # Examples
    ///
    /// ```
    /// use sable::Builder;
    ///
    /// Builder::new()
    ///     .with_escaped("[[[", "]]]");
    /// ```
    #[inline]
    pub fn with_escaped(mut self, begin: &'marker str, end: &'marker str) -> Self {
        self.set_escaped(begin, end);

        self
    }

    /// Set the raw host-code delimiters.
    ///
    /// Text between these delimiters is never rewritten.
    ///
    /// # Examples
    ///
    /// ```
    /// use sable::Builder;
    ///
    /// let mut builder = Builder::new();
    /// builder.set_raw("<%", "%>");
    /// ```
    #[inline]
    pub fn set_raw(&mut self, begin: &'marker str, end: &'marker str) {
        self.raw = (begin, end);
    }

    /// Set the raw host-code delimiters.
    ///
    /// Returns the [`Builder`], so additional methods may be chained.
    ///
    /// # Examples
    ///
    /// ```
    /// use sable::Builder;
    ///
    /// Builder::new()
    ///     .with_raw("<%", "%>");
    /// ```
    #[inline]
    pub fn with_raw(mut self, begin: &'marker str, end: &'marker str) -> Self {
        self.set_raw(begin, end);

        self
    }

    /// Return a [`Syntax`] instance from the markers in this [`Builder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sable::Builder;
    ///
    /// let syntax = Builder::new()
    ///     .with_content("[[", "]]")
    ///     .with_escaped("[[[", "]]]")
    ///     .with_raw("<%", "%>")
    ///     .to_syntax();
    /// ```
    pub fn to_syntax(self) -> Syntax {
        let (content_begin, content_end) = self.content;
        let (escaped_begin, escaped_end) = self.escaped;
        let (raw_begin, raw_end) = self.raw;

        let pair = |begin: String, end: String| {
            Finder::new(morel::Syntax::new(vec![
                (Marker::Open.into(), begin),
                (Marker::Close.into(), end),
            ]))
        };

        Syntax {
            content_finder: pair(content_begin.into(), content_end.into()),
            escaped_finder: pair(escaped_begin.into(), escaped_end.into()),
            comment_finder: pair(format!("{content_begin}--"), format!("--{content_end}")),
            raw_finder: pair(raw_begin.into(), raw_end.into()),
            content: (content_begin.into(), content_end.into()),
            escaped: (escaped_begin.into(), escaped_end.into()),
            raw: (raw_begin.into(), raw_end.into()),
        }
    }
}

impl<'marker> Default for Builder<'marker> {
    fn default() -> Self {
        Self::new()
    }
}
