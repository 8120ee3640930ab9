/// Mutable state scoped to a single compile invocation.
///
/// A fresh [`Scratch`] is constructed for every top-level compile call, so
/// forelse flag numbers and footer lines never leak between documents and
/// a shared [`Compiler`][`crate::Compiler`] stays safe to use from
/// multiple threads.
#[derive(Debug, Default)]
pub struct Scratch {
    /// Nesting depth of open forelse blocks.
    ///
    /// Raised before use and lowered after, so flag numbers start at 1.
    forelse: i64,
    /// Lines emitted after the rest of the document, in reverse order.
    footer: Vec<String>,
}

impl Scratch {
    /// Create a new [`Scratch`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a forelse block.
    ///
    /// Returns the flag number allocated to the new block.
    pub fn begin_forelse(&mut self) -> i64 {
        self.forelse += 1;

        self.forelse
    }

    /// Leave the current forelse block.
    ///
    /// Returns the flag number of the block being closed. The number may
    /// go negative when a document closes more blocks than it opened,
    /// which produces the same late-failing output as any other malformed
    /// directive sequence.
    pub fn end_forelse(&mut self) -> i64 {
        let current = self.forelse;
        self.forelse -= 1;

        current
    }

    /// Append a line to the document footer.
    pub fn push_footer<T>(&mut self, line: T)
    where
        T: Into<String>,
    {
        self.footer.push(line.into());
    }

    /// Take the accumulated footer lines, leaving the footer empty.
    pub(crate) fn take_footer(&mut self) -> Vec<String> {
        std::mem::take(&mut self.footer)
    }
}
