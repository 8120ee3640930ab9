use super::syntax::{find_marker, Marker};
use crate::region::Region;

use morel::Finder;

/// Tokens produced by the [`Lexer`].
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Token {
    /// Literal template text, subject to the rewrite passes.
    Literal,
    /// A raw host-code island, passed through verbatim.
    Raw,
}

/// Provides methods to read a source string as [`Token`] instances.
///
/// The `Lexer` never fails. A raw island missing its closing delimiter
/// extends to the end of the source, and a stray closing delimiter is
/// plain literal text.
pub struct Lexer<'source> {
    /// Reference to the source text.
    pub source: &'source str,
    /// Position within source.
    pub cursor: usize,
    /// Compiled [`Finder`] instance used to search for the raw
    /// delimiters in the source text.
    finder: &'source Finder,
    /// Temporary storage for a [`Token`] that will be read
    /// on the following call to `.next`
    buffer: Option<(Token, Region)>,
}

impl<'source> Lexer<'source> {
    /// Create a new [`Lexer`] from the given source and raw delimiter [`Finder`].
    #[inline]
    pub fn new(source: &'source str, finder: &'source Finder) -> Self {
        Self {
            finder,
            source,
            cursor: 0,
            buffer: None,
        }
    }

    /// Return the next [`Token`] and [`Region`], or None when the source
    /// is exhausted.
    pub fn next(&mut self) -> Option<(Token, Region)> {
        // Always prefer taking from the buffer when possible.
        if let Some(next) = self.buffer.take() {
            return Some(next);
        }
        if self.source[self.cursor..].is_empty() {
            return None;
        }

        let from = self.cursor;
        match find_marker(self.finder, self.source, from, Marker::Open) {
            Some((marker_begin, marker_end)) => {
                let island = self.lex_island(marker_begin, marker_end);
                self.cursor = island.end;

                if from == marker_begin {
                    Some((Token::Raw, island))
                } else {
                    self.buffer = Some((Token::Raw, island));

                    Some((Token::Literal, (from..marker_begin).into()))
                }
            }
            None => {
                self.cursor = self.source.len();

                Some((Token::Literal, (from..self.source.len()).into()))
            }
        }
    }

    /// Return the [`Region`] of the raw island whose opening delimiter
    /// spans `begin..end`.
    ///
    /// The region includes both delimiters. Opening delimiters inside the
    /// island are plain text, and an island missing its closing delimiter
    /// runs to the end of the source.
    fn lex_island(&self, begin: usize, end: usize) -> Region {
        match find_marker(self.finder, self.source, end, Marker::Close) {
            Some((_, close_end)) => (begin..close_end).into(),
            None => (begin..self.source.len()).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Lexer, Token};
    use crate::{compile::Builder, region::Region};

    #[test]
    fn test_lex_literal_only() {
        let expect = vec![(Token::Literal, 0..11)];

        helper_lex_next_auto("lorem ipsum", expect)
    }

    #[test]
    fn test_lex_island() {
        let expect = vec![
            (Token::Literal, 0..2),
            (Token::Raw, 2..18),
            (Token::Literal, 18..20),
        ];

        helper_lex_next_auto("a <?php echo 1; ?> b", expect)
    }

    #[test]
    fn test_lex_island_at_start() {
        let expect = vec![(Token::Raw, 0..10), (Token::Literal, 10..14)];

        helper_lex_next_auto("<?php x ?>tail", expect)
    }

    #[test]
    fn test_lex_unterminated_island() {
        let expect = vec![(Token::Literal, 0..5), (Token::Raw, 5..15)];

        helper_lex_next_auto("text <?php rest", expect)
    }

    #[test]
    fn test_lex_stray_close() {
        let expect = vec![(Token::Literal, 0..6)];

        helper_lex_next_auto("a ?> b", expect)
    }

    #[test]
    fn test_lex_adjacent_islands() {
        let expect = vec![(Token::Raw, 0..10), (Token::Raw, 10..20)];

        helper_lex_next_auto("<?php a ?><?php b ?>", expect)
    }

    /// Helper function which takes in a source string, creates a lexer on that
    /// string and iterates [expect.len()] amount of times and compares the result
    /// against [lexer.next()].
    fn helper_lex_next_auto<T>(source: &str, expect: Vec<(Token, T)>)
    where
        T: Into<Region>,
    {
        let finder_syntax = Builder::new().to_syntax();
        let mut lexer = Lexer::new(source, finder_syntax.raw_finder());
        for (token, region) in expect {
            assert_eq!(lexer.next(), Some((token, region.into())))
        }

        assert_eq!(lexer.next(), None);
        assert_eq!(lexer.next(), None);
    }
}
