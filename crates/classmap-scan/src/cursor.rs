//! Lookahead over a token slice.

use crate::token::{Token, TokenKind};

/// A read-only position in a token sequence.
///
/// All lookahead used by the declaration scanner goes through this type so
/// that "what comes next" questions are expressed as named operations
/// instead of index arithmetic.
#[derive(Debug, Clone, Copy)]
pub struct TokenCursor<'a, 'src> {
    tokens: &'a [Token<'src>],
    pos: usize,
}

impl<'a, 'src> TokenCursor<'a, 'src> {
    /// Create a cursor at the first token.
    pub fn new(tokens: &'a [Token<'src>]) -> Self {
        Self::at(tokens, 0)
    }

    /// Create a cursor at `pos`.
    pub fn at(tokens: &'a [Token<'src>], pos: usize) -> Self {
        Self { tokens, pos }
    }

    /// Current position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Token `n` positions ahead of the cursor (0 = current).
    pub fn peek(&self, n: usize) -> Option<&'a Token<'src>> {
        self.tokens.get(self.pos + n)
    }

    /// The `n`-th non-trivia token at or after the cursor, with its position.
    pub fn peek_significant(&self, n: usize) -> Option<(usize, &'a Token<'src>)> {
        self.significant().nth(n)
    }

    /// Non-trivia tokens from the cursor onward, with their positions.
    pub fn significant(&self) -> impl Iterator<Item = (usize, &'a Token<'src>)> + use<'a, 'src> {
        self.tokens
            .iter()
            .enumerate()
            .skip(self.pos)
            .filter(|(_, token)| !token.kind.is_trivia())
    }

    /// First token matching `wanted`, giving up at the first token matching
    /// `stop`. A token matching both counts as `stop`.
    pub fn find(
        &self,
        wanted: impl Fn(&Token<'src>) -> bool,
        stop: impl Fn(&Token<'src>) -> bool,
    ) -> Option<(usize, &'a Token<'src>)> {
        for (index, token) in self.tokens.iter().enumerate().skip(self.pos) {
            if stop(token) {
                return None;
            }
            if wanted(token) {
                return Some((index, token));
            }
        }
        None
    }

    /// Concatenate the text of tokens matching `include` until a token
    /// matching `stop` (or the end of input).
    pub fn collect_until(
        &self,
        include: impl Fn(&Token<'src>) -> bool,
        stop: impl Fn(&Token<'src>) -> bool,
    ) -> String {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .take_while(|token| !stop(token))
            .filter(|token| include(token))
            .map(|token| token.text)
            .collect()
    }

    /// Skip a `#[ ... ]` attribute group starting at the cursor and return
    /// the position just after its closing bracket.
    pub fn skip_attribute(&self) -> Option<usize> {
        if self.peek(0)?.kind != TokenKind::AttributeOpen {
            return None;
        }
        let mut depth = 0usize;
        for (index, token) in self.tokens.iter().enumerate().skip(self.pos) {
            if token.kind == TokenKind::AttributeOpen || token.is_punct('[') {
                depth += 1;
            } else if token.is_punct(']') {
                depth -= 1;
                if depth == 0 {
                    return Some(index + 1);
                }
            }
        }
        None
    }
}
