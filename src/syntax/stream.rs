//! TokenStream: a fully materialized token buffer with a saturating cursor.

use super::Token;

/// Owns the tokens of one parse and the position of the next one to consume.
///
/// The last token is always EOF, and the cursor never moves past it, so
/// [`TokenStream::current`] is total.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenStream {
    /// Wraps `tokens`, appending an EOF sentinel if the sequence lacks one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let end = tokens.last().map_or(0, |t| t.span().end);
            tokens.push(Token::eof(end));
        }
        Self { tokens, cursor: 0 }
    }

    pub fn current(&self) -> &Token {
        &self.tokens[self.cursor]
    }

    /// Moves to the next token; a no-op once the cursor rests on EOF.
    pub fn advance(&mut self) {
        if self.cursor + 1 < self.tokens.len() {
            self.cursor += 1;
        }
    }

    /// Index of the current token.
    pub fn index(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.current().is_eof()
    }
}
