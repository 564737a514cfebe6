//! Syntax module for the Rat25F language
//!
//! Lexing, the token stream, the recursive-descent parser and the derivation
//! trace it produces. Source locations are byte spans; the grammar itself only
//! ever looks at token kinds and lexemes.

use serde::Serialize;

pub mod lexer;
pub mod parser;
pub mod stream;
pub mod token;
pub mod trace;

pub use lexer::tokenize;
pub use parser::{parse, parse_source, ParseResult, Parser};
pub use stream::TokenStream;
pub use token::{Token, TokenKind};
pub use trace::{Production, Trace, TraceEntry};

/// Represents a span in the source code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`.
    pub fn point(offset: usize) -> Self {
        Self::new(offset, offset)
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(span: pest::Span<'_>) -> Self {
        Self::new(span.start(), span.end())
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::from(span.start..span.end)
    }
}
