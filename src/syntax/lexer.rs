//! Rat25F Lexer
//!
//! Turns source text into the token sequence the parser consumes. Comments
//! (`[* ... *]`) and whitespace are dropped; anything outside the alphabet is
//! kept as an [`TokenKind::Unknown`] token so the parser reports it in place.

use pest::Parser;
use pest_derive::Parser;
use tracing::debug;

use super::{Span, Token, TokenKind};
use crate::errors::LexError;

#[derive(Parser)]
#[grammar = "syntax/lexer.pest"]
struct Rat25fLexer;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Tokenizes `source`, always ending the sequence with an EOF token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let program = Rat25fLexer::parse(Rule::program, source)
        .map_err(LexError::from_pest)?
        .next()
        .ok_or_else(|| LexError::Grammar {
            message: "lexer produced no program".into(),
            span: Span::point(0),
        })?;

    let mut tokens = Vec::new();
    for pair in program.into_inner() {
        let span = Span::from(pair.as_span());
        let text = pair.as_str();
        let token = match pair.as_rule() {
            Rule::word => Token::word(text, span),
            Rule::integer => Token::new(TokenKind::Integer, text, span),
            Rule::real => Token::new(TokenKind::Real, text, span),
            Rule::operator => Token::new(TokenKind::Operator, text, span),
            Rule::separator => Token::new(TokenKind::Separator, text, span),
            Rule::unknown => Token::new(TokenKind::Unknown, text, span),
            Rule::unclosed_comment => {
                return Err(LexError::UnterminatedComment {
                    offset: span.start,
                    span: Span::new(span.start, span.start + 2),
                })
            }
            Rule::EOI => continue,
            rule => {
                return Err(LexError::Grammar {
                    message: format!("unexpected rule {rule:?}"),
                    span,
                })
            }
        };
        tokens.push(token);
    }
    tokens.push(Token::eof(source.len()));

    debug!(tokens = tokens.len(), bytes = source.len(), "tokenized source");
    Ok(tokens)
}
