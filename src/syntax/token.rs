//! Tokens as delivered by the lexer.

use std::fmt;

use serde::Serialize;

use super::Span;

/// Reserved words of Rat25F. A word matching one of these is never an identifier.
pub const KEYWORDS: &[&str] = &[
    "function", "integer", "boolean", "real", "if", "else", "fi", "while", "return", "put", "get",
    "true", "false",
];

/// Type names accepted by `<Qualifier>`.
pub const QUALIFIERS: &[&str] = &["integer", "boolean", "real"];

/// Operators accepted by `<Relop>`.
pub const RELATIONAL_OPERATORS: &[&str] = &["==", "!=", ">", "<", "<=", ">=", "=>"];

/// Lexemes (besides identifiers) that may begin a statement.
pub const STATEMENT_STARTERS: &[&str] = &["{", "if", "return", "put", "get", "while"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Identifier,
    Integer,
    Real,
    Keyword,
    Operator,
    Separator,
    /// A character outside the Rat25F alphabet.
    Unknown,
    #[serde(rename = "EOF")]
    Eof,
}

impl TokenKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identifier => "Identifier",
            Self::Integer => "Integer",
            Self::Real => "Real",
            Self::Keyword => "Keyword",
            Self::Operator => "Operator",
            Self::Separator => "Separator",
            Self::Unknown => "Unknown",
            Self::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad, so that width and alignment flags apply
        f.pad(self.name())
    }
}

/// One token: its kind, the exact source text, and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// The end-of-input sentinel, placed at byte `offset`.
    pub fn eof(offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", Span::point(offset))
    }

    /// Classifies a word as keyword or identifier.
    pub fn word(text: &str, span: Span) -> Self {
        let kind = if KEYWORDS.contains(&text) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Self::new(kind, text, span)
    }

    pub fn identifier(text: &str) -> Self {
        Self::new(TokenKind::Identifier, text, Span::default())
    }

    pub fn keyword(text: &str) -> Self {
        Self::new(TokenKind::Keyword, text, Span::default())
    }

    pub fn operator(text: &str) -> Self {
        Self::new(TokenKind::Operator, text, Span::default())
    }

    pub fn separator(text: &str) -> Self {
        Self::new(TokenKind::Separator, text, Span::default())
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn is(&self, lexeme: &str) -> bool {
        self.lexeme == lexeme
    }

    pub fn is_one_of(&self, lexemes: &[&str]) -> bool {
        lexemes.contains(&self.lexeme.as_str())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.lexeme)
    }
}
