//! Rat25F Error Handling
//!
//! The syntax analyzer has exactly one grammar failure shape, [`SyntaxMismatch`].
//! Lexing and the command-line driver add their own small error types so that
//! every failure can be rendered as a `miette` diagnostic.

use std::path::PathBuf;

use miette::{Diagnostic, NamedSource};
use serde::Serialize;
use thiserror::Error;

use crate::syntax::{Span, Token, TokenKind};

// ============================================================================
// SYNTAX ERRORS
// ============================================================================

/// The first grammar mismatch found in a token stream.
///
/// Produced both by rule procedures and by the whole-input check after the
/// closing `#` (in which case `expected` is `"end of input"`).
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic, Serialize)]
#[error("Expected {expected}, but found {found_kind}: '{found_lexeme}' at token position {index}")]
#[diagnostic(code(rat25f::syntax::mismatch))]
pub struct SyntaxMismatch {
    pub expected: String,
    pub found_kind: TokenKind,
    pub found_lexeme: String,
    pub index: usize,
    #[label("found {found_kind} here")]
    pub span: Span,
}

impl SyntaxMismatch {
    /// Builds a mismatch against the token found at `index`.
    pub fn new(expected: impl Into<String>, found: &Token, index: usize) -> Self {
        Self {
            expected: expected.into(),
            found_kind: found.kind(),
            found_lexeme: found.lexeme().to_string(),
            index,
            span: found.span(),
        }
    }

    /// True when the mismatch is the trailing-token check rather than a rule failure.
    pub fn is_trailing_input(&self) -> bool {
        self.expected == END_OF_INPUT
    }
}

/// Description used when tokens remain after the program's closing `#`.
pub const END_OF_INPUT: &str = "end of input";

// ============================================================================
// LEXICAL ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum LexError {
    #[error("Unterminated comment starting at byte {offset}")]
    #[diagnostic(
        code(rat25f::lex::unterminated_comment),
        help("comments are written as [* ... *]")
    )]
    UnterminatedComment {
        offset: usize,
        #[label("comment opened here")]
        span: Span,
    },

    #[error("Tokenizer failure: {message}")]
    #[diagnostic(code(rat25f::lex::grammar))]
    Grammar {
        message: String,
        #[label("here")]
        span: Span,
    },
}

impl LexError {
    pub(crate) fn from_pest<R: pest::RuleType>(error: pest::error::Error<R>) -> Self {
        let span = match error.location {
            pest::error::InputLocation::Pos(pos) => Span::point(pos),
            pest::error::InputLocation::Span((start, end)) => Span::new(start, end),
        };
        Self::Grammar {
            message: error.variant.message().into_owned(),
            span,
        }
    }
}

// ============================================================================
// DRIVER ERRORS
// ============================================================================

/// Everything that can stop an analysis run.
#[derive(Debug, Error, Diagnostic)]
pub enum AnalysisError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxMismatch),

    #[error("Failed to access {}", .path.display())]
    #[diagnostic(code(rat25f::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk directory")]
    #[diagnostic(code(rat25f::io::walk))]
    Walk(#[from] walkdir::Error),

    #[error("No source files with extension '.{ext}' found")]
    #[diagnostic(
        code(rat25f::io::no_inputs),
        help("pass source files directly or use --ext to pick another extension")
    )]
    NoInputs { ext: String },

    #[error("Reports for {} and {} would both be written to {}", .first.display(), .second.display(), .report.display())]
    #[diagnostic(
        code(rat25f::io::report_clash),
        help("check the files in separate runs or write the reports to stdout")
    )]
    ReportClash {
        first: PathBuf,
        second: PathBuf,
        report: PathBuf,
    },

    #[error("Failed to serialize report")]
    #[diagnostic(code(rat25f::report::json))]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a diagnostic with the program text attached so labels render as snippets.
pub fn print_with_source<E>(error: E, name: &str, source: &str)
where
    E: Diagnostic + Send + Sync + 'static,
{
    let report = miette::Report::new(error)
        .with_source_code(NamedSource::new(name, source.to_string()));
    eprintln!("{report:?}");
}

/// Prints a diagnostic that has no program text associated with it.
pub fn print_error(error: AnalysisError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
