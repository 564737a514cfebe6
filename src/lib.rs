//! Rat25F syntax analyzer.
//!
//! Validates that a token stream conforms to the Rat25F grammar, producing
//! either an ordered derivation trace or the first syntax error.

pub use crate::errors::{AnalysisError, LexError, SyntaxMismatch};
pub use crate::syntax::{parse, parse_source, tokenize, ParseResult, Token, TokenKind, Trace};

pub mod cli;
pub mod errors;
pub mod syntax;
