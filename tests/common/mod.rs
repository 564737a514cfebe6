//! Shared helpers for the Rat25F integration tests.
#![allow(dead_code)]

use std::path::PathBuf;

use rat25f::syntax::{parse, tokenize, Production, Token, Trace};
use rat25f::SyntaxMismatch;

pub const MINIMAL: &str = "# integer x ; x = 1 ; #";

/// Valid programs exercised by the property-style tests.
pub const VALID_PROGRAMS: &[&str] = &[
    MINIMAL,
    include_str!("../fixtures/accumulate.txt"),
    include_str!("../fixtures/scaled_max.txt"),
    "# real a, b, c ; put ( 1 ) ; #",
    "# x = a + b - c ; #",
    "# while ( a < b ) { a = a + 1 ; get ( b ) ; } #",
    "# if ( a != b ) return a * -b ; fi if ( true == false ) { put ( 0 ) ; } fi #",
];

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn tokens(source: &str) -> Vec<Token> {
    tokenize(source).expect("source should tokenize")
}

pub fn accepted(source: &str) -> Trace {
    match parse(tokens(source)) {
        Ok(trace) => trace,
        Err(e) => panic!("expected {source:?} to parse, got: {e}"),
    }
}

pub fn rejected(source: &str) -> SyntaxMismatch {
    match parse(tokens(source)) {
        Ok(_) => panic!("expected {source:?} to be rejected"),
        Err(e) => e,
    }
}

pub fn count(trace: &Trace, production: Production) -> usize {
    trace.productions().filter(|p| *p == production).count()
}

/// Renders a matched-token line the way the report does.
pub fn token_line(kind: &str, lexeme: &str) -> String {
    format!("Token: {kind:<15} Lexeme: {lexeme}")
}
