//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for rendering analysis reports as text or JSON
//! and for the colored status lines printed after each file. By centralizing
//! output logic here, every command presents results the same way.

use std::io::{IsTerminal, Write};
use std::path::Path;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::args::OutputFormat;
use crate::errors::{AnalysisError, LexError, SyntaxMismatch};
use crate::syntax::{parse_source, Token, Trace};

/// Width of the `=` rule under a report header.
const RULE_WIDTH: usize = 50;

// ============================================================================
// REPORT
// ============================================================================

/// The outcome of analyzing one source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Accepted(Trace),
    Rejected(SyntaxMismatch),
    /// The text never reached the parser.
    Unlexable(LexError),
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum JsonReport<'a> {
    Success { trace: &'a Trace },
    Failure { error: &'a SyntaxMismatch, message: String },
    LexicalFailure { message: String },
}

impl Report {
    /// Lexes and parses `source`. Errors in the program become a report; any
    /// other error is passed through.
    pub fn analyze(source: &str) -> Result<Self, AnalysisError> {
        match parse_source(source) {
            Ok(trace) => Ok(Self::Accepted(trace)),
            Err(AnalysisError::Syntax(error)) => Ok(Self::Rejected(error)),
            Err(AnalysisError::Lex(error)) => Ok(Self::Unlexable(error)),
            Err(other) => Err(other),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Self::Accepted(_) => "Syntax Analysis Successful!",
            Self::Rejected(_) => "Syntax Analysis Failed!",
            Self::Unlexable(_) => "Lexical Analysis Failed!",
        }
    }

    /// Header, a rule, a blank line, then the trace or the single error line.
    pub fn render_text(&self) -> String {
        let mut out = format!("{}\n{}\n\n", self.headline(), "=".repeat(RULE_WIDTH));
        match self {
            Self::Accepted(trace) => out.push_str(&trace.to_string()),
            Self::Rejected(error) => {
                out.push_str(&error.to_string());
                out.push('\n');
            }
            Self::Unlexable(error) => {
                out.push_str(&error.to_string());
                out.push('\n');
            }
        }
        out
    }

    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        let view = match self {
            Self::Accepted(trace) => JsonReport::Success { trace },
            Self::Rejected(error) => JsonReport::Failure {
                error,
                message: error.to_string(),
            },
            Self::Unlexable(error) => JsonReport::LexicalFailure {
                message: error.to_string(),
            },
        };
        let mut json = serde_json::to_string_pretty(&view)?;
        json.push('\n');
        Ok(json)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, AnalysisError> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => Ok(self.render_json()?),
        }
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS: User-facing CLI output utilities
// ============================================================================

/// The one-line outcome for a report written to `destination`.
pub fn status_line(report: &Report, destination: &Path) -> (Color, String) {
    let destination = destination.display();
    match report {
        Report::Accepted(_) => (
            Color::Green,
            format!("Success! Output written to {destination}"),
        ),
        Report::Rejected(_) => (
            Color::Red,
            format!("Syntax error found. Check {destination} for details."),
        ),
        Report::Unlexable(_) => (
            Color::Red,
            format!("Lexical error found. Check {destination} for details."),
        ),
    }
}

/// Prints the status line, colored only when stdout is a terminal.
pub fn print_status(report: &Report, destination: &Path) {
    let choice = if std::io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    let (color, message) = status_line(report, destination);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = writeln!(stdout, "{message}");
    let _ = stdout.reset();
}

/// Renders the lexer's view of a file as an aligned two-column table.
pub fn render_token_table(tokens: &[Token]) -> String {
    let mut out = format!("{:<15} {}\n", "token", "lexeme");
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
    for token in tokens.iter().filter(|t| !t.is_eof()) {
        out.push_str(&format!("{:<15} {}\n", token.kind(), token.lexeme()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_report_layout() {
        let report = Report::analyze("# x = 1 ; #").unwrap();
        let text = report.render_text();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Syntax Analysis Successful!"));
        assert_eq!(lines.next(), Some("=".repeat(50).as_str()));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(
            lines.next(),
            Some("    <Rat25F> ::= <Opt Function Definitions> # <Opt Declaration List> <Statement List> #")
        );
    }

    #[test]
    fn test_failure_report_has_single_error_line() {
        let report = Report::analyze("# x = 1 #").unwrap();
        let text = report.render_text();
        let body: Vec<_> = text.lines().skip(3).collect();
        assert_eq!(
            body,
            vec!["Expected ;, but found Separator: '#' at token position 4"]
        );
    }

    #[test]
    fn test_json_report_status() {
        let ok: serde_json::Value =
            serde_json::from_str(&Report::analyze("# x = 1 ; #").unwrap().render_json().unwrap()).unwrap();
        assert_eq!(ok["status"], "success");
        assert!(ok["trace"].as_array().is_some_and(|t| !t.is_empty()));

        let bad: serde_json::Value =
            serde_json::from_str(&Report::analyze("# x = 1 #").unwrap().render_json().unwrap()).unwrap();
        assert_eq!(bad["status"], "failure");
        assert_eq!(bad["error"]["expected"], ";");
        assert_eq!(bad["error"]["found_kind"], "Separator");
        assert_eq!(bad["error"]["index"], 4);
    }

    #[test]
    fn test_lexical_failure_report() {
        let report = Report::analyze("# [* open").unwrap();
        assert!(matches!(report, Report::Unlexable(LexError::UnterminatedComment { offset: 2, .. })));
        assert!(!report.is_success());
        assert!(report.render_text().starts_with("Lexical Analysis Failed!"));
    }

    #[test]
    fn test_syntax_failure_report_keeps_mismatch() {
        let report = Report::analyze("# x = 1 #").unwrap();
        let Report::Rejected(error) = report else {
            panic!("expected a rejected report");
        };
        assert_eq!(error.expected, ";");
        assert_eq!(error.index, 4);
    }

    #[test]
    fn test_status_line_follows_report_kind() {
        let dest = Path::new("out/t1.syntax.txt");

        let (color, ok) = status_line(&Report::analyze("# x = 1 ; #").unwrap(), dest);
        assert_eq!(color, Color::Green);
        assert_eq!(ok, "Success! Output written to out/t1.syntax.txt");

        let (color, bad) = status_line(&Report::analyze("# x = 1 #").unwrap(), dest);
        assert_eq!(color, Color::Red);
        assert_eq!(bad, "Syntax error found. Check out/t1.syntax.txt for details.");

        let (color, unlexable) = status_line(&Report::analyze("# [* open").unwrap(), dest);
        assert_eq!(color, Color::Red);
        assert_eq!(
            unlexable,
            "Lexical error found. Check out/t1.syntax.txt for details."
        );
    }

    #[test]
    fn test_token_table_skips_eof() {
        let tokens = crate::syntax::tokenize("x = 1").unwrap();
        let table = render_token_table(&tokens);
        assert_eq!(table.lines().count(), 2 + 3);
        assert!(table.contains("Identifier      x"));
    }
}
