//! Rat25F Parser
//!
//! A recursive-descent recognizer with one method per nonterminal. Every rule
//! picks its alternative from the current token alone, records that choice in
//! the trace, and then consumes tokens. The first mismatch ends the parse; it
//! travels back to [`Parser::parse`] through `?` with no local recovery.
//!
//! The list rules (`<IDs>`, `<Declaration List>`, `<Function Definitions>`,
//! `<Parameter List>`, `<Statement List>`) are written as loops. They emit the
//! same trace the right-recursive grammar would, one base production per
//! element and one continuation production before each further element.
//! Nesting still recurses: parenthesized expressions, compound statements and
//! nested `if`/`while` bodies use stack in proportion to how deeply they nest,
//! not to program length.

use tracing::{debug, trace};

use super::token::{QUALIFIERS, RELATIONAL_OPERATORS, STATEMENT_STARTERS};
use super::{Production, Token, TokenKind, TokenStream, Trace, TraceEntry};
use crate::errors::{AnalysisError, SyntaxMismatch, END_OF_INPUT};

/// Either the full derivation trace or the single error that stopped it.
pub type ParseResult = Result<Trace, SyntaxMismatch>;

type Step = Result<(), SyntaxMismatch>;

const PRIMARY_ALTERNATIVES: &str = "Primary (Identifier, Integer, Real, true, false, or '(')";

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses a complete token sequence as a Rat25F program.
pub fn parse(tokens: Vec<Token>) -> ParseResult {
    Parser::new(tokens).parse()
}

/// Tokenizes and parses Rat25F source text.
pub fn parse_source(source: &str) -> Result<Trace, AnalysisError> {
    let tokens = super::lexer::tokenize(source)?;
    Ok(parse(tokens)?)
}

/// What a single `expect` call requires of the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expected {
    Kind(TokenKind),
    Lexeme(&'static str),
}

impl Expected {
    fn matches(self, token: &Token) -> bool {
        match self {
            Self::Kind(kind) => token.kind() == kind,
            Self::Lexeme(lexeme) => token.is(lexeme),
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Kind(kind) => kind.name(),
            Self::Lexeme(lexeme) => lexeme,
        }
    }
}

const IDENTIFIER: Expected = Expected::Kind(TokenKind::Identifier);

/// Parser state for one invocation: the owned token stream and the trace built so far.
#[derive(Debug)]
pub struct Parser {
    stream: TokenStream,
    trace: Trace,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            trace: Trace::new(),
        }
    }

    /// Runs `<Rat25F>` and then requires that nothing but EOF remains.
    pub fn parse(mut self) -> ParseResult {
        debug!(tokens = self.stream.len(), "parsing token stream");

        let outcome = self.rat25f().and_then(|()| {
            if self.stream.is_exhausted() {
                Ok(())
            } else {
                Err(self.error(END_OF_INPUT))
            }
        });

        match outcome {
            Ok(()) => {
                debug!(entries = self.trace.len(), "program accepted");
                Ok(self.trace)
            }
            Err(error) => {
                debug!(%error, "program rejected");
                Err(error)
            }
        }
    }

    // ========================================================================
    // PRIMITIVES
    // ========================================================================

    fn current(&self) -> &Token {
        self.stream.current()
    }

    fn at(&self, lexeme: &str) -> bool {
        self.current().is(lexeme)
    }

    fn at_kind(&self, kind: TokenKind) -> bool {
        self.current().kind() == kind
    }

    fn emit(&mut self, production: Production) {
        trace!(rule = production.rule(), expansion = production.expansion(), "production");
        self.trace.push(TraceEntry::Production(production));
    }

    /// Records the current token as matched and moves past it.
    fn consume(&mut self) {
        let token = self.current().clone();
        self.trace.push(TraceEntry::Matched(token));
        self.stream.advance();
    }

    /// Consumes the current token if it satisfies `expected`; no side effects otherwise.
    fn accept(&mut self, expected: Expected) -> bool {
        if expected.matches(self.current()) {
            self.consume();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Expected) -> Step {
        if self.accept(expected) {
            Ok(())
        } else {
            Err(self.error(expected.description()))
        }
    }

    fn expect_lexeme(&mut self, lexeme: &'static str) -> Step {
        self.expect(Expected::Lexeme(lexeme))
    }

    fn error(&self, expected: &str) -> SyntaxMismatch {
        SyntaxMismatch::new(expected, self.current(), self.stream.index())
    }

    fn starts_statement(&self) -> bool {
        self.at_kind(TokenKind::Identifier) || self.current().is_one_of(STATEMENT_STARTERS)
    }

    // ========================================================================
    // PROGRAM STRUCTURE
    // ========================================================================

    /// `<Rat25F> ::= <Opt Function Definitions> # <Opt Declaration List> <Statement List> #`
    fn rat25f(&mut self) -> Step {
        self.emit(Production::Rat25F);
        self.opt_function_definitions()?;
        self.expect_lexeme("#")?;
        self.opt_declaration_list()?;
        self.statement_list()?;
        self.expect_lexeme("#")
    }

    fn opt_function_definitions(&mut self) -> Step {
        if self.at("function") {
            self.emit(Production::OptFunctionDefinitions);
            self.function_definitions()
        } else {
            self.emit(Production::OptFunctionDefinitionsEmpty);
            self.empty();
            Ok(())
        }
    }

    fn function_definitions(&mut self) -> Step {
        loop {
            self.emit(Production::FunctionDefinitions);
            self.function()?;
            if !self.at("function") {
                return Ok(());
            }
            self.emit(Production::FunctionDefinitionsMore);
        }
    }

    fn function(&mut self) -> Step {
        self.emit(Production::Function);
        self.expect_lexeme("function")?;
        self.expect(IDENTIFIER)?;
        self.expect_lexeme("(")?;
        self.opt_parameter_list()?;
        self.expect_lexeme(")")?;
        self.opt_declaration_list()?;
        self.body()
    }

    fn opt_parameter_list(&mut self) -> Step {
        if self.at_kind(TokenKind::Identifier) {
            self.emit(Production::OptParameterList);
            self.parameter_list()
        } else {
            self.emit(Production::OptParameterListEmpty);
            self.empty();
            Ok(())
        }
    }

    fn parameter_list(&mut self) -> Step {
        loop {
            self.emit(Production::ParameterList);
            self.parameter()?;
            if !self.at(",") {
                return Ok(());
            }
            self.emit(Production::ParameterListMore);
            self.expect_lexeme(",")?;
        }
    }

    fn parameter(&mut self) -> Step {
        self.emit(Production::Parameter);
        self.ids()?;
        self.qualifier()
    }

    fn qualifier(&mut self) -> Step {
        self.emit(Production::Qualifier);
        if self.current().is_one_of(QUALIFIERS) {
            self.consume();
            Ok(())
        } else {
            Err(self.error("integer, boolean, or real"))
        }
    }

    fn body(&mut self) -> Step {
        self.emit(Production::Body);
        self.expect_lexeme("{")?;
        self.statement_list()?;
        self.expect_lexeme("}")
    }

    // ========================================================================
    // DECLARATIONS
    // ========================================================================

    fn opt_declaration_list(&mut self) -> Step {
        if self.current().is_one_of(QUALIFIERS) {
            self.emit(Production::OptDeclarationList);
            self.declaration_list()
        } else {
            self.emit(Production::OptDeclarationListEmpty);
            self.empty();
            Ok(())
        }
    }

    fn declaration_list(&mut self) -> Step {
        loop {
            self.emit(Production::DeclarationList);
            self.declaration()?;
            self.expect_lexeme(";")?;
            if !self.current().is_one_of(QUALIFIERS) {
                return Ok(());
            }
            self.emit(Production::DeclarationListMore);
        }
    }

    fn declaration(&mut self) -> Step {
        self.emit(Production::Declaration);
        self.qualifier()?;
        self.ids()
    }

    /// One or more identifiers separated by commas.
    fn ids(&mut self) -> Step {
        loop {
            self.emit(Production::Ids);
            self.expect(IDENTIFIER)?;
            if !self.at(",") {
                return Ok(());
            }
            self.emit(Production::IdsMore);
            self.expect_lexeme(",")?;
        }
    }

    // ========================================================================
    // STATEMENTS
    // ========================================================================

    /// Continues while the next token can begin a statement; there is no terminator.
    fn statement_list(&mut self) -> Step {
        loop {
            self.emit(Production::StatementList);
            self.statement()?;
            if !self.starts_statement() {
                return Ok(());
            }
            self.emit(Production::StatementListMore);
        }
    }

    fn statement(&mut self) -> Step {
        let lexeme = self.current().lexeme();
        if lexeme == "{" {
            self.emit(Production::StatementCompound);
            self.compound()
        } else if lexeme == "if" {
            self.emit(Production::StatementIf);
            self.if_statement()
        } else if lexeme == "return" {
            self.emit(Production::StatementReturn);
            self.return_statement()
        } else if lexeme == "put" {
            self.emit(Production::StatementPrint);
            self.print_statement()
        } else if lexeme == "get" {
            self.emit(Production::StatementScan);
            self.scan_statement()
        } else if lexeme == "while" {
            self.emit(Production::StatementWhile);
            self.while_statement()
        } else if self.at_kind(TokenKind::Identifier) {
            self.emit(Production::StatementAssign);
            self.assign()
        } else {
            Err(self.error("Statement"))
        }
    }

    fn compound(&mut self) -> Step {
        self.emit(Production::Compound);
        self.expect_lexeme("{")?;
        self.statement_list()?;
        self.expect_lexeme("}")
    }

    fn assign(&mut self) -> Step {
        self.emit(Production::Assign);
        self.expect(IDENTIFIER)?;
        self.expect_lexeme("=")?;
        self.expression()?;
        self.expect_lexeme(";")
    }

    /// The else branch is optional; the closing `fi` is not.
    fn if_statement(&mut self) -> Step {
        self.emit(Production::If);
        self.expect_lexeme("if")?;
        self.expect_lexeme("(")?;
        self.condition()?;
        self.expect_lexeme(")")?;
        self.statement()?;
        if self.at("else") {
            self.emit(Production::IfElse);
            self.expect_lexeme("else")?;
            self.statement()?;
        }
        self.expect_lexeme("fi")
    }

    fn return_statement(&mut self) -> Step {
        self.emit(Production::Return);
        self.expect_lexeme("return")?;
        if !self.at(";") {
            self.emit(Production::ReturnExpression);
            self.expression()?;
        }
        self.expect_lexeme(";")
    }

    fn print_statement(&mut self) -> Step {
        self.emit(Production::Print);
        self.expect_lexeme("put")?;
        self.expect_lexeme("(")?;
        self.expression()?;
        self.expect_lexeme(")")?;
        self.expect_lexeme(";")
    }

    fn scan_statement(&mut self) -> Step {
        self.emit(Production::Scan);
        self.expect_lexeme("get")?;
        self.expect_lexeme("(")?;
        self.ids()?;
        self.expect_lexeme(")")?;
        self.expect_lexeme(";")
    }

    fn while_statement(&mut self) -> Step {
        self.emit(Production::While);
        self.expect_lexeme("while")?;
        self.expect_lexeme("(")?;
        self.condition()?;
        self.expect_lexeme(")")?;
        self.statement()
    }

    // ========================================================================
    // EXPRESSIONS
    // ========================================================================

    fn condition(&mut self) -> Step {
        self.emit(Production::Condition);
        self.expression()?;
        self.relop()?;
        self.expression()
    }

    fn relop(&mut self) -> Step {
        self.emit(Production::Relop);
        if self.current().is_one_of(RELATIONAL_OPERATORS) {
            self.consume();
            Ok(())
        } else {
            Err(self.error("relational operator"))
        }
    }

    /// `<Expression> ::= <Expression> (+|-) <Term> | <Term>`, folded left as a loop.
    fn expression(&mut self) -> Step {
        self.emit(Production::Expression);
        self.term()?;
        loop {
            let production = match self.current().lexeme() {
                "+" => Production::ExpressionPlus,
                "-" => Production::ExpressionMinus,
                _ => return Ok(()),
            };
            self.emit(production);
            self.consume();
            self.term()?;
        }
    }

    fn term(&mut self) -> Step {
        self.emit(Production::Term);
        self.factor()?;
        loop {
            let production = match self.current().lexeme() {
                "*" => Production::TermTimes,
                "/" => Production::TermDivide,
                _ => return Ok(()),
            };
            self.emit(production);
            self.consume();
            self.factor()?;
        }
    }

    /// Unary minus only.
    fn factor(&mut self) -> Step {
        if self.at("-") {
            self.emit(Production::FactorNegated);
            self.consume();
        } else {
            self.emit(Production::Factor);
        }
        self.primary()
    }

    /// `( <Expression> )` re-enters `expression`, so the recursion depth here is
    /// bounded by parenthesis nesting, not by expression length.
    fn primary(&mut self) -> Step {
        if self.at_kind(TokenKind::Identifier) {
            self.emit(Production::PrimaryIdentifier);
            self.consume();
            if self.at("(") {
                self.emit(Production::PrimaryCall);
                self.consume();
                self.ids()?;
                self.expect_lexeme(")")?;
            }
            Ok(())
        } else if self.at_kind(TokenKind::Integer) {
            self.emit(Production::PrimaryInteger);
            self.consume();
            Ok(())
        } else if self.at_kind(TokenKind::Real) {
            self.emit(Production::PrimaryReal);
            self.consume();
            Ok(())
        } else if self.at("true") {
            self.emit(Production::PrimaryTrue);
            self.consume();
            Ok(())
        } else if self.at("false") {
            self.emit(Production::PrimaryFalse);
            self.consume();
            Ok(())
        } else if self.at("(") {
            self.emit(Production::PrimaryParenthesized);
            self.consume();
            self.expression()?;
            self.expect_lexeme(")")
        } else {
            Err(self.error(PRIMARY_ALTERNATIVES))
        }
    }

    fn empty(&mut self) {
        self.emit(Production::Empty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LexError;
    use crate::syntax::tokenize;

    fn parse_text(source: &str) -> ParseResult {
        parse(tokenize(source).unwrap())
    }

    #[test]
    fn test_empty_token_stream_expects_statement_marker() {
        let err = parse(Vec::new()).unwrap_err();
        assert_eq!(err.expected, "#");
        assert_eq!(err.found_kind, TokenKind::Eof);
        assert_eq!(err.index, 0);
    }

    #[test]
    fn test_minimal_program() {
        let trace = parse_text("# x = 1 ; #").unwrap();
        let first: Vec<_> = trace.productions().take(3).collect();
        assert_eq!(
            first,
            vec![
                Production::Rat25F,
                Production::OptFunctionDefinitionsEmpty,
                Production::Empty
            ]
        );
    }

    #[test]
    fn test_mismatch_leaves_no_trace_entry() {
        let mut parser = Parser::new(vec![Token::identifier("x")]);
        assert!(!parser.accept(Expected::Lexeme("#")));
        assert!(parser.trace.is_empty());
        assert_eq!(parser.stream.index(), 0);
    }

    #[test]
    fn test_statement_dispatch_error() {
        let err = parse_text("# ; #").unwrap_err();
        assert_eq!(err.expected, "Statement");
        assert_eq!(err.found_lexeme, ";");
        assert_eq!(err.index, 1);
    }

    #[test]
    fn test_primary_error_names_all_alternatives() {
        let err = parse_text("# x = * ; #").unwrap_err();
        assert_eq!(err.expected, PRIMARY_ALTERNATIVES);
        assert_eq!(err.index, 3);
    }

    #[test]
    fn test_parse_source_separates_lex_and_syntax_errors() {
        assert!(parse_source("# x = 1 ; #").is_ok());
        assert!(matches!(
            parse_source("# x = 1 ; [* never closed"),
            Err(AnalysisError::Lex(LexError::UnterminatedComment { offset: 10, .. }))
        ));
        match parse_source("# x = 1 #") {
            Err(AnalysisError::Syntax(err)) => {
                assert_eq!(err.expected, ";");
                assert_eq!(err.index, 4);
            }
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = parse_text("# x = 1 ; # y").unwrap_err();
        assert!(err.is_trailing_input());
        assert_eq!(err.found_lexeme, "y");
    }
}
