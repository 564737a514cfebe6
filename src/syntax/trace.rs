//! Derivation trace
//!
//! A pre-order record of the productions the parser chose, interleaved with
//! the tokens it consumed at the moment of consumption.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::Token;

/// One alternative of one Rat25F nonterminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Production {
    Rat25F,
    OptFunctionDefinitions,
    OptFunctionDefinitionsEmpty,
    FunctionDefinitions,
    FunctionDefinitionsMore,
    Function,
    OptParameterList,
    OptParameterListEmpty,
    ParameterList,
    ParameterListMore,
    Parameter,
    Qualifier,
    Body,
    OptDeclarationList,
    OptDeclarationListEmpty,
    DeclarationList,
    DeclarationListMore,
    Declaration,
    Ids,
    IdsMore,
    StatementList,
    StatementListMore,
    StatementCompound,
    StatementAssign,
    StatementIf,
    StatementReturn,
    StatementPrint,
    StatementScan,
    StatementWhile,
    Compound,
    Assign,
    If,
    IfElse,
    Return,
    ReturnExpression,
    Print,
    Scan,
    While,
    Condition,
    Relop,
    Expression,
    ExpressionPlus,
    ExpressionMinus,
    Term,
    TermTimes,
    TermDivide,
    FactorNegated,
    Factor,
    PrimaryIdentifier,
    PrimaryCall,
    PrimaryInteger,
    PrimaryReal,
    PrimaryTrue,
    PrimaryFalse,
    PrimaryParenthesized,
    Empty,
}

impl Production {
    /// The nonterminal on the left-hand side.
    pub const fn rule(self) -> &'static str {
        self.parts().0
    }

    /// The right-hand side of this alternative.
    pub const fn expansion(self) -> &'static str {
        self.parts().1
    }

    const fn parts(self) -> (&'static str, &'static str) {
        use Production::*;
        match self {
            Rat25F => (
                "Rat25F",
                "<Opt Function Definitions> # <Opt Declaration List> <Statement List> #",
            ),
            OptFunctionDefinitions => ("Opt Function Definitions", "<Function Definitions>"),
            OptFunctionDefinitionsEmpty => ("Opt Function Definitions", "<Empty>"),
            FunctionDefinitions => ("Function Definitions", "<Function>"),
            FunctionDefinitionsMore => ("Function Definitions", "<Function> <Function Definitions>"),
            Function => (
                "Function",
                "function <Identifier> ( <Opt Parameter List> ) <Opt Declaration List> <Body>",
            ),
            OptParameterList => ("Opt Parameter List", "<Parameter List>"),
            OptParameterListEmpty => ("Opt Parameter List", "<Empty>"),
            ParameterList => ("Parameter List", "<Parameter>"),
            ParameterListMore => ("Parameter List", "<Parameter> , <Parameter List>"),
            Parameter => ("Parameter", "<IDs> <Qualifier>"),
            Qualifier => ("Qualifier", "integer | boolean | real"),
            Body => ("Body", "{ <Statement List> }"),
            OptDeclarationList => ("Opt Declaration List", "<Declaration List>"),
            OptDeclarationListEmpty => ("Opt Declaration List", "<Empty>"),
            DeclarationList => ("Declaration List", "<Declaration> ;"),
            DeclarationListMore => ("Declaration List", "<Declaration> ; <Declaration List>"),
            Declaration => ("Declaration", "<Qualifier> <IDs>"),
            Ids => ("IDs", "<Identifier>"),
            IdsMore => ("IDs", "<Identifier> , <IDs>"),
            StatementList => ("Statement List", "<Statement>"),
            StatementListMore => ("Statement List", "<Statement> <Statement List>"),
            StatementCompound => ("Statement", "<Compound>"),
            StatementAssign => ("Statement", "<Assign>"),
            StatementIf => ("Statement", "<If>"),
            StatementReturn => ("Statement", "<Return>"),
            StatementPrint => ("Statement", "<Print>"),
            StatementScan => ("Statement", "<Scan>"),
            StatementWhile => ("Statement", "<While>"),
            Compound => ("Compound", "{ <Statement List> }"),
            Assign => ("Assign", "<Identifier> = <Expression> ;"),
            If => ("If", "if ( <Condition> ) <Statement> fi"),
            IfElse => ("If", "if ( <Condition> ) <Statement> else <Statement> fi"),
            Return => ("Return", "return ;"),
            ReturnExpression => ("Return", "return <Expression> ;"),
            Print => ("Print", "put ( <Expression> );"),
            Scan => ("Scan", "get ( <IDs> );"),
            While => ("While", "while ( <Condition> ) <Statement>"),
            Condition => ("Condition", "<Expression> <Relop> <Expression>"),
            Relop => ("Relop", "== | != | > | < | <= | =>"),
            Expression => ("Expression", "<Term>"),
            ExpressionPlus => ("Expression", "<Expression> + <Term>"),
            ExpressionMinus => ("Expression", "<Expression> - <Term>"),
            Term => ("Term", "<Factor>"),
            TermTimes => ("Term", "<Term> * <Factor>"),
            TermDivide => ("Term", "<Term> / <Factor>"),
            FactorNegated => ("Factor", "- <Primary>"),
            Factor => ("Factor", "<Primary>"),
            PrimaryIdentifier => ("Primary", "<Identifier>"),
            PrimaryCall => ("Primary", "<Identifier> ( <IDs> )"),
            PrimaryInteger => ("Primary", "<Integer>"),
            PrimaryReal => ("Primary", "<Real>"),
            PrimaryTrue => ("Primary", "true"),
            PrimaryFalse => ("Primary", "false"),
            PrimaryParenthesized => ("Primary", "( <Expression> )"),
            Empty => ("Empty", "ε"),
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "    <{}> ::= {}", self.rule(), self.expansion())
    }
}

impl Serialize for Production {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Production", 2)?;
        state.serialize_field("rule", self.rule())?;
        state.serialize_field("expansion", self.expansion())?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum TraceEntry {
    /// The parser committed to this alternative.
    Production(Production),
    /// The parser consumed this token.
    Matched(Token),
}

impl TraceEntry {
    pub fn as_production(&self) -> Option<Production> {
        match self {
            Self::Production(p) => Some(*p),
            Self::Matched(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Matched(t) => Some(t),
            Self::Production(_) => None,
        }
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production(p) => p.fmt(f),
            Self::Matched(t) => write!(f, "Token: {:<15} Lexeme: {}", t.kind(), t.lexeme()),
        }
    }
}

/// The ordered derivation of an accepted program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn productions(&self) -> impl Iterator<Item = Production> + '_ {
        self.entries.iter().filter_map(TraceEntry::as_production)
    }

    /// Consumed tokens, in consumption order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> + '_ {
        self.entries.iter().filter_map(TraceEntry::as_token)
    }

    /// The rendered report lines, one per entry.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(ToString::to_string)
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_line_format() {
        assert_eq!(
            Production::OptFunctionDefinitionsEmpty.to_string(),
            "    <Opt Function Definitions> ::= <Empty>"
        );
        assert_eq!(Production::Empty.to_string(), "    <Empty> ::= ε");
    }

    #[test]
    fn test_token_line_pads_kind() {
        let entry = TraceEntry::Matched(Token::identifier("x"));
        assert_eq!(entry.to_string(), "Token: Identifier      Lexeme: x");
    }

    #[test]
    fn test_trace_filters() {
        let mut trace = Trace::new();
        trace.push(TraceEntry::Production(Production::Ids));
        trace.push(TraceEntry::Matched(Token::identifier("a")));
        assert_eq!(trace.productions().collect::<Vec<_>>(), vec![Production::Ids]);
        assert_eq!(trace.tokens().count(), 1);
        assert_eq!(trace.to_string().lines().count(), 2);
    }

    #[test]
    fn test_entries_serialize_with_tag() {
        let entry = TraceEntry::Production(Production::Relop);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["entry"], "production");
        assert_eq!(json["rule"], "Relop");
    }
}
