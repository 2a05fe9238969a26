use thiserror::Error;

/// No regex matched at a non-ignored character.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("lex error at line {line}, column {column}: no rule matched near {prefix:?}")]
pub struct LexError {
    pub line: usize,
    pub column: usize,
    /// The first few characters of the unmatched remainder, for diagnostics.
    pub prefix: String,
}

/// Malformed EBNF grammar text.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GrammarLoadError {
    #[error("unexpected character {0:?} at line {1}")]
    UnknownCharacter(char, usize),
    #[error("unbalanced grouping at line {0}")]
    UnbalancedGrouping(usize),
    #[error("nested grouping is not supported at line {0}")]
    NestedGrouping(usize),
    #[error("expected {expected} at line {line}, found {found:?}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        line: usize,
    },
    #[error("unexpected end of grammar input")]
    UnexpectedEof,
}

/// A reference to a nonterminal that was never defined, or a repeat item
/// that can match the empty sequence.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GrammarValidationError {
    #[error("rule {0:?} references undefined nonterminal {1:?}")]
    UndefinedNonterminal(String, String),
    #[error("rule {0:?} has no alternatives")]
    EmptyRule(String),
    #[error("rule {0:?} contains a repeat item that can match the empty sequence")]
    EmptyMatchingRepeat(String),
}

/// A top-level parse failed to consume the whole token stream.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("parse error: failed to match start rule {start_rule:?}; furthest position reached was {max_position_reached}")]
pub struct ParseError {
    pub start_rule: String,
    pub max_position_reached: usize,
}

/// The same identifier was declared twice within one lexical scope.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("identifier {name:?} is already declared in this scope")]
pub struct DeclarationConflict {
    pub name: String,
}

/// Umbrella error covering every failure mode the core can surface.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    GrammarLoad(#[from] GrammarLoadError),
    #[error(transparent)]
    GrammarValidation(#[from] GrammarValidationError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    DeclarationConflict(#[from] DeclarationConflict),
}
