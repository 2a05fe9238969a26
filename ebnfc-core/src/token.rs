use std::fmt;

/// A single lexical token: a symbolic class name plus the exact lexeme
/// matched for it, with a line/column for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub class: String,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(class: impl Into<String>, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            class: class.into(),
            lexeme: lexeme.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.class, self.lexeme)
    }
}
