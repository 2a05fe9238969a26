//! Parses the textual EBNF grammar format into a [`Grammar`].
//! Tokenization is delegated to the same generic [`crate::lexer::Lexer`]
//! used everywhere else in this crate -- the loader's own fixed
//! tokenization is simply one more [`LexerConfig`], built once and
//! reused. The bootstrap parser on top of those tokens is hand-written
//! recursive descent (`peek`/`advance`/`check`/`consume`), since this
//! grammar is small, fixed, and not itself expressed in terms of the
//! engine it is used to configure.

use once_cell::sync::Lazy;

use crate::error::GrammarLoadError;
use crate::grammar::{Alternative, Grammar, Item, Leaf, Rule};
use crate::lexer::{Lexer, LexerConfig};
use crate::token::Token;

static META_LEXER_CONFIG: Lazy<LexerConfig> = Lazy::new(|| {
    LexerConfig::new(
        &[
            "TERMINAL",
            "NONTERMINAL",
            "LITERAL",
            "NEWLINE",
            "COLON",
            "PIPE",
            "LBRACKET",
            "RBRACKET",
            "LBRACE",
            "RBRACE",
        ],
        &[
            "[A-Z_]+",
            "[a-z_]+",
            "'[^']*'",
            "\n",
            ":",
            r"\|",
            r"\[",
            r"\]",
            r"\{",
            r"\}",
        ],
        " \t\r",
    )
    .expect("the EBNF meta-grammar's own lexer configuration is well-formed")
});

pub fn load(source: &str) -> Result<Grammar, GrammarLoadError> {
    let lexer = Lexer::new(&META_LEXER_CONFIG);
    let tokens = lexer.lex(source).map_err(|e| {
        let bad_char = e.prefix.chars().next().unwrap_or('\u{0}');
        GrammarLoadError::UnknownCharacter(bad_char, e.line)
    })?;
    let mut parser = LoaderParser { tokens, current: 0 };
    parser.parse_grammar()
}

struct LoaderParser {
    tokens: Vec<Token>,
    current: usize,
}

impl LoaderParser {
    fn parse_grammar(&mut self) -> Result<Grammar, GrammarLoadError> {
        let mut rules = Vec::new();
        while !self.is_at_end() {
            if self.check("NEWLINE") {
                self.advance();
                continue;
            }
            rules.push(self.parse_rule()?);
        }
        Ok(Grammar::new(rules))
    }

    fn parse_rule(&mut self) -> Result<Rule, GrammarLoadError> {
        let name_tok = self.consume("NONTERMINAL", "a rule name")?;
        let name = name_tok.lexeme.clone();
        self.consume("COLON", "':'")?;

        let mut alternatives = vec![self.parse_production()?];
        self.consume_newline_or_eof()?;

        while self.check("PIPE") {
            self.advance();
            alternatives.push(self.parse_production()?);
            self.consume_newline_or_eof()?;
        }

        Ok(Rule::new(name, alternatives))
    }

    fn consume_newline_or_eof(&mut self) -> Result<(), GrammarLoadError> {
        if self.is_at_end() {
            return Ok(());
        }
        self.consume("NEWLINE", "end of line")?;
        Ok(())
    }

    /// A production is a run of items: bracketed groups parse as one
    /// item each, and any stretch of bare terminal/nonterminal/literal
    /// leaves between groups collapses into a single required item.
    fn parse_production(&mut self) -> Result<Alternative, GrammarLoadError> {
        let mut items = Vec::new();
        loop {
            if self.check("LBRACKET") {
                items.push(self.parse_group("LBRACKET", "RBRACKET", true)?);
            } else if self.check("LBRACE") {
                items.push(self.parse_group("LBRACE", "RBRACE", false)?);
            } else if self.is_leaf_start() {
                let mut leaves = vec![self.parse_leaf()?];
                while self.is_leaf_start() {
                    leaves.push(self.parse_leaf()?);
                }
                items.push(Item::required(leaves));
            } else {
                break;
            }
        }
        if items.is_empty() {
            return Err(GrammarLoadError::UnexpectedToken {
                expected: "at least one item in a production",
                found: self.peek_description(),
                line: self.current_line(),
            });
        }
        Ok(Alternative::new(items))
    }

    fn parse_group(
        &mut self,
        open: &'static str,
        close: &'static str,
        optional: bool,
    ) -> Result<Item, GrammarLoadError> {
        self.consume(open, open)?;
        let mut leaves = Vec::new();
        while self.is_leaf_start() {
            leaves.push(self.parse_leaf()?);
        }
        if self.check("LBRACKET") || self.check("LBRACE") {
            return Err(GrammarLoadError::NestedGrouping(self.current_line()));
        }
        if !self.check(close) {
            return Err(GrammarLoadError::UnbalancedGrouping(self.current_line()));
        }
        self.advance();
        Ok(if optional {
            Item::optional(leaves)
        } else {
            Item::repeat(leaves)
        })
    }

    fn is_leaf_start(&self) -> bool {
        self.check("TERMINAL") || self.check("NONTERMINAL") || self.check("LITERAL")
    }

    fn parse_leaf(&mut self) -> Result<Leaf, GrammarLoadError> {
        let tok = self.advance();
        match tok.class.as_str() {
            "TERMINAL" => Ok(Leaf::Terminal(tok.lexeme.clone())),
            "NONTERMINAL" => Ok(Leaf::Nonterminal(tok.lexeme.clone())),
            "LITERAL" => {
                let trimmed = tok.lexeme.trim_matches('\'').to_string();
                Ok(Leaf::Literal(trimmed))
            }
            other => Err(GrammarLoadError::UnexpectedToken {
                expected: "TERMINAL, NONTERMINAL, or LITERAL",
                found: other.to_string(),
                line: tok.line,
            }),
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn peek_description(&self) -> String {
        match self.peek() {
            Some(t) => format!("{}({:?})", t.class, t.lexeme),
            None => "end of input".to_string(),
        }
    }

    fn current_line(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(0)
    }

    fn check(&self, class: &str) -> bool {
        self.peek().map(|t| t.class == class).unwrap_or(false)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.current].clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        tok
    }

    fn consume(&mut self, class: &'static str, expected: &'static str) -> Result<Token, GrammarLoadError> {
        if self.check(class) {
            Ok(self.advance())
        } else if self.is_at_end() {
            Err(GrammarLoadError::UnexpectedEof)
        } else {
            Err(GrammarLoadError::UnexpectedToken {
                expected,
                found: self.peek_description(),
                line: self.current_line(),
            })
        }
    }
}
