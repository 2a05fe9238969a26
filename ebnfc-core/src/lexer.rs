use regex::Regex;

use crate::error::LexError;
use crate::token::Token;

/// One named pattern in a [`LexerConfig`]. Order matters: it is the
/// tiebreaker between two regexes that match the same length at the
/// same position (lower index wins).
#[derive(Debug, Clone)]
pub struct TokenRule {
    pub class: String,
    pub regex: Regex,
}

impl TokenRule {
    pub fn new(class: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        // anchor so `find` only matches starting exactly at the search position
        let anchored = format!("^(?:{pattern})");
        Ok(Self {
            class: class.into(),
            regex: Regex::new(&anchored)?,
        })
    }
}

/// Ordered list of named regexes plus a set of characters to skip
/// between tokens. Constructed once, read-only thereafter.
#[derive(Debug, Clone)]
pub struct LexerConfig {
    rules: Vec<TokenRule>,
    ignore: Vec<char>,
}

impl LexerConfig {
    /// Builds a configuration from parallel name/regex lists plus an
    /// ignore set.
    ///
    /// Rejects any regex that can match the empty string -- accepting
    /// one would let the lexer stall forever at one position.
    pub fn new(
        names: &[&str],
        patterns: &[&str],
        ignore: &str,
    ) -> Result<Self, LexerConfigError> {
        if names.len() != patterns.len() {
            return Err(LexerConfigError::MismatchedLengths {
                names: names.len(),
                patterns: patterns.len(),
            });
        }
        let mut rules = Vec::with_capacity(names.len());
        for (name, pattern) in names.iter().zip(patterns.iter()) {
            let rule = TokenRule::new(*name, pattern)
                .map_err(|e| LexerConfigError::InvalidRegex((*name).to_string(), e))?;
            if rule.regex.is_match("") {
                return Err(LexerConfigError::EmptyMatchingRule((*name).to_string()));
            }
            rules.push(rule);
        }
        Ok(Self {
            rules,
            ignore: ignore.chars().collect(),
        })
    }

    pub fn from_rules(rules: Vec<TokenRule>, ignore: &str) -> Result<Self, LexerConfigError> {
        for rule in &rules {
            if rule.regex.is_match("") {
                return Err(LexerConfigError::EmptyMatchingRule(rule.class.clone()));
            }
        }
        Ok(Self {
            rules,
            ignore: ignore.chars().collect(),
        })
    }

    fn is_ignorable(&self, c: char) -> bool {
        self.ignore.contains(&c)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LexerConfigError {
    #[error("{names} names but {patterns} patterns were supplied")]
    MismatchedLengths { names: usize, patterns: usize },
    #[error("regex for token class {0:?} is invalid: {1}")]
    InvalidRegex(String, regex::Error),
    #[error("regex for token class {0:?} matches the empty string")]
    EmptyMatchingRule(String),
}

/// Longest-match tokenizer over a [`LexerConfig`]. Owns no mutable
/// global state; it is read by reference and can be reused across many
/// `lex` calls.
pub struct Lexer<'a> {
    config: &'a LexerConfig,
}

impl<'a> Lexer<'a> {
    pub fn new(config: &'a LexerConfig) -> Self {
        Self { config }
    }

    /// Tokenizes the whole input, or fails at the first unmatched,
    /// non-ignored character.
    pub fn lex(&self, input: &str) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut pos = 0usize;
        let mut line = 1usize;
        let mut line_start = 0usize;

        while pos < input.len() {
            let ch = match input[pos..].chars().next() {
                Some(c) => c,
                None => break,
            };

            if self.config.is_ignorable(ch) {
                if ch == '\n' {
                    line += 1;
                    line_start = pos + ch.len_utf8();
                }
                pos += ch.len_utf8();
                continue;
            }

            match self.longest_match(input, pos) {
                Some((rule_index, matched_len)) => {
                    let lexeme = &input[pos..pos + matched_len];
                    let column = pos - line_start + 1;
                    tokens.push(Token::new(
                        self.config.rules[rule_index].class.clone(),
                        lexeme,
                        line,
                        column,
                    ));
                    let newlines = lexeme.matches('\n').count();
                    if newlines > 0 {
                        line += newlines;
                        // position right after the last newline inside the lexeme
                        let last_nl = lexeme.rfind('\n').unwrap();
                        line_start = pos + last_nl + 1;
                    }
                    pos += matched_len;
                }
                None => {
                    let column = pos - line_start + 1;
                    let prefix: String = input[pos..].chars().take(16).collect();
                    return Err(LexError { line, column, prefix });
                }
            }
        }

        Ok(tokens)
    }

    /// Tries every configured regex at `pos`; returns the index of the
    /// rule with the longest match, earliest index breaking ties.
    fn longest_match(&self, input: &str, pos: usize) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        for (i, rule) in self.config.rules.iter().enumerate() {
            if let Some(m) = rule.regex.find(&input[pos..]) {
                let len = m.end();
                if len == 0 {
                    continue;
                }
                match best {
                    Some((_, best_len)) if len <= best_len => {}
                    _ => best = Some((i, len)),
                }
            }
        }
        best
    }
}
