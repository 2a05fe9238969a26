use std::cell::Cell;
use std::collections::HashMap;

use crate::error::ParseError;
use crate::grammar::{Alternative, Grammar, Leaf, Modifier};
use crate::token::Token;
use crate::tree::{Child, Node, Part};

/// A cached outcome of matching one rule at one position. Cached even
/// on failure, so repeated probes of a dead end are O(1).
#[derive(Debug, Clone)]
enum CacheEntry {
    Success { node: Node, next_pos: usize },
    Failure,
}

/// Memoized, backtracking, longest-alternative recursive-descent
/// driver over a [`Grammar`]. One instance is used for exactly one
/// `parse()` call; its cache is keyed by token position and must not
/// outlive the token stream it was built against.
pub struct Parser<'g> {
    grammar: &'g Grammar,
    cache: HashMap<(String, usize), CacheEntry>,
    max_position_reached: Cell<usize>,
}

impl<'g> Parser<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            cache: HashMap::new(),
            max_position_reached: Cell::new(0),
        }
    }

    /// Parses `tokens` starting from `start_rule`. Succeeds only if the
    /// start rule matches and consumes every token.
    pub fn parse(&mut self, start_rule: &str, tokens: &[Token]) -> Result<Node, ParseError> {
        self.cache.clear();
        self.max_position_reached.set(0);

        match self.match_rule(start_rule, tokens, 0) {
            CacheEntry::Success { node, next_pos } if next_pos == tokens.len() => Ok(node),
            _ => Err(ParseError {
                start_rule: start_rule.to_string(),
                max_position_reached: self.max_position_reached.get(),
            }),
        }
    }

    pub fn max_position_reached(&self) -> usize {
        self.max_position_reached.get()
    }

    fn note_position(&self, pos: usize) {
        if pos > self.max_position_reached.get() {
            self.max_position_reached.set(pos);
        }
    }

    /// Matches a single leaf at `pos`. `Literal` and `Terminal` consume
    /// exactly one token; `Nonterminal` recurses into `match_rule`.
    fn match_leaf(&mut self, leaf: &Leaf, tokens: &[Token], pos: usize) -> Option<(Child, usize)> {
        match leaf {
            Leaf::Literal(lexeme) => {
                let tok = tokens.get(pos)?;
                if tok.lexeme == *lexeme {
                    let next = pos + 1;
                    self.note_position(next);
                    Some((Child::Token(tok.clone()), next))
                } else {
                    None
                }
            }
            Leaf::Terminal(class) => {
                let tok = tokens.get(pos)?;
                if tok.class == *class {
                    let next = pos + 1;
                    self.note_position(next);
                    Some((Child::Token(tok.clone()), next))
                } else {
                    None
                }
            }
            Leaf::Nonterminal(rule) => match self.match_rule(rule, tokens, pos) {
                CacheEntry::Success { node, next_pos } => {
                    Some((Child::Node(node), next_pos))
                }
                CacheEntry::Failure => None,
            },
        }
    }

    /// Matches an ordered sequence of leaves. All-or-nothing: on any
    /// failure the whole sequence fails with no partial output.
    fn match_leaves(
        &mut self,
        leaves: &[Leaf],
        tokens: &[Token],
        pos: usize,
    ) -> Option<(Vec<Child>, usize)> {
        let mut children = Vec::with_capacity(leaves.len());
        let mut cur = pos;
        for leaf in leaves {
            let (child, next) = self.match_leaf(leaf, tokens, cur)?;
            children.push(child);
            cur = next;
        }
        Some((children, cur))
    }

    /// Matches one alternative: required items must match, optional
    /// items are tried and skipped on failure, repeat items are taken
    /// greedily until they stop matching.
    fn match_alternative(
        &mut self,
        rule_name: &str,
        alt: &Alternative,
        tokens: &[Token],
        pos: usize,
    ) -> Option<(Node, usize)> {
        let mut parts = Vec::with_capacity(alt.items.len());
        let mut cur = pos;

        for item in &alt.items {
            match item.modifier {
                Modifier::Required => {
                    let (children, next) = self.match_leaves(&item.leaves, tokens, cur)?;
                    parts.push(Part::new(children));
                    cur = next;
                }
                Modifier::Optional => {
                    if let Some((children, next)) = self.match_leaves(&item.leaves, tokens, cur) {
                        parts.push(Part::new(children));
                        cur = next;
                    }
                }
                Modifier::RepeatZeroOrMore => {
                    while let Some((children, next)) = self.match_leaves(&item.leaves, tokens, cur) {
                        parts.push(Part::new(children));
                        cur = next;
                    }
                }
            }
        }

        Some((Node::new(rule_name, parts), cur))
    }

    /// Matches a rule at a position: evaluates every alternative (all
    /// of them, even after one has already succeeded) and keeps the one
    /// that consumes the most tokens, first declared wins a tie. Caches
    /// the result, success or failure, under `(rule, pos)`.
    fn match_rule(&mut self, rule_name: &str, tokens: &[Token], pos: usize) -> CacheEntry {
        let key = (rule_name.to_string(), pos);
        if let Some(entry) = self.cache.get(&key) {
            return entry.clone();
        }

        let rule = match self.grammar.rule(rule_name) {
            Some(r) => r,
            None => {
                let entry = CacheEntry::Failure;
                self.cache.insert(key, entry.clone());
                return entry;
            }
        };

        let mut best: Option<(Node, usize)> = None;
        for alt in &rule.alternatives {
            if let Some((node, next_pos)) = self.match_alternative(rule_name, alt, tokens, pos) {
                match &best {
                    Some((_, best_pos)) if *best_pos >= next_pos => {}
                    _ => best = Some((node, next_pos)),
                }
            }
        }

        let entry = match best {
            Some((node, next_pos)) => CacheEntry::Success { node, next_pos },
            None => CacheEntry::Failure,
        };
        self.cache.insert(key, entry.clone());
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Alternative, Item, Leaf, Rule};

    // expr : factor [ '+' expr ]
    // factor : INT { '*' INT }
    fn arithmetic_grammar() -> Grammar {
        let expr = Rule::new(
            "expr",
            vec![Alternative::new(vec![
                Item::required(vec![Leaf::Nonterminal("factor".into())]),
                Item::optional(vec![
                    Leaf::Literal("+".into()),
                    Leaf::Nonterminal("expr".into()),
                ]),
            ])],
        );
        let factor = Rule::new(
            "factor",
            vec![Alternative::new(vec![
                Item::required(vec![Leaf::Terminal("INT".into())]),
                Item::repeat(vec![
                    Leaf::Literal("*".into()),
                    Leaf::Terminal("INT".into()),
                ]),
            ])],
        );
        Grammar::new(vec![expr, factor])
    }

    fn tok(class: &str, lexeme: &str) -> Token {
        Token::new(class, lexeme, 1, 1)
    }

    #[test]
    fn longest_alternative_consumes_the_whole_input() {
        // "1 * 2 + 3" parses fully under `expr`.
        let grammar = arithmetic_grammar();
        let tokens = vec![
            tok("INT", "1"),
            tok("PUNCT", "*"),
            tok("INT", "2"),
            tok("PUNCT", "+"),
            tok("INT", "3"),
        ];
        let mut parser = Parser::new(&grammar);
        let node = parser.parse("expr", &tokens).unwrap();
        assert_eq!(node.rule, "expr");
        assert_eq!(node.leaf_tokens().len(), 5);
    }

    #[test]
    fn unconsumed_input_reports_max_position() {
        // two bare INTs aren't joined by the grammar; only the first
        // is consumed under `expr`.
        let grammar = arithmetic_grammar();
        let tokens = vec![tok("INT", "1"), tok("INT", "2")];
        let mut parser = Parser::new(&grammar);
        let err = parser.parse("expr", &tokens).unwrap_err();
        assert_eq!(err.max_position_reached, 1);
    }

    #[test]
    fn memoization_does_not_change_the_result() {
        let grammar = arithmetic_grammar();
        let tokens = vec![
            tok("INT", "1"),
            tok("PUNCT", "*"),
            tok("INT", "2"),
        ];
        let mut parser = Parser::new(&grammar);
        let first = parser.parse("expr", &tokens).unwrap();
        // re-running the same parser instance re-clears its own cache;
        // the result must be identical either way.
        let second = parser.parse("expr", &tokens).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn undefined_start_rule_fails_cleanly() {
        let grammar = arithmetic_grammar();
        let tokens = vec![tok("INT", "1")];
        let mut parser = Parser::new(&grammar);
        assert!(parser.parse("nope", &tokens).is_err());
    }
}
