use std::collections::HashMap;

use crate::error::GrammarValidationError;

/// A single matchable atom in a production: the three ways a
/// production can reference something to match against the token
/// stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    /// Matches any token whose class equals this name.
    Terminal(String),
    /// Matches any token whose lexeme equals this text exactly,
    /// regardless of class.
    Literal(String),
    /// Matches by invoking the named rule.
    Nonterminal(String),
}

/// How many times an [`Item`]'s leaf sequence must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Required,
    Optional,
    RepeatZeroOrMore,
}

/// An ordered sequence of leaves plus a modifier. Invariant: a plain
/// sequence without `[...]`/`{...}` grouping is `Required`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub leaves: Vec<Leaf>,
    pub modifier: Modifier,
}

impl Item {
    pub fn required(leaves: Vec<Leaf>) -> Self {
        Self { leaves, modifier: Modifier::Required }
    }

    pub fn optional(leaves: Vec<Leaf>) -> Self {
        Self { leaves, modifier: Modifier::Optional }
    }

    pub fn repeat(leaves: Vec<Leaf>) -> Self {
        Self { leaves, modifier: Modifier::RepeatZeroOrMore }
    }
}

/// One way to match a rule: an ordered sequence of items.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Alternative {
    pub items: Vec<Item>,
}

impl Alternative {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
}

/// A named rule: a non-empty ordered list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub alternatives: Vec<Alternative>,
}

impl Rule {
    pub fn new(name: impl Into<String>, alternatives: Vec<Alternative>) -> Self {
        Self { name: name.into(), alternatives }
    }
}

/// An ordered list of rules. The start symbol is supplied at parse
/// time, not stored here.
///
/// Rules reference each other by name rather than by direct reference
/// to break the natural cycle in the rule graph -- see DESIGN.md's
/// note on cyclic grammar graphs.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: Vec<Rule>,
    by_name: HashMap<String, usize>,
}

impl Grammar {
    pub fn new(rules: Vec<Rule>) -> Self {
        let by_name = rules
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();
        Self { rules, by_name }
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.by_name.get(name).map(|&i| &self.rules[i])
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Checks that every `Nonterminal` leaf resolves to a defined rule,
    /// every rule has at least one alternative, and no repeat item can
    /// match the empty leaf sequence (an empty-matching repeat would
    /// loop forever in the parser).
    pub fn validate(&self) -> Result<(), GrammarValidationError> {
        for rule in &self.rules {
            if rule.alternatives.is_empty() {
                return Err(GrammarValidationError::EmptyRule(rule.name.clone()));
            }
            for alt in &rule.alternatives {
                for item in &alt.items {
                    if item.modifier == Modifier::RepeatZeroOrMore && item.leaves.is_empty() {
                        return Err(GrammarValidationError::EmptyMatchingRepeat(rule.name.clone()));
                    }
                    for leaf in &item.leaves {
                        if let Leaf::Nonterminal(name) = leaf {
                            if !self.by_name.contains_key(name) {
                                return Err(GrammarValidationError::UndefinedNonterminal(
                                    rule.name.clone(),
                                    name.clone(),
                                ));
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
