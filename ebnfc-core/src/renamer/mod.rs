//! Scope-aware identifier renaming. Walks a parse tree depth-first and
//! rewrites every declared identifier to a short generated symbol,
//! while leaving uses of undeclared identifiers alone (and reporting
//! them).
//!
//! A `direct_declarator` node is where a name comes into existence. A
//! `compound_statement` or `iteration_statement` node opens a new
//! scope: declarations made while walking its children are visible to
//! it and its descendants but must not leak to its siblings, so the
//! table is cloned on entry and the clone is simply dropped on exit.
//! Everywhere else, identifiers are uses: looked up in the live table
//! and rewritten to whatever they were last bound to.
//!
//! A freshly opened scope inherits its parent's bindings (so a name
//! declared above is visible unless shadowed) but starts with no
//! locally-declared names of its own -- re-declaring a name already
//! bound in an enclosing scope shadows it with a new symbol; only
//! re-declaring a name already declared in the *same* scope is a
//! conflict.

mod symbol;

use std::collections::{HashMap, HashSet};

use crate::c_grammar::IDENTIFIER;
use crate::error::DeclarationConflict;
use crate::tree::{Child, Node};

const COMPOUND_STATEMENT: &str = "compound_statement";
const ITERATION_STATEMENT: &str = "iteration_statement";
const DIRECT_DECLARATOR: &str = "direct_declarator";
const MAIN: &str = "main";

#[derive(Debug, Clone, Default)]
struct SymbolTable {
    bindings: HashMap<String, String>,
    next_index: usize,
    /// Names bound by a declaration seen in this scope (not inherited
    /// from an enclosing one). Reset to empty whenever a new scope is
    /// entered; used only to detect same-scope re-declaration.
    locally_declared: HashSet<String>,
}

impl SymbolTable {
    /// Generates the next symbol, skipping any index whose rendering
    /// collides with a C keyword -- those are already reserved, not
    /// available for a generated name.
    fn fresh(&mut self) -> String {
        loop {
            let sym = symbol::symbol_for(self.next_index);
            self.next_index += 1;
            if !crate::c_grammar::KEYWORDS.contains(&sym.as_str()) {
                return sym;
            }
        }
    }

    /// A child scope: inherits bindings and the fresh-symbol counter,
    /// but starts with no local declarations of its own.
    fn enter_scope(&self) -> Self {
        Self {
            bindings: self.bindings.clone(),
            next_index: self.next_index,
            locally_declared: HashSet::new(),
        }
    }
}

/// Every original name the walk found used with no visible declaration.
/// Not a hard error: the original identifier is left untouched and the
/// minifier continues.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenameReport {
    pub undefined_uses: Vec<String>,
}

/// Renames every declared identifier under `root` in place.
pub fn rename(root: &mut Node) -> Result<RenameReport, DeclarationConflict> {
    let mut table = SymbolTable::default();
    let mut report = RenameReport::default();
    visit(root, &mut table, &mut report)?;
    Ok(report)
}

fn visit(
    node: &mut Node,
    table: &mut SymbolTable,
    report: &mut RenameReport,
) -> Result<(), DeclarationConflict> {
    let declare_mode = node.rule == DIRECT_DECLARATOR;
    let opens_scope = node.rule == COMPOUND_STATEMENT || node.rule == ITERATION_STATEMENT;

    if opens_scope {
        let mut inner = table.enter_scope();
        visit_parts(node, declare_mode, &mut inner, report)?;
        // `inner` is discarded here: `table` (and its fresh-symbol
        // counter) is exactly as it was at scope entry.
    } else {
        visit_parts(node, declare_mode, table, report)?;
    }
    Ok(())
}

fn visit_parts(
    node: &mut Node,
    declare_mode: bool,
    table: &mut SymbolTable,
    report: &mut RenameReport,
) -> Result<(), DeclarationConflict> {
    for part in &mut node.parts {
        for child in &mut part.children {
            match child {
                Child::Token(tok) if tok.class == IDENTIFIER => {
                    if declare_mode {
                        declare(tok, table)?;
                    } else {
                        use_identifier(tok, table, report);
                    }
                }
                Child::Token(_) => {}
                Child::Node(child_node) => visit(child_node, table, report)?,
            }
        }
    }
    Ok(())
}

fn declare(
    tok: &mut crate::token::Token,
    table: &mut SymbolTable,
) -> Result<(), DeclarationConflict> {
    if table.locally_declared.contains(&tok.lexeme) {
        return Err(DeclarationConflict { name: tok.lexeme.clone() });
    }
    let symbol = if tok.lexeme == MAIN {
        MAIN.to_string()
    } else {
        table.fresh()
    };
    table.bindings.insert(tok.lexeme.clone(), symbol.clone());
    table.locally_declared.insert(tok.lexeme.clone());
    tok.lexeme = symbol;
    Ok(())
}

fn use_identifier(tok: &mut crate::token::Token, table: &SymbolTable, report: &mut RenameReport) {
    match table.bindings.get(&tok.lexeme) {
        Some(symbol) => tok.lexeme = symbol.clone(),
        None => {
            log::warn!("identifier `{}` used with no visible declaration", tok.lexeme);
            report.undefined_uses.push(tok.lexeme.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Part;

    fn identifier(lexeme: &str) -> Child {
        Child::Token(crate::token::Token::new(IDENTIFIER, lexeme, 1, 1))
    }

    fn punct(lexeme: &str) -> Child {
        Child::Token(crate::token::Token::new("PUNCTUATOR", lexeme, 1, 1))
    }

    fn declarator(name: &str) -> Node {
        Node::new(DIRECT_DECLARATOR, vec![Part::new(vec![identifier(name)])])
    }

    fn use_of(name: &str) -> Child {
        // a bare identifier leaf standing in for a `primary_expression`
        identifier(name)
    }

    #[test]
    fn declares_a_name_and_rewrites_its_uses() {
        // int x; return x;
        let decl = Node::new(
            "declaration",
            vec![Part::new(vec![Child::Node(declarator("x"))])],
        );
        let ret = Node::new("jump_statement", vec![Part::new(vec![use_of("x")])]);
        let mut root = Node::new(
            "compound_statement",
            vec![Part::new(vec![Child::Node(decl), Child::Node(ret)])],
        );

        let report = rename(&mut root).unwrap();
        assert!(report.undefined_uses.is_empty());

        let declared = &root.parts[0].children[0];
        let used = &root.parts[0].children[1];
        let declared_name = &declared.as_node().unwrap().parts[0].children[0]
            .as_token()
            .unwrap()
            .lexeme;
        let used_name = &used.as_node().unwrap().parts[0].children[0]
            .as_token()
            .unwrap()
            .lexeme;
        assert_eq!(declared_name, "a");
        assert_eq!(used_name, "a");
    }

    #[test]
    fn main_is_never_renamed() {
        let decl = declarator("main");
        let mut root = Node::new(DIRECT_DECLARATOR, decl.parts);
        rename(&mut root).unwrap();
        assert_eq!(root.parts[0].children[0].as_token().unwrap().lexeme, "main");
    }

    #[test]
    fn nested_compound_statement_scopes_its_declarations() {
        // { int y; { int y; } return y; }
        let inner_decl = Node::new(
            "declaration",
            vec![Part::new(vec![Child::Node(declarator("y"))])],
        );
        let inner_block = Node::new(
            COMPOUND_STATEMENT,
            vec![Part::new(vec![Child::Node(inner_decl)])],
        );
        let outer_decl = Node::new(
            "declaration",
            vec![Part::new(vec![Child::Node(declarator("y"))])],
        );
        let outer_ret = Node::new("jump_statement", vec![Part::new(vec![use_of("y")])]);
        let mut root = Node::new(
            COMPOUND_STATEMENT,
            vec![Part::new(vec![
                Child::Node(outer_decl),
                Child::Node(inner_block),
                Child::Node(outer_ret),
            ])],
        );

        let report = rename(&mut root).unwrap();
        assert!(report.undefined_uses.is_empty());

        let outer_symbol = root.parts[0].children[0]
            .as_node()
            .unwrap()
            .parts[0]
            .children[0]
            .as_node()
            .unwrap()
            .parts[0]
            .children[0]
            .as_token()
            .unwrap()
            .lexeme
            .clone();
        let inner_symbol = root.parts[0].children[1]
            .as_node()
            .unwrap()
            .parts[0]
            .children[0]
            .as_node()
            .unwrap()
            .parts[0]
            .children[0]
            .as_node()
            .unwrap()
            .parts[0]
            .children[0]
            .as_token()
            .unwrap()
            .lexeme
            .clone();
        let use_symbol = root.parts[0].children[2]
            .as_node()
            .unwrap()
            .parts[0]
            .children[0]
            .as_token()
            .unwrap()
            .lexeme
            .clone();

        assert_eq!(outer_symbol, "a");
        assert_eq!(inner_symbol, "b");
        assert_eq!(use_symbol, "a", "the outer return sees the outer y, not the inner one");
    }

    #[test]
    fn redeclaring_a_bound_name_in_the_same_scope_is_a_conflict() {
        let first = declarator("x");
        let second = declarator("x");
        let mut root = Node::new(
            COMPOUND_STATEMENT,
            vec![Part::new(vec![Child::Node(first), Child::Node(second)])],
        );
        let err = rename(&mut root).unwrap_err();
        assert_eq!(err.name, "x");
    }

    #[test]
    fn using_an_undeclared_name_is_reported_but_not_fatal() {
        let mut root = Node::new("jump_statement", vec![Part::new(vec![use_of("ghost")])]);
        let report = rename(&mut root).unwrap();
        assert_eq!(report.undefined_uses, vec!["ghost".to_string()]);
        assert_eq!(root.parts[0].children[0].as_token().unwrap().lexeme, "ghost");
    }

    #[test]
    fn generated_symbols_never_collide_with_a_keyword() {
        // symbol_for(222) == "do", symbol_for(473) == "if": both must be
        // skipped by fresh() rather than handed out as a generated name.
        let mut table = SymbolTable::default();
        table.next_index = 222;
        let sym = table.fresh();
        assert!(!crate::c_grammar::KEYWORDS.contains(&sym.as_str()));

        table.next_index = 473;
        let sym = table.fresh();
        assert!(!crate::c_grammar::KEYWORDS.contains(&sym.as_str()));
    }
}
