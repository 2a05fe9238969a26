pub mod c_grammar;
pub mod error;
pub mod grammar;
pub mod grammar_loader;
pub mod lexer;
pub mod parser;
pub mod renamer;
pub mod reprinter;
pub mod token;
pub mod tree;

pub use error::CoreError;
pub use grammar::Grammar;
pub use lexer::{Lexer, LexerConfig};
pub use parser::Parser;
pub use renamer::RenameReport;
pub use token::Token;
pub use tree::Node;

/// Loads an EBNF grammar from its textual form and validates it.
pub fn load_grammar(source: &str) -> Result<Grammar, CoreError> {
    let grammar = grammar_loader::load(source)?;
    grammar.validate()?;
    Ok(grammar)
}

/// Lexes `input` with `config` and parses the result starting from
/// `start_rule` against `grammar`.
pub fn parse(grammar: &Grammar, config: &LexerConfig, start_rule: &str, input: &str) -> Result<Node, CoreError> {
    let tokens = Lexer::new(config).lex(input)?;
    let mut parser = Parser::new(grammar);
    Ok(parser.parse(start_rule, &tokens)?)
}

/// The full C minification pipeline: lex, drop comments, parse, rename
/// declared identifiers, reprint with minimal whitespace.
pub fn minify_c(source: &str) -> Result<(String, RenameReport), CoreError> {
    let tokens = Lexer::new(&c_grammar::C_LEXER_CONFIG).lex(source)?;
    let tokens: Vec<Token> = tokens
        .into_iter()
        .filter(|t| t.class != c_grammar::COMMENT)
        .collect();

    let mut parser = Parser::new(&c_grammar::C_GRAMMAR);
    let mut tree = parser.parse(c_grammar::START_RULE, &tokens)?;

    let report = renamer::rename(&mut tree)?;
    let minified = reprinter::reprint(&tree.leaf_tokens().into_iter().cloned().collect::<Vec<_>>());
    Ok((minified, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minifies_a_small_translation_unit() {
        let source = "int main ( ) { int x = 1 ; return x ; }";
        let (minified, report) = minify_c(source).unwrap();
        assert!(report.undefined_uses.is_empty());
        assert!(minified.contains("main"));
        assert!(!minified.contains(" x "), "x should have been renamed");
    }

    #[test]
    fn strips_comments_before_parsing() {
        let source = "/* hi */ int main ( ) { return 0 ; } // trailing";
        let (minified, _) = minify_c(source).unwrap();
        assert!(!minified.contains("hi"));
        assert!(!minified.contains("trailing"));
    }

    #[test]
    fn a_directive_survives_minification_on_its_own_line() {
        let source = "#include <stdio.h>\nint main ( ) { return 0 ; }";
        let (minified, _) = minify_c(source).unwrap();
        assert!(minified.starts_with("#include <stdio.h>\n"));
    }
}
