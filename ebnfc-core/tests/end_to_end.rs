use ebnfc_core::grammar::Modifier;
use ebnfc_core::lexer::{Lexer, LexerConfig};
use ebnfc_core::parser::Parser;
use ebnfc_core::{c_grammar, load_grammar, minify_c};

#[test]
fn lexer_prefers_the_longer_of_two_competing_regexes() {
    let config = LexerConfig::new(&["INT", "SYM"], &["[0-9]+", r"[0-9]+\+"], " ").unwrap();
    let tokens = Lexer::new(&config).lex("12+").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].class, "SYM");
    assert_eq!(tokens[0].lexeme, "12+");
}

#[test]
fn grammar_loader_produces_one_optional_and_one_repeat_item() {
    let source = "expr : factor [ '+' expr ]\nfactor : INT { '*' INT }\n";
    let grammar = load_grammar(source).unwrap();

    let expr = grammar.rule("expr").unwrap();
    assert_eq!(expr.alternatives[0].items[1].modifier, Modifier::Optional);

    let factor = grammar.rule("factor").unwrap();
    assert_eq!(factor.alternatives[0].items[1].modifier, Modifier::RepeatZeroOrMore);
}

#[test]
fn parser_picks_the_alternative_consuming_the_most_tokens() {
    let source = "expr : factor [ '+' expr ]\nfactor : INT { '*' INT }\n";
    let grammar = load_grammar(source).unwrap();
    let config = LexerConfig::new(
        &["INT", "PLUS", "STAR"],
        &["[0-9]+", r"\+", r"\*"],
        " ",
    )
    .unwrap();
    let tokens = Lexer::new(&config).lex("1 * 2 + 3").unwrap();

    let mut parser = Parser::new(&grammar);
    let tree = parser.parse("expr", &tokens).unwrap();

    assert_eq!(tree.rule, "expr");
    assert_eq!(tree.leaf_tokens().len(), 5);

    // root: [factor] ['+' expr]
    assert_eq!(tree.parts.len(), 2);
    let factor = tree.parts[0].children[0].as_node().unwrap();
    assert_eq!(factor.rule, "factor");
    assert_eq!(factor.parts[0].children[0].as_token().unwrap().lexeme, "1");
    assert_eq!(factor.parts[1].children[1].as_token().unwrap().lexeme, "2");

    let tail = &tree.parts[1].children;
    assert_eq!(tail[0].as_token().unwrap().lexeme, "+");
    let nested_expr = tail[1].as_node().unwrap();
    let nested_factor = nested_expr.parts[0].children[0].as_node().unwrap();
    assert_eq!(nested_factor.parts[0].children[0].as_token().unwrap().lexeme, "3");
}

#[test]
fn unjoinable_input_fails_with_the_furthest_position_reached() {
    let source = "expr : factor [ '+' expr ]\nfactor : INT { '*' INT }\n";
    let grammar = load_grammar(source).unwrap();
    let config = LexerConfig::new(&["INT"], &["[0-9]+"], " ").unwrap();
    let tokens = Lexer::new(&config).lex("1 2").unwrap();

    let mut parser = Parser::new(&grammar);
    let err = parser.parse("expr", &tokens).unwrap_err();
    assert_eq!(err.max_position_reached, 1);
}

#[test]
fn renaming_respects_nested_block_scope() {
    let source = "int f(int x){ int y=x; { int y=1; return y; } return y; }";
    let (minified, report) = minify_c(source).unwrap();
    assert!(report.undefined_uses.is_empty());
    assert_eq!(minified, "int a(int b){int c=b;{int d=1;return d;}return c;}");
}

#[test]
fn minifying_a_whitespace_heavy_program_strips_all_but_necessary_spaces() {
    let source = "int  main ( void ) {\n  return  0 ;\n}\n";
    let (minified, report) = minify_c(source).unwrap();
    assert!(report.undefined_uses.is_empty());
    assert_eq!(minified, "int main(void){return 0;}");
}

#[test]
fn the_c_grammar_and_lexer_are_internally_consistent() {
    assert!(c_grammar::C_GRAMMAR.rule(c_grammar::START_RULE).is_some());
    let _ = &*c_grammar::C_LEXER_CONFIG;
}

#[test]
fn reparsing_an_already_minified_program_reprints_it_unchanged() {
    let first = minify_c("int main(void){int a=1;return a;}").unwrap().0;
    let second = minify_c(&first).unwrap().0;
    assert_eq!(first, second);
}
