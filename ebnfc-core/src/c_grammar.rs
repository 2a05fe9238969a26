//! The concrete C lexer configuration and EBNF grammar the minifier
//! uses. Token classes and regexes follow the classic tokenization of
//! a small C dialect; the grammar itself is the standard ISO C
//! declaration/statement/expression grammar, left-factored throughout
//! (expressions, declarations and statements are all rewritten into
//! repetition-based forms, since this engine's parser does not support
//! left recursion).
//!
//! The grammar is written in the same textual EBNF format
//! [`crate::grammar_loader`] parses -- this crate eats its own dog
//! food rather than hand-building [`Grammar`] values with Rust
//! constructors.

use once_cell::sync::Lazy;

use crate::grammar::Grammar;
use crate::grammar_loader;
use crate::lexer::LexerConfig;

/// Token class name for identifiers.
pub const IDENTIFIER: &str = "IDENTIFIER";
/// Token class name for numeric and character constants.
pub const CONSTANT: &str = "CONSTANT";
/// Token class name for string literals.
pub const STRINGLITERAL: &str = "STRINGLITERAL";
/// Token class name for keywords (`if`, `int`, `return`, ...).
pub const KEYWORD: &str = "KEYWORD";
/// Token class name for punctuators (`{`, `;`, `->`, ...).
pub const PUNCTUATOR: &str = "PUNCTUATOR";
/// Token class name for `<...>`/`"..."` header names. In practice it
/// never wins the longest-match race because [`PREPROCESSOR`] swallows
/// the whole directive line it would otherwise appear inside (see
/// DESIGN.md).
pub const HEADERNAME: &str = "HEADERNAME";
/// Token class name for comments. Lexed so they can be located and
/// dropped before parsing; never reaches the grammar.
pub const COMMENT: &str = "COMMENT";
/// Token class name for preprocessor directives. The regex matches a
/// whole logical line starting at `#`, and the grammar accepts a
/// `PREPROCESSOR` terminal wherever an external declaration or a block
/// item may appear, so directives ride through the parse tree as
/// opaque leaves instead of being stripped out-of-band.
pub const PREPROCESSOR: &str = "PREPROCESSOR";

pub(crate) const KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Bool", "_Complex", "_Imaginary",
];

fn keyword_pattern() -> String {
    // Longest-match across rules resolves KEYWORD vs IDENTIFIER; the
    // only thing that matters here is that no keyword is a strict
    // prefix of another one in this list (true for C's keyword set),
    // so alternation order within this single regex cannot misfire.
    KEYWORDS.join("|")
}

fn punctuator_pattern() -> &'static str {
    // Longest operators first: within one regex's alternation, Rust's
    // `regex` crate uses leftmost-first (not leftmost-longest)
    // semantics, so a short operator listed before a longer one that
    // shares its prefix would shadow it.
    concat!(
        r"<<=|>>=|\.\.\.",
        r"|->|\+\+|\-\-|<<|>>|<=|>=|==|!=|&&|\|\||\*=|/=|%=|\+=|\-=|&=|\^=|\|=|##",
        r"|\[|\]|\(|\)|\{|\}|\.|&|\*|\+|\-|~|!|/|%|<|>|\^|\||\?|:|;|=|,|#"
    )
}

fn constant_pattern() -> String {
    let floating = concat!(
        r"[0-9]*\.[0-9]+([eE][+-]?[0-9]+)?[fFlL]?",
        r"|[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?[fFlL]?",
        r"|[0-9]+[eE][+-]?[0-9]+[fFlL]?",
    );
    let integer = r"0[xX][0-9a-fA-F]+[uUlL]*|[1-9][0-9]*[uUlL]*|0[0-7]*[uUlL]*";
    let char_constant = r"[L]?'([^'\\\n]|\\.)+'";
    format!("{floating}|{integer}|{char_constant}")
}

/// Builds the [`LexerConfig`] used to tokenize C source for the
/// minifier. Order: directives and comments first (their regexes are
/// shaped so they can only ever win by being longer anyway), then
/// literals, then keywords before identifiers (the tiebreaker for
/// equal-length matches), then punctuators last.
pub fn c_lexer_config() -> LexerConfig {
    let constant = constant_pattern();
    let keyword = keyword_pattern();
    LexerConfig::new(
        &[
            PREPROCESSOR,
            COMMENT,
            STRINGLITERAL,
            HEADERNAME,
            CONSTANT,
            KEYWORD,
            IDENTIFIER,
            PUNCTUATOR,
        ],
        &[
            r"#[^\n]*",
            r"/\*([^*]|\*[^/])*\*/|//[^\n]*",
            r#""([^"\\\n]|\\.)*""#,
            r#"<[^>\n]+>|"[^"\n]+""#,
            &constant,
            &keyword,
            r"[A-Za-z_][A-Za-z0-9_]*",
            punctuator_pattern(),
        ],
        " \t\r\n",
    )
    .expect("the C lexer configuration is well-formed")
}

const C_GRAMMAR_SOURCE: &str = r#"
translation_unit : external_declaration { external_declaration }

external_declaration : function_definition
	| declaration
	| PREPROCESSOR

function_definition : declaration_specifiers declarator compound_statement
	| declaration_specifiers declarator declaration_list compound_statement

declaration_list : declaration { declaration }

declaration : declaration_specifiers ';'
	| declaration_specifiers init_declarator_list ';'

declaration_specifiers : declaration_specifier { declaration_specifier }

declaration_specifier : storage_class_specifier
	| type_specifier
	| type_qualifier
	| function_specifier

storage_class_specifier : 'typedef'
	| 'extern'
	| 'static'
	| 'auto'
	| 'register'

type_specifier : 'void'
	| 'char'
	| 'short'
	| 'int'
	| 'long'
	| 'float'
	| 'double'
	| 'signed'
	| 'unsigned'
	| '_Bool'
	| '_Complex'
	| struct_or_union_specifier
	| enum_specifier

type_qualifier : 'const'
	| 'restrict'
	| 'volatile'

function_specifier : 'inline'

struct_or_union_specifier : struct_or_union IDENTIFIER '{' struct_declaration_list '}'
	| struct_or_union '{' struct_declaration_list '}'
	| struct_or_union IDENTIFIER

struct_or_union : 'struct'
	| 'union'

struct_declaration_list : struct_declaration { struct_declaration }

struct_declaration : specifier_qualifier_list struct_declarator_list ';'

specifier_qualifier_list : specifier_qualifier { specifier_qualifier }

specifier_qualifier : type_specifier
	| type_qualifier

struct_declarator_list : struct_declarator { ',' struct_declarator }

struct_declarator : declarator ':' constant_expression
	| declarator
	| ':' constant_expression

enum_specifier : 'enum' IDENTIFIER '{' enumerator_list '}'
	| 'enum' '{' enumerator_list '}'
	| 'enum' IDENTIFIER

enumerator_list : enumerator { ',' enumerator }

enumerator : IDENTIFIER '=' constant_expression
	| IDENTIFIER

declarator : pointer direct_declarator
	| direct_declarator

pointer : '*' type_qualifier_list pointer
	| '*' pointer
	| '*' type_qualifier_list
	| '*'

type_qualifier_list : type_qualifier { type_qualifier }

direct_declarator : IDENTIFIER { direct_declarator_suffix }
	| '(' declarator ')' { direct_declarator_suffix }

direct_declarator_suffix : '[' constant_expression ']'
	| '[' ']'
	| '(' parameter_type_list ')'
	| '(' identifier_list ')'
	| '(' ')'

identifier_list : IDENTIFIER { ',' IDENTIFIER }

parameter_type_list : parameter_list ',' '...'
	| parameter_list

parameter_list : parameter_declaration { ',' parameter_declaration }

parameter_declaration : declaration_specifiers declarator
	| declaration_specifiers abstract_declarator
	| declaration_specifiers

type_name : specifier_qualifier_list abstract_declarator
	| specifier_qualifier_list

abstract_declarator : pointer direct_abstract_declarator
	| pointer
	| direct_abstract_declarator

direct_abstract_declarator : '(' abstract_declarator ')' { direct_abstract_declarator_suffix }
	| direct_abstract_declarator_suffix { direct_abstract_declarator_suffix }

direct_abstract_declarator_suffix : '[' constant_expression ']'
	| '[' ']'
	| '(' parameter_type_list ')'
	| '(' ')'

init_declarator_list : init_declarator { ',' init_declarator }

init_declarator : declarator '=' initializer
	| declarator

initializer : '{' initializer_list ',' '}'
	| '{' initializer_list '}'
	| assignment_expression

initializer_list : designation_initializer { ',' designation_initializer }

designation_initializer : designation initializer
	| initializer

designation : designator_list '='

designator_list : designator { designator }

designator : '[' constant_expression ']'
	| '.' IDENTIFIER

statement : labeled_statement
	| compound_statement
	| expression_statement
	| selection_statement
	| iteration_statement
	| jump_statement

labeled_statement : IDENTIFIER ':' statement
	| 'case' constant_expression ':' statement
	| 'default' ':' statement

compound_statement : '{' block_item_list '}'
	| '{' '}'

block_item_list : block_item { block_item }

block_item : declaration
	| statement
	| PREPROCESSOR

expression_statement : expression ';'
	| ';'

selection_statement : 'if' '(' expression ')' statement 'else' statement
	| 'if' '(' expression ')' statement
	| 'switch' '(' expression ')' statement

iteration_statement : 'while' '(' expression ')' statement
	| 'do' statement 'while' '(' expression ')' ';'
	| 'for' '(' expression ';' expression ';' expression ')' statement
	| 'for' '(' expression ';' expression ';' ')' statement
	| 'for' '(' expression ';' ';' expression ')' statement
	| 'for' '(' expression ';' ';' ')' statement
	| 'for' '(' ';' expression ';' expression ')' statement
	| 'for' '(' ';' expression ';' ')' statement
	| 'for' '(' ';' ';' expression ')' statement
	| 'for' '(' ';' ';' ')' statement
	| 'for' '(' declaration expression ';' expression ')' statement
	| 'for' '(' declaration expression ';' ')' statement
	| 'for' '(' declaration ';' expression ')' statement
	| 'for' '(' declaration ';' ')' statement

jump_statement : 'goto' IDENTIFIER ';'
	| 'continue' ';'
	| 'break' ';'
	| 'return' expression ';'
	| 'return' ';'

expression : assignment_expression { ',' assignment_expression }

assignment_expression : unary_expression assignment_operator assignment_expression
	| conditional_expression

assignment_operator : '='
	| '*='
	| '/='
	| '%='
	| '+='
	| '-='
	| '<<='
	| '>>='
	| '&='
	| '^='
	| '|='

conditional_expression : logical_or_expression '?' expression ':' conditional_expression
	| logical_or_expression

constant_expression : conditional_expression

logical_or_expression : logical_and_expression { '||' logical_and_expression }

logical_and_expression : inclusive_or_expression { '&&' inclusive_or_expression }

inclusive_or_expression : exclusive_or_expression { '|' exclusive_or_expression }

exclusive_or_expression : and_expression { '^' and_expression }

and_expression : equality_expression { '&' equality_expression }

equality_expression : relational_expression { equality_operator relational_expression }

equality_operator : '=='
	| '!='

relational_expression : shift_expression { relational_operator shift_expression }

relational_operator : '<='
	| '>='
	| '<'
	| '>'

shift_expression : additive_expression { shift_operator additive_expression }

shift_operator : '<<'
	| '>>'

additive_expression : multiplicative_expression { additive_operator multiplicative_expression }

additive_operator : '+'
	| '-'

multiplicative_expression : cast_expression { multiplicative_operator cast_expression }

multiplicative_operator : '*'
	| '/'
	| '%'

cast_expression : '(' type_name ')' cast_expression
	| unary_expression

unary_expression : '++' unary_expression
	| '--' unary_expression
	| unary_operator cast_expression
	| 'sizeof' '(' type_name ')'
	| 'sizeof' unary_expression
	| postfix_expression

unary_operator : '&'
	| '*'
	| '+'
	| '-'
	| '~'
	| '!'

postfix_expression : primary_expression { postfix_suffix }

postfix_suffix : '[' expression ']'
	| '(' argument_expression_list ')'
	| '(' ')'
	| '.' IDENTIFIER
	| '->' IDENTIFIER
	| '++'
	| '--'

argument_expression_list : assignment_expression { ',' assignment_expression }

primary_expression : IDENTIFIER
	| CONSTANT
	| STRINGLITERAL
	| '(' expression ')'
"#;

/// Builds the C grammar by loading the EBNF source above through the
/// same loader every other grammar goes through. The start rule is
/// `translation_unit`.
pub fn c_grammar() -> Grammar {
    let grammar = grammar_loader::load(C_GRAMMAR_SOURCE)
        .expect("the built-in C grammar source is well-formed EBNF");
    grammar
        .validate()
        .expect("the built-in C grammar has no undefined nonterminals or empty-matching repeats");
    grammar
}

pub static C_GRAMMAR: Lazy<Grammar> = Lazy::new(c_grammar);
pub static C_LEXER_CONFIG: Lazy<LexerConfig> = Lazy::new(c_lexer_config);

pub const START_RULE: &str = "translation_unit";
