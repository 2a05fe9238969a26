//! Turns a token stream back into source text with minimal whitespace:
//! one space between tokens by default, no space before a punctuator,
//! and a forced newline after every preprocessor directive (since a
//! directive is only well-formed on a line by itself).

use crate::c_grammar::{PREPROCESSOR, PUNCTUATOR};
use crate::token::Token;

pub fn reprint(tokens: &[Token]) -> String {
    let mut out = String::new();
    for tok in tokens {
        if tok.class == PREPROCESSOR {
            out.push_str(&tok.lexeme);
            out.push('\n');
        } else if tok.class == PUNCTUATOR {
            if out.ends_with(' ') {
                out.pop();
            }
            out.push_str(&tok.lexeme);
        } else {
            out.push_str(&tok.lexeme);
            out.push(' ');
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(class: &str, lexeme: &str) -> Token {
        Token::new(class, lexeme, 1, 1)
    }

    #[test]
    fn punctuators_never_get_a_leading_space() {
        let tokens = vec![
            tok("KEYWORD", "return"),
            tok("IDENTIFIER", "a"),
            tok("PUNCTUATOR", ";"),
        ];
        assert_eq!(reprint(&tokens), "return a;");
    }

    #[test]
    fn preprocessor_directives_always_end_their_line() {
        let tokens = vec![
            tok("PREPROCESSOR", "#include <stdio.h>"),
            tok("KEYWORD", "int"),
            tok("IDENTIFIER", "a"),
            tok("PUNCTUATOR", ";"),
        ];
        assert_eq!(reprint(&tokens), "#include <stdio.h>\nint a;");
    }

    #[test]
    fn adjacent_punctuators_do_not_accumulate_spaces() {
        let tokens = vec![
            tok("IDENTIFIER", "f"),
            tok("PUNCTUATOR", "("),
            tok("PUNCTUATOR", ")"),
            tok("PUNCTUATOR", "{"),
            tok("PUNCTUATOR", "}"),
        ];
        assert_eq!(reprint(&tokens), "f(){}");
    }

    #[test]
    fn empty_input_reprints_as_an_empty_string() {
        assert_eq!(reprint(&[]), "");
    }
}
