pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// A lexer over `input`, yielding token kinds.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. Input the lexer
/// cannot match is kept as [`TokenKind::Symbol`] tokens, so that the parser can report it.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind: result.unwrap_or(TokenKind::Symbol),
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Asserts that `input` lexes to exactly the given kinds and lexemes.
    fn compare_tokens<'source, const N: usize>(
        input: &'source str,
        expected: [(TokenKind, &'source str); N],
    ) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn definition() {
        compare_tokens(
            "answer = 7.5*(1 + 2);",
            [
                (TokenKind::Name, "answer"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Assign, "="),
                (TokenKind::Whitespace, " "),
                (TokenKind::Number, "7.5"),
                (TokenKind::Mul, "*"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Number, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Number, "2"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::Semicolon, ";"),
            ],
        );
    }

    #[test]
    fn matrix_literal() {
        compare_tokens(
            "[a_b,.5;\n1_000.,c]'",
            [
                (TokenKind::OpenSquare, "["),
                (TokenKind::Name, "a_b"),
                (TokenKind::Comma, ","),
                (TokenKind::Number, ".5"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Whitespace, "\n"),
                (TokenKind::Number, "1_000."),
                (TokenKind::Comma, ","),
                (TokenKind::Name, "c"),
                (TokenKind::CloseSquare, "]"),
                (TokenKind::Quote, "'"),
            ],
        );
    }

    #[test]
    fn unknown_characters() {
        compare_tokens(
            "x $ _y",
            [
                (TokenKind::Name, "x"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Symbol, "$"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Symbol, "_"),
                (TokenKind::Name, "y"),
            ],
        );
    }
}
