pub mod definition;
pub mod error;
pub mod expr;
pub mod matrix;
pub mod token;

use error::{Error, kind};
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use symat_error::ErrorKind;
use std::ops::Range;

/// A cursor over the tokens of a program. Values are folded into symbols as they are parsed, so
/// the parser produces definitions rather than a syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The source code, used to locate errors by line and column.
    source: &'source str,

    /// Every token of the source, whitespace included.
    tokens: Box<[Token<'source>]>,

    /// Position in `tokens` of the token that [`Parser::next_token`] looks at first.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Tokenizes `source` and places the cursor before the first token.
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error at [`Parser::span`].
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        self.error_at(vec![self.span()], kind)
    }

    /// Creates an error that points at the given spans.
    pub fn error_at(&self, spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Error {
        Error::new(self.source, spans, kind)
    }

    /// Creates the error for finding `token` where one of `expected` should be. Characters that
    /// are not part of the language are reported as such.
    pub fn unexpected(&self, token: &Token, expected: &'static [TokenKind]) -> Error {
        if token.kind == TokenKind::Symbol {
            self.error_at(vec![token.span.clone()], kind::UnexpectedCharacter {
                character: token.lexeme.to_owned(),
            })
        } else {
            self.error_at(vec![token.span.clone()], kind::UnexpectedToken {
                expected,
                found: token.kind,
            })
        }
    }

    /// The empty span just past the last token.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// The span of the token under the cursor, which may be whitespace, or [`Parser::eof_span`]
    /// once every token is consumed.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the kind of the next non-whitespace token without moving the cursor.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
            .map(|token| token.kind)
    }

    /// Returns true if only whitespace is left.
    pub fn at_end(&self) -> bool {
        self.peek_kind().is_none()
    }

    /// Consumes whitespace and then one more token, which is returned. Running out of tokens is an
    /// [`kind::UnexpectedEof`] error.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if !token.is_whitespace() {
                return Ok(token.clone());
            }
        }

        Err(self.error(kind::UnexpectedEof))
    }

    /// Parses a `T` at the cursor. On failure, the cursor is restored, so another parse can be
    /// attempted from the same place.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Like [`Parser::try_parse`], with a parsing function in place of a [`Parse`] impl.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }
}

/// A piece of the grammar.
pub trait Parse: Sized {
    /// Parses the piece at the cursor. The cursor may be left anywhere on failure; callers go
    /// through [`Parser::try_parse`], which restores it.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use super::*;
    use super::expr::Expr;
    use symat_expr::{ExprError, Matrix, Op, Shape, Symbol, Variable};

    /// Parses a single expression.
    fn parse_expr(source: &str) -> Result<Symbol, Error> {
        let mut parser = Parser::new(source);
        let expr = parser.try_parse::<Expr>()?;
        assert!(parser.at_end(), "input left over after `{}`", source);
        Ok(expr.value)
    }

    fn constant(source: &str) -> f64 {
        parse_expr(source).unwrap().as_constant().unwrap()
    }

    #[test]
    fn arithmetic() {
        assert_float_absolute_eq!(constant("1 + 2"), 3.0);
        assert_float_absolute_eq!(constant("1 + 2 * 3"), 7.0);
        assert_float_absolute_eq!(constant("5 - 2 - 1"), 2.0);
        assert_float_absolute_eq!(constant("12 / 2 / 3"), 2.0);
        assert_float_absolute_eq!(constant("-3 * -2"), 6.0);
    }

    #[test]
    fn implicit_multiplication() {
        assert_float_absolute_eq!(constant("7.5*(1+2)"), 22.5);
        assert_float_absolute_eq!(constant("7.5(1+2)"), 22.5);
        assert_float_absolute_eq!(constant("(1 + 1)(2)(3)"), 12.0);
    }

    #[test]
    fn numbers() {
        assert_float_absolute_eq!(constant("1_000.5"), 1000.5);
        assert_float_absolute_eq!(constant(".5"), 0.5);
        assert_float_absolute_eq!(constant("2."), 2.0);
    }

    #[test]
    fn like_terms() {
        assert_eq!(
            parse_expr("x + x").unwrap(),
            Symbol::Variable(Variable::with("x", 2.0, 1.0)),
        );
        assert_eq!(parse_expr("x * x / x").unwrap(), Symbol::variable("x"));
    }

    #[test]
    fn matrix_literal() {
        let result = parse_expr("[1, 2; 3, 4]").unwrap();
        let matrix = result.as_matrix().unwrap();
        assert_eq!(matrix.shape(), Shape::new(2, 2));
        assert_eq!(matrix.get(1, 0), Some(&Symbol::constant(3.0)));
    }

    #[test]
    fn transpose() {
        let result = parse_expr("[1, 2, 3]'").unwrap();
        assert_eq!(result.as_matrix().unwrap().shape(), Shape::new(3, 1));

        let result = parse_expr("[1, 2]''").unwrap();
        assert_eq!(result.as_matrix().unwrap().shape(), Shape::new(1, 2));

        let err = parse_expr("x'").unwrap_err();
        assert!(err.downcast_kind::<kind::TransposeNonMatrix>().is_some());
        assert_eq!(err.spans, vec![0..1, 1..2]);
    }

    #[test]
    fn negation() {
        assert_eq!(
            parse_expr("-[1, 0]").unwrap(),
            Symbol::Matrix(Matrix::from_rows(vec![vec![
                Symbol::constant(-1.0),
                Symbol::constant(0.0),
            ]]).unwrap()),
        );

        let err = parse_expr("--x").unwrap_err();
        assert!(err.downcast_kind::<kind::UnexpectedToken>().is_some());
        assert_eq!(err.spans, vec![1..2]);
    }

    #[test]
    fn row_length() {
        let err = parse_expr("[1, 2;\n 3]").unwrap_err();
        assert_eq!(
            err.downcast_kind::<kind::RowLength>(),
            Some(&kind::RowLength { expected: 2, found: 1 }),
        );
        assert_eq!((err.line, err.col), (2, 2));
    }

    #[test]
    fn empty_matrix() {
        let err = parse_expr("[]").unwrap_err();
        assert!(err.downcast_kind::<kind::EmptyMatrix>().is_some());
    }

    #[test]
    fn shape_mismatch() {
        let err = parse_expr("[1, 0; 0, 1] + [1, 2, 3]").unwrap_err();
        assert_eq!(
            err.downcast_kind::<kind::InvalidExpression>(),
            Some(&kind::InvalidExpression {
                error: ExprError::DimensionMismatch {
                    op: Op::Add,
                    left: Shape::new(2, 2),
                    right: Shape::new(1, 3),
                },
            }),
        );
        assert_eq!(err.spans, vec![0..24]);
    }

    #[test]
    fn division_by_zero() {
        let err = parse_expr("1 / (2 - 2)").unwrap_err();
        assert_eq!(
            err.downcast_kind::<kind::InvalidExpression>(),
            Some(&kind::InvalidExpression { error: ExprError::DivisionByZero }),
        );
    }

    #[test]
    fn unexpected_character() {
        let err = parse_expr("1 + $").unwrap_err();
        assert_eq!(
            err.downcast_kind::<kind::UnexpectedCharacter>(),
            Some(&kind::UnexpectedCharacter { character: "$".to_string() }),
        );
        assert_eq!((err.line, err.col), (1, 5));
    }

    #[test]
    fn unclosed_paren() {
        let err = parse_expr("(1 + 2").unwrap_err();
        assert!(err.downcast_kind::<kind::UnexpectedEof>().is_some());
    }
}
