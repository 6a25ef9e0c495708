use crate::{
    parser::{
        error::{kind, Error},
        expr::Expr,
        token::{Assign, Name, Semicolon},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::ops::Range;
use symat_expr::Symbol;

/// A single `name = expression;` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    /// The name being defined.
    pub name: String,

    /// The region of the source code containing the name.
    pub name_span: Range<usize>,

    /// The value of the expression, before any other definition is substituted into it.
    pub value: Symbol,

    /// The region of the source code containing the whole statement.
    pub span: Range<usize>,
}

impl Parse for Definition {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<Name>()?;

        if input.at_end() {
            return Err(input.error_at(vec![name.span], kind::UnterminatedName {
                name: name.lexeme,
            }));
        }
        input.try_parse::<Assign>()?;

        let expr = input.try_parse::<Expr>()?;
        let semicolon = input.try_parse_with_fn(|input| {
            match input.peek_kind() {
                // a common mistake is to start the next definition without ending this one
                Some(TokenKind::Name) => Err(input.error(kind::UnexpectedToken {
                    expected: &[TokenKind::Semicolon],
                    found: TokenKind::Name,
                })),
                _ => Semicolon::parse(input),
            }
        })?;

        Ok(Self {
            span: name.span.start..semicolon.span.end,
            name: name.lexeme,
            name_span: name.span,
            value: expr.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn simple_definition() {
        let mut parser = Parser::new("  total = 2 * x;");
        let definition = parser.try_parse::<Definition>().unwrap();
        assert_eq!(definition.name, "total");
        assert_eq!(definition.name_span, 2..7);
        assert_eq!(definition.span, 2..16);
        assert_eq!(definition.value.to_string(), "2*x");
        assert!(parser.at_end());
    }

    #[test]
    fn unterminated_name() {
        let mut parser = Parser::new("a = 1;\nlonely");
        parser.try_parse::<Definition>().unwrap();
        let err = parser.try_parse::<Definition>().unwrap_err();
        assert_eq!(
            err.downcast_kind::<kind::UnterminatedName>(),
            Some(&kind::UnterminatedName { name: "lonely".to_string() }),
        );
        assert_eq!((err.line, err.col), (2, 1));
    }

    #[test]
    fn missing_semicolon() {
        let mut parser = Parser::new("a = 1\nb = 2;");
        let err = parser.try_parse::<Definition>().unwrap_err();
        assert_eq!(
            err.downcast_kind::<kind::UnexpectedToken>(),
            Some(&kind::UnexpectedToken {
                expected: &[TokenKind::Semicolon],
                found: TokenKind::Name,
            }),
        );
        assert_eq!((err.line, err.col), (1, 6));
    }

    #[test]
    fn missing_assign() {
        let mut parser = Parser::new("a 1;");
        let err = parser.try_parse::<Definition>().unwrap_err();
        assert_eq!(err.spans, vec![2..3]);
    }
}
