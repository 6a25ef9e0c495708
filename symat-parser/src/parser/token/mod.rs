use crate::{
    parser::{error::Error, Parser, Parse},
    tokenizer::TokenKind,
};
use std::ops::Range;

/// Generates a unit struct for each token kind, along with a [`Parse`] implementation that
/// accepts exactly that kind. This lets the parser request punctuation by type.
macro_rules! token_kinds {
    ($($name:ident)*) => {
        $(
            #[derive(Clone, Debug, PartialEq)]
            pub(crate) struct $name {
                pub(crate) lexeme: String,
                pub(crate) span: Range<usize>,
            }

            impl Parse for $name {
                fn parse(input: &mut Parser) -> Result<Self, Error> {
                    let token = input.next_token()?;

                    if token.kind == TokenKind::$name {
                        Ok(Self {
                            lexeme: token.lexeme.to_owned(),
                            span: token.span,
                        })
                    } else {
                        Err(input.unexpected(&token, &[TokenKind::$name]))
                    }
                }
            }
        )*
    };
}

token_kinds!(
    Assign
    CloseParen
    Name
    Semicolon
);
