use crate::{
    parser::{error::{kind, Error}, expr::Expr, Parse, Parser},
    tokenizer::TokenKind,
};
use std::{mem, ops::Range};
use symat_expr::{Matrix, Symbol};

/// The tokens that can follow an entry of a matrix literal.
const AFTER_ENTRY: &[TokenKind] = &[
    TokenKind::Comma,
    TokenKind::Semicolon,
    TokenKind::CloseSquare,
];

/// A matrix literal, such as `[1, 0; 0, 1]`. Entries are separated by `,` and rows by `;`, and
/// every row must have as many entries as the first.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixLit {
    /// The matrix described by the literal.
    pub value: Matrix,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for MatrixLit {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = input.next_token()?;
        if open.kind != TokenKind::OpenSquare {
            return Err(input.unexpected(&open, &[TokenKind::OpenSquare]));
        }

        if input.peek_kind() == Some(TokenKind::CloseSquare) {
            let close = input.next_token()?;
            return Err(input.error_at(vec![open.span.start..close.span.end], kind::EmptyMatrix));
        }

        let mut rows: Vec<Vec<Symbol>> = Vec::new();
        let mut row = Vec::new();
        let mut row_start = None;

        let close = loop {
            let entry = input.try_parse::<Expr>()?;
            let row_span = *row_start.get_or_insert(entry.span.start)..entry.span.end;
            row.push(entry.value);

            let separator = input.next_token()?;
            match separator.kind {
                TokenKind::Comma => continue,
                TokenKind::Semicolon | TokenKind::CloseSquare => {
                    if let Some(first) = rows.first() {
                        if first.len() != row.len() {
                            return Err(input.error_at(vec![row_span], kind::RowLength {
                                expected: first.len(),
                                found: row.len(),
                            }));
                        }
                    }

                    rows.push(mem::take(&mut row));
                    row_start = None;
                    if separator.kind == TokenKind::CloseSquare {
                        break separator;
                    }
                },
                _ => return Err(input.unexpected(&separator, AFTER_ENTRY)),
            }
        };

        let span = open.span.start..close.span.end;
        let value = Matrix::from_rows(rows)
            .ok_or_else(|| input.error_at(vec![span.clone()], kind::EmptyMatrix))?;
        Ok(Self { value, span })
    }
}
