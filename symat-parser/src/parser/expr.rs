use crate::{
    parser::{
        error::{kind, Error},
        matrix::MatrixLit,
        token::CloseParen,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use log::trace;
use std::ops::Range;
use symat_expr::Symbol;

/// The tokens that can start an operand.
const OPERAND_START: &[TokenKind] = &[
    TokenKind::Number,
    TokenKind::Name,
    TokenKind::OpenParen,
    TokenKind::OpenSquare,
];

/// Same as [`OPERAND_START`], with the leading minus sign.
const EXPR_START: &[TokenKind] = &[
    TokenKind::Sub,
    TokenKind::Number,
    TokenKind::Name,
    TokenKind::OpenParen,
    TokenKind::OpenSquare,
];

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// Returns the additive operator for the given token kind.
    fn additive(kind: Option<TokenKind>) -> Option<Self> {
        match kind? {
            TokenKind::Add => Some(BinOp::Add),
            TokenKind::Sub => Some(BinOp::Sub),
            _ => None,
        }
    }

    /// Returns the multiplicative operator for the given token kind. An opening parenthesis is an
    /// implicit multiplication.
    fn multiplicative(kind: Option<TokenKind>) -> Option<Self> {
        match kind? {
            TokenKind::Mul | TokenKind::OpenParen => Some(BinOp::Mul),
            TokenKind::Div => Some(BinOp::Div),
            _ => None,
        }
    }
}

/// An expression, already combined into a single symbol.
///
/// ```text
/// expr    = term (('+' | '-') term)*
/// term    = unary (('*' | '/') unary | paren)*
/// unary   = '-'? postfix
/// postfix = operand "'"*
/// operand = number | name | '(' expr ')' | matrix
/// ```
///
/// All binary operators are left-associative.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// The value of the expression.
    pub value: Symbol,

    /// The region of the source code that this expression was parsed from.
    pub span: Range<usize>,
}

impl Expr {
    /// Combines two operands with a binary operator. Errors point at the whole binary expression.
    fn combine(input: &Parser, lhs: Expr, op: BinOp, rhs: Expr) -> Result<Expr, Error> {
        let span = lhs.span.start..rhs.span.end;
        trace!("{:?} `{}` and `{}`", op, lhs.value, rhs.value);

        let value = match op {
            BinOp::Add => lhs.value.try_add(rhs.value),
            BinOp::Sub => lhs.value.try_sub(rhs.value),
            BinOp::Mul => lhs.value.try_mul(rhs.value),
            BinOp::Div => lhs.value.try_div(rhs.value),
        }.map_err(|error| input.error_at(vec![span.clone()], kind::InvalidExpression { error }))?;

        Ok(Expr { value, span })
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let mut lhs = parse_term(input)?;
        while let Some(op) = BinOp::additive(input.peek_kind()) {
            input.next_token()?;
            let rhs = parse_term(input)?;
            lhs = Expr::combine(input, lhs, op, rhs)?;
        }
        Ok(lhs)
    }
}

fn parse_term(input: &mut Parser) -> Result<Expr, Error> {
    let mut lhs = parse_unary(input)?;
    while let Some(op) = BinOp::multiplicative(input.peek_kind()) {
        // the parenthesis of an implicit multiplication belongs to the right operand
        if input.peek_kind() != Some(TokenKind::OpenParen) {
            input.next_token()?;
        }
        let rhs = parse_unary(input)?;
        lhs = Expr::combine(input, lhs, op, rhs)?;
    }
    Ok(lhs)
}

/// Parses an operand with an optional leading minus sign. Only one sign is allowed.
fn parse_unary(input: &mut Parser) -> Result<Expr, Error> {
    if input.peek_kind() != Some(TokenKind::Sub) {
        return parse_postfix(input);
    }

    let minus = input.next_token()?;
    if input.peek_kind() == Some(TokenKind::Sub) {
        let token = input.next_token()?;
        return Err(input.unexpected(&token, OPERAND_START));
    }

    let operand = parse_postfix(input)?;
    Ok(Expr {
        value: -operand.value,
        span: minus.span.start..operand.span.end,
    })
}

/// Parses an operand followed by any number of transpose operators.
fn parse_postfix(input: &mut Parser) -> Result<Expr, Error> {
    let mut expr = parse_operand(input)?;
    while input.peek_kind() == Some(TokenKind::Quote) {
        let quote = input.next_token()?;
        expr = match expr.value {
            Symbol::Matrix(matrix) => Expr {
                value: Symbol::Matrix(matrix.transpose()),
                span: expr.span.start..quote.span.end,
            },
            _ => return Err(input.error_at(vec![expr.span, quote.span], kind::TransposeNonMatrix)),
        };
    }
    Ok(expr)
}

fn parse_operand(input: &mut Parser) -> Result<Expr, Error> {
    if input.peek_kind() == Some(TokenKind::OpenSquare) {
        let matrix = input.try_parse::<MatrixLit>()?;
        return Ok(Expr {
            value: Symbol::Matrix(matrix.value),
            span: matrix.span,
        });
    }

    let token = input.next_token()?;
    match token.kind {
        TokenKind::Number => {
            let value = token.lexeme
                .replace('_', "")
                .parse::<f64>()
                .map_err(|_| input.error_at(vec![token.span.clone()], kind::InvalidNumber {
                    lexeme: token.lexeme.to_owned(),
                }))?;
            Ok(Expr { value: Symbol::constant(value), span: token.span })
        },
        TokenKind::Name => Ok(Expr {
            value: Symbol::variable(token.lexeme),
            span: token.span,
        }),
        TokenKind::OpenParen => {
            let inner = input.try_parse::<Expr>()?;
            let close = input.try_parse::<CloseParen>()?;
            Ok(Expr {
                value: inner.value,
                span: token.span.start..close.span.end,
            })
        },
        _ => Err(input.unexpected(&token, EXPR_START)),
    }
}
