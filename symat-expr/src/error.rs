//! Errors raised while combining values.

use crate::shape::Shape;
use std::fmt;

/// An arithmetic operation, used to describe where an [`ExprError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Mul,
    Div,
    Pow,
}

impl Op {
    /// The symbol of the operation as written in the definition language.
    pub fn symbol(&self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Pow => "^",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Op::Add => "add",
            Op::Mul => "multiply",
            Op::Div => "divide",
            Op::Pow => "exponentiate",
        })
    }
}

/// An error raised by the arithmetic and matrix layers.
///
/// These are never recovered from locally. They propagate to whoever asked for the operation,
/// which for parsed programs means the whole parse fails.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprError {
    /// The operands have shapes that are incompatible for the operation.
    DimensionMismatch {
        op: Op,
        left: Shape,
        right: Shape,
    },

    /// The divisor is zero, or within tolerance of it.
    DivisionByZero,

    /// The divisor is not a scalar.
    NonScalarDivisor {
        shape: Shape,
    },

    /// The operation is not defined between the two kinds of value, e.g. dividing by a sum.
    Unsupported {
        op: Op,
        left: &'static str,
        right: &'static str,
    },

    /// A range of factors was requested that is empty, reversed or out of bounds.
    InvalidRange {
        start: usize,
        end: usize,
        len: usize,
    },
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::DimensionMismatch { op, left, right } => write!(
                f,
                "cannot {} values of shape {} and {} (`{} {} {}`)",
                op, left, right, left, op.symbol(), right,
            ),
            ExprError::DivisionByZero => f.write_str("division by zero"),
            ExprError::NonScalarDivisor { shape } => {
                write!(f, "cannot divide by a value of shape {}", shape)
            },
            ExprError::Unsupported { op, left, right } => write!(
                f,
                "unsupported operation: {} {} {}",
                left, op.symbol(), right,
            ),
            ExprError::InvalidRange { start, end, len } => write!(
                f,
                "invalid factor range {}..={} for a product of {} factors",
                start, end, len,
            ),
        }
    }
}

impl std::error::Error for ExprError {}
