use crate::{
    consts::{approx_minus_one, approx_one, approx_zero, Value},
    error::{ExprError, Op},
};
use std::ops::Neg;
use super::{sum::Sum, Symbol};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single number.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constant(pub Value);

impl Constant {
    pub fn value(&self) -> Value {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        approx_zero(self.0)
    }

    pub fn is_one(&self) -> bool {
        approx_one(self.0)
    }

    pub fn is_minus_one(&self) -> bool {
        approx_minus_one(self.0)
    }

    /// Adds `rhs` to this constant. Matrices are handled by [`Symbol::try_add`].
    pub(crate) fn try_add(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        if self.is_zero() {
            return Ok(rhs);
        }

        match rhs {
            Symbol::Constant(rhs) => Ok(Symbol::Constant(Constant(self.0 + rhs.0))),
            Symbol::Sum(sum) => sum.try_add(Symbol::Constant(self)),
            rhs if rhs.is_zero() => Ok(Symbol::Constant(self)),
            rhs => Sum::pair(Symbol::Constant(self), rhs),
        }
    }

    /// Multiplies this constant by `rhs`. Matrices are handled by [`Symbol::try_mul`].
    pub(crate) fn try_mul(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        if self.is_zero() {
            return Ok(Symbol::Constant(Constant(0.0)));
        } else if self.is_one() {
            return Ok(rhs);
        }

        match rhs {
            Symbol::Constant(rhs) => Ok(Symbol::Constant(Constant(self.0 * rhs.0))),
            rhs if self.is_minus_one() => Ok(-rhs),
            Symbol::Variable(variable) => Ok(variable.scale(self.0)),
            Symbol::Sum(sum) => sum.try_rmul(Symbol::Constant(self)),
            Symbol::Product(product) => product.try_rmul(Symbol::Constant(self)),
            Symbol::Matrix(matrix) => matrix.try_rmul(Symbol::Constant(self)),
        }
    }

    /// Divides this constant by `rhs`. Division by a variable produces a variable with a
    /// negated exponent, and dividing by a product divides by each of its factors in turn. Sums
    /// cannot be inverted.
    pub(crate) fn try_div(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        if rhs.is_zero() {
            return Err(ExprError::DivisionByZero);
        }

        match rhs {
            Symbol::Constant(rhs) => Ok(Symbol::Constant(Constant(self.0 / rhs.0))),
            _ if self.is_zero() => Ok(Symbol::Constant(self)),
            Symbol::Variable(variable) => Ok(variable.recip()?.scale(self.0)),
            Symbol::Product(product) => product
                .into_factors()
                .into_iter()
                .try_fold(Symbol::Constant(self), Symbol::try_div),
            Symbol::Matrix(matrix) => Err(ExprError::NonScalarDivisor { shape: matrix.shape() }),
            rhs => Err(ExprError::Unsupported {
                op: Op::Div,
                left: "constant",
                right: rhs.kind_name(),
            }),
        }
    }
}

impl Neg for Constant {
    type Output = Constant;

    fn neg(self) -> Self::Output {
        Constant(-self.0)
    }
}
