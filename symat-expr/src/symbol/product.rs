use crate::{
    consts::{approx_one, approx_zero, Value},
    error::{ExprError, Op},
    shape::Shape,
};
use std::ops::{Neg, RangeInclusive};
use super::{sum::Sum, Constant, Symbol, Variable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Two or more factors multiplied together.
///
/// Factors are kept in the order they were multiplied in, since matrix factors do not commute.
/// Multiplying a node into a product appends it without trying to combine it with the existing
/// factors; that is left to the optimizer. The only exception is constants, which are folded into
/// a single leading constant factor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Product {
    factors: Vec<Symbol>,
}

impl Product {
    /// Builds a symbol out of the given factors. No factors is the constant `1`, and a single
    /// factor is returned as is.
    pub fn from_factors(mut factors: Vec<Symbol>) -> Symbol {
        match factors.len() {
            0 => Symbol::Constant(Constant(1.0)),
            1 => factors.remove(0),
            _ => Symbol::Product(Product { factors }),
        }
    }

    /// Builds `coefficient * factors[0] * factors[1] * ...`, with the coefficient as a leading
    /// constant factor unless it is `1`.
    pub(crate) fn scaled(coefficient: Value, mut factors: Vec<Symbol>) -> Result<Symbol, ExprError> {
        if approx_zero(coefficient) {
            return Ok(Symbol::Constant(Constant(0.0)));
        }

        match factors.len() {
            0 => Ok(Symbol::Constant(Constant(coefficient))),
            1 => Constant(coefficient).try_mul(factors.remove(0)),
            _ => {
                if !approx_one(coefficient) {
                    factors.insert(0, Symbol::Constant(Constant(coefficient)));
                }
                Ok(Symbol::Product(Product { factors }))
            },
        }
    }

    /// Builds `lhs * rhs` as a product without any simplification, splicing in the factors of
    /// operands that are already products. The non-scalar factors must chain.
    pub(crate) fn chain(lhs: Symbol, rhs: Symbol) -> Result<Symbol, ExprError> {
        let mut factors = Vec::new();
        for operand in [lhs, rhs] {
            match operand {
                Symbol::Product(product) => factors.extend(product.factors),
                other => factors.push(other),
            }
        }
        Product { factors }.checked()
    }

    pub fn factors(&self) -> &[Symbol] {
        &self.factors
    }

    pub fn into_factors(self) -> Vec<Symbol> {
        self.factors
    }

    /// The number of factors, always at least 2.
    pub fn num_factors(&self) -> usize {
        self.factors.len()
    }

    /// Returns a copy of the factors in `range`, multiplied together.
    pub fn range(&self, range: RangeInclusive<usize>) -> Result<Symbol, ExprError> {
        let (start, end) = (*range.start(), *range.end());
        if start > end || end >= self.factors.len() {
            return Err(ExprError::InvalidRange {
                start,
                end,
                len: self.factors.len(),
            });
        }

        Ok(Product::from_factors(self.factors[start..=end].to_vec()))
    }

    /// Returns the shape of the product. Scalar factors do not affect the shape; the non-scalar
    /// factors must chain like a matrix product.
    pub fn shape(&self) -> Result<Shape, ExprError> {
        let mut chain: Option<Shape> = None;
        for factor in &self.factors {
            let shape = factor.shape()?;
            if shape.is_scalar() {
                continue;
            }

            chain = Some(match chain {
                None => shape,
                Some(left) if left.cols == shape.rows => Shape::new(left.rows, shape.cols),
                Some(left) => return Err(ExprError::DimensionMismatch {
                    op: Op::Mul,
                    left,
                    right: shape,
                }),
            });
        }

        Ok(chain.unwrap_or(Shape::SCALAR))
    }

    /// Applies `f` to every factor, keeping the structure of the product.
    pub(crate) fn map_factors<F>(self, f: F) -> Result<Product, ExprError>
    where
        F: FnMut(Symbol) -> Result<Symbol, ExprError>,
    {
        let factors = self.factors.into_iter().map(f).collect::<Result<Vec<_>, _>>()?;
        Ok(Product { factors })
    }

    /// Splits the product into its numeric coefficient and the remaining symbolic factors. The
    /// quantities of variable factors are moved into the coefficient.
    fn split_coefficient(&self) -> (Value, Vec<Symbol>) {
        let mut coefficient = 1.0;
        let mut rest = Vec::with_capacity(self.factors.len());
        for factor in &self.factors {
            match factor {
                Symbol::Constant(Constant(value)) => coefficient *= value,
                Symbol::Variable(variable) => {
                    coefficient *= variable.quantity;
                    rest.push(Symbol::Variable(Variable { quantity: 1.0, ..variable.clone() }));
                },
                other => rest.push(other.clone()),
            }
        }
        (coefficient, rest)
    }

    /// Returns the product as a symbol, after checking that its factors chain.
    fn checked(self) -> Result<Symbol, ExprError> {
        self.shape()?;
        Ok(Symbol::Product(self))
    }

    /// Multiplies the product by a number, folding it into the leading constant factor.
    fn mul_constant(mut self, value: Value) -> Symbol {
        if approx_zero(value) {
            return Symbol::Constant(Constant(0.0));
        } else if approx_one(value) {
            return Symbol::Product(self);
        }

        match self.factors.first_mut() {
            Some(Symbol::Constant(leading)) => {
                leading.0 *= value;
                if leading.is_one() {
                    self.factors.remove(0);
                    return Product::from_factors(self.factors);
                }
            },
            _ => self.factors.insert(0, Symbol::Constant(Constant(value))),
        }
        Symbol::Product(self)
    }

    /// Adds `rhs` to this product. Two products whose symbolic factors are equal are like terms,
    /// and merge by adding their coefficients: `2xy + 3xy = 5xy`. Scalar factors commute, so
    /// `xy + yx = 2xy` as well.
    pub(crate) fn try_add(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        if rhs.is_zero() {
            return Ok(Symbol::Product(self));
        }

        match rhs {
            Symbol::Sum(sum) => sum.try_add(Symbol::Product(self)),
            Symbol::Product(rhs) => {
                let (left_coefficient, left_rest) = self.split_coefficient();
                let (right_coefficient, right_rest) = rhs.split_coefficient();
                if !left_rest.is_empty() && same_factors(&left_rest, &right_rest) {
                    Product::scaled(left_coefficient + right_coefficient, left_rest)
                } else {
                    Sum::pair(Symbol::Product(self), Symbol::Product(rhs))
                }
            },
            rhs => Sum::pair(Symbol::Product(self), rhs),
        }
    }

    /// Multiplies this product by `rhs`, appending it as the last factor.
    pub(crate) fn try_mul(mut self, rhs: Symbol) -> Result<Symbol, ExprError> {
        match rhs {
            Symbol::Constant(Constant(value)) => Ok(self.mul_constant(value)),
            Symbol::Sum(sum) => sum.try_rmul(Symbol::Product(self)),
            Symbol::Matrix(matrix) => matrix.try_rmul(Symbol::Product(self)),
            Symbol::Product(rhs) => {
                self.factors.extend(rhs.factors);
                self.checked()
            },
            rhs => {
                self.factors.push(rhs);
                self.checked()
            },
        }
    }

    /// Multiplies `lhs` by this product, inserting it as the first factor.
    pub(crate) fn try_rmul(mut self, lhs: Symbol) -> Result<Symbol, ExprError> {
        match lhs {
            Symbol::Constant(Constant(value)) => Ok(self.mul_constant(value)),
            Symbol::Sum(sum) => sum.try_mul(Symbol::Product(self)),
            Symbol::Matrix(matrix) => matrix.try_mul(Symbol::Product(self)),
            Symbol::Product(mut lhs) => {
                lhs.factors.append(&mut self.factors);
                lhs.checked()
            },
            lhs => {
                self.factors.insert(0, lhs);
                self.checked()
            },
        }
    }

    /// Divides this product by `rhs`.
    ///
    /// A constant divisor is folded into the leading constant. A variable divisor is divided out
    /// of the first factor with the same name, or appended as a reciprocal if there is none.
    /// Dividing by a product divides by each of its factors in turn.
    pub(crate) fn try_div(mut self, rhs: Symbol) -> Result<Symbol, ExprError> {
        if rhs.is_zero() {
            return Err(ExprError::DivisionByZero);
        }

        match rhs {
            Symbol::Constant(Constant(value)) => Ok(self.mul_constant(value.recip())),
            Symbol::Variable(divisor) => {
                let position = self.factors.iter().position(|factor| {
                    matches!(factor, Symbol::Variable(v) if v.name == divisor.name)
                });
                let Some(index) = position else {
                    self.factors.push(Symbol::Variable(divisor.recip()?));
                    return self.checked();
                };

                let factor = std::mem::take(&mut self.factors[index]);
                match factor.try_div(Symbol::Variable(divisor))? {
                    Symbol::Constant(constant) => {
                        self.factors.remove(index);
                        self.factors
                            .into_iter()
                            .try_fold(Symbol::Constant(constant), Symbol::try_mul)
                    },
                    divided => {
                        self.factors[index] = divided;
                        Ok(Symbol::Product(self))
                    },
                }
            },
            Symbol::Product(rhs) => rhs
                .factors
                .into_iter()
                .try_fold(Symbol::Product(self), Symbol::try_div),
            Symbol::Matrix(matrix) => Err(ExprError::NonScalarDivisor { shape: matrix.shape() }),
            Symbol::Sum(_) => Err(ExprError::Unsupported {
                op: Op::Div,
                left: "product",
                right: "sum",
            }),
        }
    }
}

/// Returns true if both lists hold the same factors. Order only matters when some factor is not a
/// scalar.
fn same_factors(left: &[Symbol], right: &[Symbol]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    let commutes = |factors: &[Symbol]| {
        factors.iter().all(|factor| factor.shape().is_ok_and(|shape| shape.is_scalar()))
    };
    if !commutes(left) || !commutes(right) {
        return left == right;
    }

    let mut unmatched = right.iter().collect::<Vec<_>>();
    left.iter().all(|factor| {
        match unmatched.iter().position(|other| *other == factor) {
            Some(index) => {
                unmatched.swap_remove(index);
                true
            },
            None => false,
        }
    })
}

impl Neg for Product {
    type Output = Product;

    /// Flips the sign of the first factor with an explicit negative sign, or of the first number
    /// or variable if none has one. If the product has neither, a `-1` factor is prepended.
    fn neg(mut self) -> Self::Output {
        let signed = self.factors.iter().position(|factor| match factor {
            Symbol::Constant(Constant(value)) => *value < 0.0,
            Symbol::Variable(variable) => variable.quantity < 0.0,
            _ => false,
        });
        let position = signed.or_else(|| {
            self.factors
                .iter()
                .position(|factor| matches!(factor, Symbol::Constant(_) | Symbol::Variable(_)))
        });

        match position {
            Some(index) => {
                let factor = std::mem::take(&mut self.factors[index]);
                self.factors[index] = -factor;
            },
            None => self.factors.insert(0, Symbol::Constant(Constant(-1.0))),
        }
        self
    }
}
