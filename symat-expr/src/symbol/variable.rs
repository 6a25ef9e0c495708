use crate::{
    consts::{approx_eq, approx_one, approx_zero, Value},
    error::{ExprError, Op},
};
use std::ops::Neg;
use super::{product::Product, sum::Sum, Constant, Symbol};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named unknown, representing `quantity * name^exponent`.
///
/// A variable with a zero exponent is really the constant `quantity`, and one with a zero quantity
/// is the constant `0`. Arithmetic never returns such a variable; use [`Variable::into_symbol`] to
/// collapse one built by hand.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Variable {
    pub name: String,
    pub quantity: Value,
    pub exponent: Value,
}

impl Variable {
    /// Creates the variable `name` with quantity and exponent 1.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with(name, 1.0, 1.0)
    }

    pub fn with(name: impl Into<String>, quantity: Value, exponent: Value) -> Self {
        Self {
            name: name.into(),
            quantity,
            exponent,
        }
    }

    /// Returns true if the variable does not actually depend on its name.
    pub fn is_constant(&self) -> bool {
        approx_zero(self.exponent) || approx_zero(self.quantity)
    }

    /// Wraps the variable in a [`Symbol`], collapsing it to a [`Constant`] if it is degenerate.
    pub fn into_symbol(self) -> Symbol {
        if approx_zero(self.quantity) {
            Symbol::Constant(Constant(0.0))
        } else if approx_zero(self.exponent) {
            Symbol::Constant(Constant(self.quantity))
        } else {
            Symbol::Variable(self)
        }
    }

    /// Returns true if both variables have the same name and exponent, so that they can be added
    /// by adding their quantities.
    fn is_like(&self, other: &Variable) -> bool {
        self.name == other.name && approx_eq(self.exponent, other.exponent)
    }

    /// Multiplies the quantity by `factor`.
    pub(crate) fn scale(mut self, factor: Value) -> Symbol {
        self.quantity *= factor;
        self.into_symbol()
    }

    /// Returns `1 / self`.
    pub(crate) fn recip(self) -> Result<Variable, ExprError> {
        if approx_zero(self.quantity) {
            return Err(ExprError::DivisionByZero);
        }

        Ok(Variable {
            name: self.name,
            quantity: self.quantity.recip(),
            exponent: -self.exponent,
        })
    }

    pub(crate) fn try_add(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        match rhs {
            Symbol::Variable(rhs) if self.is_like(&rhs) => Ok(Variable {
                quantity: self.quantity + rhs.quantity,
                ..self
            }.into_symbol()),
            Symbol::Sum(sum) => sum.try_add(self.into_symbol()),
            rhs if rhs.is_zero() => Ok(self.into_symbol()),
            rhs => Sum::pair(self.into_symbol(), rhs),
        }
    }

    /// Multiplies this variable by `rhs`.
    ///
    /// Two variables with the same name merge by adding their exponents. Variables with different
    /// names form a product, with both quantities moved into a leading constant.
    pub(crate) fn try_mul(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        match rhs {
            Symbol::Constant(Constant(value)) => Ok(self.scale(value)),
            Symbol::Variable(rhs) if rhs.name == self.name => Ok(Variable {
                quantity: self.quantity * rhs.quantity,
                exponent: self.exponent + rhs.exponent,
                ..self
            }.into_symbol()),
            Symbol::Variable(rhs) => {
                let coefficient = self.quantity * rhs.quantity;
                let factors = vec![
                    Variable { quantity: 1.0, ..self }.into_symbol(),
                    Variable { quantity: 1.0, ..rhs }.into_symbol(),
                ];
                Product::scaled(coefficient, factors)
            },
            Symbol::Sum(sum) => sum.try_rmul(self.into_symbol()),
            Symbol::Product(product) => product.try_rmul(self.into_symbol()),
            Symbol::Matrix(matrix) => matrix.try_rmul(self.into_symbol()),
        }
    }

    /// Divides this variable by `rhs`. Dividing by a variable multiplies by its reciprocal, and
    /// dividing by a product divides by each of its factors in turn.
    pub(crate) fn try_div(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        if rhs.is_zero() {
            return Err(ExprError::DivisionByZero);
        }

        match rhs {
            Symbol::Constant(Constant(value)) => Ok(self.scale(value.recip())),
            Symbol::Variable(rhs) => self.try_mul(Symbol::Variable(rhs.recip()?)),
            Symbol::Product(product) => product
                .into_factors()
                .into_iter()
                .try_fold(self.into_symbol(), Symbol::try_div),
            Symbol::Matrix(matrix) => Err(ExprError::NonScalarDivisor { shape: matrix.shape() }),
            Symbol::Sum(_) => Err(ExprError::Unsupported {
                op: Op::Div,
                left: "variable",
                right: "sum",
            }),
        }
    }

    /// Returns the replacement for this variable when its name is defined as `value`:
    /// `quantity * value^exponent`, for integer exponents only.
    pub(crate) fn replace_with(self, value: &Symbol) -> Result<Symbol, ExprError> {
        let power = self.exponent.round();
        if !approx_eq(power, self.exponent) {
            return Err(ExprError::Unsupported {
                op: Op::Pow,
                left: value.kind_name(),
                right: "constant",
            });
        }

        let times = power.abs() as u64;
        if times == 0 {
            return Ok(Symbol::Constant(Constant(self.quantity)));
        }

        let mut powered = value.clone();
        for _ in 1..times {
            powered = powered.try_mul(value.clone())?;
        }
        if power < 0.0 {
            powered = Symbol::Constant(Constant(1.0)).try_div(powered)?;
        }

        if approx_one(self.quantity) {
            Ok(powered)
        } else {
            Symbol::Constant(Constant(self.quantity)).try_mul(powered)
        }
    }
}

impl Neg for Variable {
    type Output = Variable;

    fn neg(self) -> Self::Output {
        Variable {
            quantity: -self.quantity,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn degenerate_variables_collapse() {
        assert_eq!(Variable::with("x", 0.0, 3.0).into_symbol(), Symbol::constant(0.0));
        assert_eq!(Variable::with("x", 4.0, 0.0).into_symbol(), Symbol::constant(4.0));
    }

    #[test]
    fn different_exponents_do_not_merge() {
        let squared = Symbol::Variable(Variable::with("x", 1.0, 2.0));
        let result = Variable::new("x").try_add(squared).unwrap();
        assert!(matches!(result, Symbol::Sum(_)));
    }

    #[test]
    fn same_name_multiplies_into_power() {
        let result = Variable::with("x", 2.0, 1.0)
            .try_mul(Symbol::Variable(Variable::with("x", 3.0, 2.0)))
            .unwrap();
        assert_eq!(result, Symbol::Variable(Variable::with("x", 6.0, 3.0)));
    }

    #[test]
    fn different_names_form_a_product() {
        let result = Variable::with("x", 2.0, 1.0)
            .try_mul(Symbol::Variable(Variable::with("y", 3.0, 1.0)))
            .unwrap();
        let Symbol::Product(product) = result else {
            panic!("expected a product, got {:?}", result);
        };
        assert_eq!(product.factors(), &[
            Symbol::constant(6.0),
            Symbol::variable("x"),
            Symbol::variable("y"),
        ]);
    }

    #[test]
    fn divide_by_itself_is_one() {
        let result = Variable::with("x", 5.0, 2.0)
            .try_div(Symbol::Variable(Variable::with("x", 5.0, 2.0)))
            .unwrap();
        assert_eq!(result, Symbol::constant(1.0));
    }

    #[test]
    fn divide_by_other_name() {
        let result = Variable::new("x").try_div(Symbol::variable("y")).unwrap();
        let Symbol::Product(product) = result else {
            panic!("expected a product, got {:?}", result);
        };
        assert_eq!(product.factors(), &[
            Symbol::variable("x"),
            Symbol::Variable(Variable::with("y", 1.0, -1.0)),
        ]);
    }
}
