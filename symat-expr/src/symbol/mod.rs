//! The expression tree.
//!
//! A [`Symbol`] is one of five kinds of node: a [`Constant`], a [`Variable`] (`q * name^e`), a
//! [`Sum`] of at least two terms, a [`Product`] of at least two factors, or a dense [`Matrix`] of
//! symbols. Every node exclusively owns its children.
//!
//! # Arithmetic
//!
//! Symbols are combined with [`Symbol::try_add`], [`Symbol::try_sub`], [`Symbol::try_mul`] and
//! [`Symbol::try_div`]. All of them take both operands by value and return a single owned node,
//! simplifying locally while building it. For example, adding `x` to `2x` produces the single
//! variable `3x` instead of a sum, and adding a term to a sum merges it into the existing term
//! with the same free names, if there is one.
//!
//! Operations that have no meaning for the operands (dividing by a sum, adding matrices of
//! different shapes, dividing by zero) return an [`ExprError`]. Nothing is ever silently
//! approximated.
//!
//! # Equality
//!
//! The [`PartialEq`] implementation is **structural**: `x + y` and `y + x` are different trees and
//! compare unequal, and floating point values are compared exactly. Use the `approx_*` helpers in
//! [`crate::consts`] when comparing values that went through arithmetic.

mod constant;
mod iter;
mod product;
mod sum;
mod variable;

pub use constant::Constant;
pub use iter::SymbolIter;
pub use product::Product;
pub use sum::Sum;
pub use variable::Variable;

use crate::{
    consts::{approx_zero, Value},
    error::ExprError,
    matrix::Matrix,
    shape::Shape,
};
use std::{collections::BTreeSet, ops::Neg};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A node of the expression tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Symbol {
    /// A single number, such as `2.5`.
    Constant(Constant),

    /// A named unknown with a coefficient and an exponent, such as `3x^2`.
    Variable(Variable),

    /// Two or more terms added together.
    Sum(Sum),

    /// Two or more factors multiplied together, in order.
    Product(Product),

    /// A dense grid of symbols.
    Matrix(Matrix),
}

impl Default for Symbol {
    /// The zero constant.
    fn default() -> Self {
        Symbol::Constant(Constant(0.0))
    }
}

impl From<Value> for Symbol {
    fn from(value: Value) -> Self {
        Symbol::Constant(Constant(value))
    }
}

impl From<Constant> for Symbol {
    fn from(constant: Constant) -> Self {
        Symbol::Constant(constant)
    }
}

impl From<Variable> for Symbol {
    fn from(variable: Variable) -> Self {
        variable.into_symbol()
    }
}

impl From<Matrix> for Symbol {
    fn from(matrix: Matrix) -> Self {
        Symbol::Matrix(matrix)
    }
}

impl Symbol {
    /// Creates a constant symbol.
    pub fn constant(value: Value) -> Self {
        Symbol::Constant(Constant(value))
    }

    /// Creates the variable `name`, with quantity and exponent 1.
    pub fn variable(name: impl Into<String>) -> Self {
        Symbol::Variable(Variable::new(name))
    }

    /// The name of this kind of node, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Symbol::Constant(_) => "constant",
            Symbol::Variable(_) => "variable",
            Symbol::Sum(_) => "sum",
            Symbol::Product(_) => "product",
            Symbol::Matrix(_) => "matrix",
        }
    }

    /// Returns the value of this symbol if it is a constant.
    pub fn as_constant(&self) -> Option<Value> {
        match self {
            Symbol::Constant(Constant(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Symbol::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&Matrix> {
        match self {
            Symbol::Matrix(matrix) => Some(matrix),
            _ => None,
        }
    }

    /// Returns an iterator that traverses the tree in left-to-right post-order.
    pub fn post_order_iter(&self) -> SymbolIter<'_> {
        SymbolIter::new(self)
    }

    /// Returns true if the symbol does not depend on any name.
    pub fn is_constant(&self) -> bool {
        match self {
            Symbol::Constant(_) => true,
            Symbol::Variable(variable) => variable.is_constant(),
            Symbol::Sum(sum) => sum.terms().iter().all(Symbol::is_constant),
            Symbol::Product(product) => product.factors().iter().all(Symbol::is_constant),
            Symbol::Matrix(matrix) => matrix.is_constant(),
        }
    }

    /// Returns true if the symbol is zero.
    ///
    /// This is a tolerance check for constants and variables, and a structural check for the other
    /// kinds of node: a product is zero if any of its factors is, a matrix if all of its cells are,
    /// and a sum if its terms cancel out pairwise.
    pub fn is_zero(&self) -> bool {
        match self {
            Symbol::Constant(constant) => constant.is_zero(),
            Symbol::Variable(variable) => approx_zero(variable.quantity),
            Symbol::Sum(sum) => sum.is_zero(),
            Symbol::Product(product) => product.factors().iter().any(Symbol::is_zero),
            Symbol::Matrix(matrix) => matrix.is_zero(),
        }
    }

    /// Returns the shape of the symbol.
    ///
    /// Constants and variables are `1x1`. Sums require all of their terms to have the same shape,
    /// and products require their non-scalar factors to chain (`a.cols == b.rows`).
    pub fn shape(&self) -> Result<Shape, ExprError> {
        match self {
            Symbol::Constant(_) | Symbol::Variable(_) => Ok(Shape::SCALAR),
            Symbol::Sum(sum) => sum.shape(),
            Symbol::Product(product) => product.shape(),
            Symbol::Matrix(matrix) => Ok(matrix.shape()),
        }
    }

    /// Returns the set of variable names used anywhere in the tree.
    ///
    /// Two terms with the same set are candidates for merging when they are added to a [`Sum`].
    pub fn find_free_names(&self) -> BTreeSet<String> {
        self.post_order_iter()
            .filter_map(|symbol| symbol.as_variable())
            .map(|variable| variable.name.clone())
            .collect()
    }

    /// Adds two symbols together.
    pub fn try_add(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        match (self, rhs) {
            (Symbol::Matrix(lhs), rhs) => lhs.try_add(rhs),
            (lhs, Symbol::Matrix(rhs)) => rhs.try_radd(lhs),
            (Symbol::Constant(lhs), rhs) => lhs.try_add(rhs),
            (Symbol::Variable(lhs), rhs) => lhs.try_add(rhs),
            (Symbol::Sum(lhs), rhs) => lhs.try_add(rhs),
            (Symbol::Product(lhs), rhs) => lhs.try_add(rhs),
        }
    }

    /// Subtracts `rhs` from this symbol, by adding its negation.
    pub fn try_sub(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        self.try_add(-rhs)
    }

    /// Multiplies two symbols together. The order of the operands is kept, since matrix
    /// multiplication does not commute.
    pub fn try_mul(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        match (self, rhs) {
            (Symbol::Matrix(lhs), rhs) => lhs.try_mul(rhs),
            (lhs, Symbol::Matrix(rhs)) => rhs.try_rmul(lhs),
            (Symbol::Constant(lhs), rhs) => lhs.try_mul(rhs),
            (Symbol::Variable(lhs), rhs) => lhs.try_mul(rhs),
            (Symbol::Sum(lhs), rhs) => lhs.try_mul(rhs),
            (Symbol::Product(lhs), rhs) => lhs.try_mul(rhs),
        }
    }

    /// Divides this symbol by `rhs`, which must be a non-zero scalar.
    pub fn try_div(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        match (self, rhs) {
            (Symbol::Matrix(lhs), rhs) => lhs.try_div(rhs),
            (_, Symbol::Matrix(rhs)) => Err(ExprError::NonScalarDivisor { shape: rhs.shape() }),
            (Symbol::Constant(lhs), rhs) => lhs.try_div(rhs),
            (Symbol::Variable(lhs), rhs) => lhs.try_div(rhs),
            (Symbol::Sum(lhs), rhs) => lhs.try_div(rhs),
            (Symbol::Product(lhs), rhs) => lhs.try_div(rhs),
        }
    }

    /// Replaces every variable called `name` with a copy of `value`.
    ///
    /// The replacement keeps the variable's coefficient, and integer exponents are expanded by
    /// repeated multiplication, so that `3x^2` with `x = v` becomes `3 * v * v`. The tree around the
    /// replaced variables is left as it is; it is up to the optimizer to fold it again.
    pub fn substitute(self, name: &str, value: &Symbol) -> Result<Symbol, ExprError> {
        match self {
            Symbol::Variable(variable) if variable.name == name => variable.replace_with(value),
            Symbol::Constant(_) | Symbol::Variable(_) => Ok(self),
            Symbol::Sum(sum) => sum
                .map_terms(|term| term.substitute(name, value))
                .map(Symbol::Sum),
            Symbol::Product(product) => product
                .map_factors(|factor| factor.substitute(name, value))
                .map(Symbol::Product),
            Symbol::Matrix(matrix) => matrix
                .map_cells(|cell| cell.substitute(name, value))
                .map(Symbol::Matrix),
        }
    }
}

impl Neg for Symbol {
    type Output = Symbol;

    fn neg(self) -> Self::Output {
        match self {
            Symbol::Constant(constant) => Symbol::Constant(-constant),
            Symbol::Variable(variable) => Symbol::Variable(-variable),
            Symbol::Sum(sum) => Symbol::Sum(-sum),
            Symbol::Product(product) => Symbol::Product(-product),
            Symbol::Matrix(matrix) => Symbol::Matrix(-matrix),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::error::Op;
    use pretty_assertions::assert_eq;
    use super::*;

    fn var(name: &str, quantity: Value, exponent: Value) -> Symbol {
        Symbol::Variable(Variable { name: name.to_string(), quantity, exponent })
    }

    #[test]
    fn add_then_sub_constants() {
        let a = Symbol::constant(4.25);
        let b = Symbol::constant(-1.5);
        let result = a.try_add(b.clone()).unwrap().try_sub(b).unwrap();
        assert_float_absolute_eq!(result.as_constant().unwrap(), 4.25);
    }

    #[test]
    fn mul_then_div_constants() {
        let a = Symbol::constant(3.0);
        let b = Symbol::constant(7.0);
        let result = a.try_mul(b.clone()).unwrap().try_div(b).unwrap();
        assert_float_absolute_eq!(result.as_constant().unwrap(), 3.0);
    }

    #[test]
    fn same_variable_adds_quantities() {
        let x = Symbol::variable("x");
        let result = x.clone().try_add(x).unwrap();
        assert_eq!(result, var("x", 2.0, 1.0));
    }

    #[test]
    fn cancelling_variables_are_zero() {
        let x = Symbol::variable("x");
        let result = x.clone().try_sub(x).unwrap();
        assert!(result.is_zero());
        assert!(result.as_constant().is_some());
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let x = Symbol::variable("x");
        assert_eq!(x.try_div(Symbol::constant(0.0)), Err(ExprError::DivisionByZero));
        assert_eq!(
            Symbol::constant(1.0).try_div(Symbol::constant(1e-12)),
            Err(ExprError::DivisionByZero),
        );
    }

    #[test]
    fn division_by_matrix_is_an_error() {
        let result = Symbol::constant(1.0).try_div(Matrix::identity(2).into());
        assert_eq!(result, Err(ExprError::NonScalarDivisor { shape: Shape::new(2, 2) }));
    }

    #[test]
    fn division_by_sum_is_unsupported() {
        let sum = Symbol::variable("x").try_add(Symbol::variable("y")).unwrap();
        let result = Symbol::variable("z").try_div(sum);
        assert_eq!(
            result,
            Err(ExprError::Unsupported { op: Op::Div, left: "variable", right: "sum" }),
        );
    }

    #[test]
    fn free_names() {
        let expr = Symbol::variable("x")
            .try_mul(Symbol::variable("y"))
            .unwrap()
            .try_add(Symbol::variable("x"))
            .unwrap();
        let names = expr.find_free_names().into_iter().collect::<Vec<_>>();
        assert_eq!(names, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn post_order_visits_children_first() {
        let expr = Symbol::variable("a").try_add(Symbol::variable("b")).unwrap();
        let kinds = expr.post_order_iter().map(Symbol::kind_name).collect::<Vec<_>>();
        assert_eq!(kinds, vec!["variable", "variable", "sum"]);
    }

    #[test]
    fn clone_is_independent() {
        let original = Symbol::variable("x").try_add(Symbol::constant(2.0)).unwrap();
        let copy = original.clone();
        let changed = original.try_mul(Symbol::constant(3.0)).unwrap();
        assert_ne!(copy, changed);
        assert_eq!(copy.to_string(), "x+2");
    }

    #[test]
    fn substitute_keeps_coefficient() {
        let expr = var("x", 3.0, 1.0);
        let result = expr.substitute("x", &Symbol::variable("v")).unwrap();
        assert_eq!(result, var("v", 3.0, 1.0));
    }

    #[test]
    fn substitute_expands_integer_exponent() {
        let expr = var("x", 1.0, 2.0);
        let result = expr.substitute("x", &Symbol::constant(3.0)).unwrap();
        assert_float_absolute_eq!(result.as_constant().unwrap(), 9.0);

        let expr = var("x", 2.0, -1.0);
        let result = expr.substitute("x", &Symbol::constant(4.0)).unwrap();
        assert_float_absolute_eq!(result.as_constant().unwrap(), 0.5);
    }

    #[test]
    fn substitute_rejects_fractional_exponent() {
        let expr = var("x", 1.0, 0.5);
        let result = expr.substitute("x", &Symbol::variable("y"));
        assert_eq!(
            result,
            Err(ExprError::Unsupported { op: Op::Pow, left: "variable", right: "constant" }),
        );
    }

    #[test]
    fn substitute_leaves_other_names() {
        let expr = Symbol::variable("x").try_mul(Symbol::variable("y")).unwrap();
        let result = expr.clone().substitute("z", &Symbol::constant(1.0)).unwrap();
        assert_eq!(result, expr);
    }
}
