//! The normalization pass run on every definition after substitution.
//!
//! Substitution splices values into trees without simplifying around them, so that a product like
//! `A * B` can become a product of two matrices, or `x * w` with `w = 3 * y * z` can become a
//! product nested inside another. The optimizer rewrites such trees top-down:
//!
//! - Variables with a zero quantity or exponent become constants.
//! - Matrices are optimized cell by cell.
//! - Products are flattened, their numeric coefficient is pulled out into a single leading
//!   constant, and the remaining factors are multiplied together again from left to right.
//! - Sums are left as they are.

use crate::{
    consts::{approx_zero, Value},
    error::ExprError,
    symbol::{Constant, Product, Symbol, Variable},
};
use log::trace;

impl Symbol {
    /// Normalizes the tree. See the [module-level documentation](crate::optimizer) for the rules.
    pub fn optimize(self) -> Result<Symbol, ExprError> {
        match self {
            Symbol::Constant(_) | Symbol::Sum(_) => Ok(self),
            Symbol::Variable(variable) => Ok(variable.into_symbol()),
            Symbol::Matrix(matrix) => matrix.map_cells(Symbol::optimize).map(Symbol::Matrix),
            Symbol::Product(product) => optimize_product(product),
        }
    }
}

fn optimize_product(product: Product) -> Result<Symbol, ExprError> {
    // optimize each factor, splicing in the factors of nested products
    let mut flattened = Vec::with_capacity(product.num_factors());
    for factor in product.into_factors() {
        match factor.optimize()? {
            Symbol::Product(inner) => flattened.extend(inner.into_factors()),
            other => flattened.push(other),
        }
    }

    let (multiplier, rest) = extract_multiplier(flattened);
    trace!("product multiplier {} with {} remaining factors", multiplier, rest.len());
    if approx_zero(multiplier) {
        return Ok(Symbol::Constant(Constant(0.0)));
    }

    let mut rest = rest.into_iter();
    let Some(first) = rest.next() else {
        return Ok(Symbol::Constant(Constant(multiplier)));
    };
    let paired = rest.try_fold(first, Symbol::try_mul)?;

    // a remaining product gets the multiplier as its leading factor, anything else absorbs it
    Symbol::Constant(Constant(multiplier)).try_mul(paired)
}

/// Multiplies together every constant factor and the quantity of every variable factor, stripping
/// the quantities from the variables.
fn extract_multiplier(factors: Vec<Symbol>) -> (Value, Vec<Symbol>) {
    let mut multiplier = 1.0;
    let mut rest = Vec::with_capacity(factors.len());
    for factor in factors {
        match factor {
            Symbol::Constant(Constant(value)) => multiplier *= value,
            Symbol::Variable(variable) => {
                multiplier *= variable.quantity;
                rest.push(Symbol::Variable(Variable { quantity: 1.0, ..variable }));
            },
            other => rest.push(other),
        }
    }
    (multiplier, rest)
}
