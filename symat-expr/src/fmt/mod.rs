//! Rendering trees as text.
//!
//! The tree does not know how any particular output looks. Instead, [`Symbol::format`] walks the
//! tree and asks a [`Formatter`] to build each piece: numbers, names, matrices, and the operators
//! that join them. Three formatters are provided:
//!
//! - [`PlainFormatter`]: the definition language itself, either compact or spaced out.
//! - [`LatexFormatter`]: LaTeX math mode.
//! - [`GlmFormatter`]: C++ expressions for the GLM math library.

mod glm;
mod latex;
mod plain;

pub use glm::GlmFormatter;
pub use latex::LatexFormatter;
pub use plain::PlainFormatter;

use crate::{
    consts::{approx_minus_one, approx_one, approx_zero, Value},
    shape::Shape,
    symbol::{Product, Sum, Symbol, Variable},
};
use std::fmt;

/// Builds the text for each kind of node and operator.
///
/// Arguments named `left`, `right`, `inner` and so on are already rendered.
pub trait Formatter {
    /// Renders a number.
    fn constant(&self, value: Value) -> String;

    /// Renders the name of a variable.
    fn name(&self, name: &str) -> String;

    /// Renders a matrix of the given shape from its rendered cells, in row-major order.
    fn matrix(&self, shape: Shape, cells: &[String]) -> String;

    fn parenthesis(&self, inner: &str) -> String;

    fn plus(&self, left: &str, right: &str) -> String;

    fn minus(&self, left: &str, right: &str) -> String;

    fn times(&self, left: &str, right: &str) -> String;

    fn divide(&self, top: &str, bottom: &str) -> String;

    fn power(&self, base: &str, exponent: &str) -> String;

    fn negate(&self, inner: &str) -> String {
        format!("-{}", inner)
    }

    /// Renders a top-level definition `name = value`. The name is given as it was defined.
    fn assign(&self, name: &str, value: &str) -> String;
}

/// Formats a number with the shortest representation that round-trips, without a trailing `.0`
/// for integers.
pub(crate) fn number(value: Value) -> String {
    if value == 0.0 {
        // avoid rendering `-0`
        "0".to_string()
    } else {
        value.to_string()
    }
}

impl Symbol {
    /// Renders the tree with the given formatter.
    pub fn format(&self, formatter: &dyn Formatter) -> String {
        render(self, formatter, false)
    }
}

/// Renders the symbol with [`PlainFormatter`] in compact mode.
impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(&PlainFormatter::new(false)))
    }
}

/// Renders a symbol. Sums are parenthesized when `nested` inside a product or another sum.
fn render(symbol: &Symbol, f: &dyn Formatter, nested: bool) -> String {
    match symbol {
        Symbol::Constant(constant) => f.constant(constant.value()),
        Symbol::Variable(variable) => render_variable(variable, f),
        Symbol::Sum(sum) => {
            let rendered = render_sum(sum, f);
            if nested {
                f.parenthesis(&rendered)
            } else {
                rendered
            }
        },
        Symbol::Product(product) => render_product(product, f),
        Symbol::Matrix(matrix) => {
            let cells = matrix.cells()
                .iter()
                .map(|cell| render(cell, f, false))
                .collect::<Vec<_>>();
            f.matrix(matrix.shape(), &cells)
        },
    }
}

/// Renders `quantity * name^exponent`, leaving out the parts that are `1`. Negative exponents are
/// rendered as a division.
fn render_variable(variable: &Variable, f: &dyn Formatter) -> String {
    let (quantity, exponent) = (variable.quantity, variable.exponent);
    if approx_zero(exponent) {
        return f.constant(quantity);
    }

    let name = f.name(&variable.name);
    let raise = |exponent: Value| {
        if approx_one(exponent) {
            name.clone()
        } else {
            f.power(&name, &f.constant(exponent))
        }
    };

    if exponent < 0.0 {
        let bottom = raise(-exponent);
        return if approx_minus_one(quantity) {
            f.parenthesis(&f.negate(&f.divide(&f.constant(1.0), &bottom)))
        } else {
            f.divide(&f.constant(quantity), &bottom)
        };
    }

    let powered = raise(exponent);
    if approx_one(quantity) {
        powered
    } else if approx_minus_one(quantity) {
        f.parenthesis(&f.negate(&powered))
    } else {
        f.times(&f.constant(quantity), &powered)
    }
}

/// Returns true if the term carries an explicit negative sign that a subtraction can absorb.
fn is_negative(term: &Symbol) -> bool {
    match term {
        Symbol::Constant(constant) => constant.value() < 0.0,
        Symbol::Variable(variable) => variable.quantity < 0.0,
        Symbol::Product(product) => product.factors().iter().any(|factor| {
            matches!(factor, Symbol::Constant(_) | Symbol::Variable(_)) && is_negative(factor)
        }),
        Symbol::Sum(_) | Symbol::Matrix(_) => false,
    }
}

fn render_sum(sum: &Sum, f: &dyn Formatter) -> String {
    let mut terms = sum.terms().iter();
    let first = terms
        .next()
        .map(|term| render(term, f, true))
        .unwrap_or_default();

    terms.fold(first, |rendered, term| {
        if is_negative(term) {
            f.minus(&rendered, &render(&-term.clone(), f, true))
        } else {
            f.plus(&rendered, &render(term, f, true))
        }
    })
}

fn render_product(product: &Product, f: &dyn Formatter) -> String {
    product
        .factors()
        .iter()
        .map(|factor| render(factor, f, true))
        .reduce(|rendered, factor| f.times(&rendered, &factor))
        .unwrap_or_default()
}
