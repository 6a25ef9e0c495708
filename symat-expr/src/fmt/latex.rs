use crate::{consts::Value, shape::Shape};
use super::{number, Formatter};

/// Names that are written as Greek letters.
const GREEK: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi", "psi",
    "omega", "Gamma", "Delta", "Theta", "Lambda", "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi",
    "Omega",
];

/// Renders trees as LaTeX math.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatexFormatter;

impl Formatter for LatexFormatter {
    fn constant(&self, value: Value) -> String {
        number(value)
    }

    fn name(&self, name: &str) -> String {
        if GREEK.contains(&name) {
            format!("\\{}", name)
        } else {
            name.to_string()
        }
    }

    fn matrix(&self, shape: Shape, cells: &[String]) -> String {
        let rows = cells
            .chunks(shape.cols.max(1))
            .map(|row| row.join(" & "))
            .collect::<Vec<_>>()
            .join(" \\\\ ");
        format!("\\begin{{bmatrix}} {} \\end{{bmatrix}}", rows)
    }

    fn parenthesis(&self, inner: &str) -> String {
        format!("\\left({}\\right)", inner)
    }

    fn plus(&self, left: &str, right: &str) -> String {
        format!("{} + {}", left, right)
    }

    fn minus(&self, left: &str, right: &str) -> String {
        format!("{} - {}", left, right)
    }

    fn times(&self, left: &str, right: &str) -> String {
        format!("{} {}", left, right)
    }

    fn divide(&self, top: &str, bottom: &str) -> String {
        format!("\\frac{{{}}}{{{}}}", top, bottom)
    }

    fn power(&self, base: &str, exponent: &str) -> String {
        format!("{}^{{{}}}", base, exponent)
    }

    fn assign(&self, name: &str, value: &str) -> String {
        format!("{} = {}\n", self.name(name), value)
    }
}
