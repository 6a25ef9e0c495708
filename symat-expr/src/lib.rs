//! Symbolic expression trees over constants, named variables, sums, products and matrices.
//!
//! The central type is [`Symbol`], a closed sum type of the five node kinds. Trees are built and
//! combined with the fallible arithmetic methods on [`Symbol`], which simplify locally as they go:
//! like terms are merged, identities such as `x * 1` and `x + 0` are applied, and matrix
//! operations check their shapes. After a tree is complete, [`Symbol::optimize`] normalizes it
//! further (see [`optimizer`]).
//!
//! ```
//! use symat_expr::{Symbol, fmt::PlainFormatter};
//!
//! let x = Symbol::variable("x");
//! let sum = x.clone().try_add(x).unwrap().try_add(Symbol::constant(1.0)).unwrap();
//! assert_eq!(sum.format(&PlainFormatter::new(true)), "2 * x + 1");
//! ```

pub mod consts;
pub mod error;
pub mod fmt;
pub mod matrix;
pub mod optimizer;
pub mod shape;
pub mod symbol;

pub use error::{ExprError, Op};
pub use matrix::Matrix;
pub use shape::Shape;
pub use symbol::{Constant, Product, Sum, Symbol, Variable};
