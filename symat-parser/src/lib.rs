//! Parser for the symat definition language.
//!
//! A program is a list of definitions, each of the form `name = expression;`:
//!
//! ```
//! use symat_parser::Program;
//!
//! let program = Program::parse("
//!     A = [a, b; c, d];
//!     B = [1, 0; 0, 1];
//!     C = A * B;
//! ").unwrap();
//! assert_eq!(program.get("C").unwrap().to_string(), "[a,b;c,d]");
//! ```
//!
//! Expressions are combined into [`Symbol`](symat_expr::Symbol)s while they are parsed, so
//! `x + x` is stored as `2*x`. Once every definition has been read, each name is substituted into
//! the definitions that mention it, and the results are optimized.

pub mod parser;
pub mod program;
pub mod tokenizer;

pub use parser::error::Error;
pub use program::{Program, UnknownSymbol};
