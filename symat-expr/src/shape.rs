use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The number of rows and columns of a value. Every non-matrix value is `1x1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    /// The shape of a scalar value.
    pub const SCALAR: Shape = Shape { rows: 1, cols: 1 };

    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn is_scalar(&self) -> bool {
        *self == Self::SCALAR
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
