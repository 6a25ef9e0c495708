//! Dense matrices of symbols.

use crate::{
    error::{ExprError, Op},
    shape::Shape,
    symbol::{Constant, Product, Sum, Symbol},
};
use std::ops::Neg;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A `rows x cols` grid of symbols, stored in row-major order.
///
/// Every cell always holds a valid symbol; new matrices are filled with zeros.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix {
    rows: usize,
    cols: usize,
    cells: Vec<Symbol>,
}

impl Matrix {
    /// Creates a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Symbol::default(); rows * cols],
        }
    }

    /// Creates the `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut matrix = Self::zeros(n, n);
        for i in 0..n {
            matrix.cells[i * n + i] = Symbol::Constant(Constant(1.0));
        }
        matrix
    }

    /// Creates a square matrix from cells in row-major order. Returns [`None`] if the number of
    /// cells is not a non-zero perfect square.
    pub fn square(cells: Vec<Symbol>) -> Option<Self> {
        let n = (cells.len() as f64).sqrt().round() as usize;
        if n == 0 || n * n != cells.len() {
            return None;
        }

        Some(Self { rows: n, cols: n, cells })
    }

    /// Creates a matrix from a list of rows. Returns [`None`] if there are no rows, the rows are
    /// empty, or the rows have different lengths.
    pub fn from_rows(rows: Vec<Vec<Symbol>>) -> Option<Self> {
        let cols = rows.first()?.len();
        if cols == 0 || rows.iter().any(|row| row.len() != cols) {
            return None;
        }

        Some(Self {
            rows: rows.len(),
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.rows, self.cols)
    }

    /// Returns the cell at the given row and column.
    pub fn get(&self, row: usize, col: usize) -> Option<&Symbol> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Symbol> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get_mut(row * self.cols + col)
    }

    /// The cells in row-major order.
    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Symbol> {
        self.cells
    }

    /// Returns true if every cell is zero.
    pub fn is_zero(&self) -> bool {
        self.cells.iter().all(Symbol::is_zero)
    }

    pub fn is_constant(&self) -> bool {
        self.cells.iter().all(Symbol::is_constant)
    }

    /// Returns the transpose of the matrix.
    pub fn transpose(self) -> Matrix {
        let (rows, cols) = (self.rows, self.cols);
        let mut indexed = self.cells
            .into_iter()
            .enumerate()
            .map(|(i, cell)| ((i % cols) * rows + i / cols, cell))
            .collect::<Vec<_>>();
        indexed.sort_by_key(|(i, _)| *i);

        Matrix {
            rows: cols,
            cols: rows,
            cells: indexed.into_iter().map(|(_, cell)| cell).collect(),
        }
    }

    /// Applies `f` to every cell.
    pub(crate) fn map_cells<F>(self, f: F) -> Result<Matrix, ExprError>
    where
        F: FnMut(Symbol) -> Result<Symbol, ExprError>,
    {
        let cells = self.cells.into_iter().map(f).collect::<Result<Vec<_>, _>>()?;
        Ok(Matrix { cells, ..self })
    }

    fn mismatch(op: Op, left: Shape, right: Shape) -> ExprError {
        ExprError::DimensionMismatch { op, left, right }
    }

    /// Adds `rhs` to this matrix. Another matrix is added element-wise and must have the same
    /// shape, and a scalar is added to every cell.
    pub(crate) fn try_add(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        let rhs = match rhs {
            Symbol::Matrix(rhs) => {
                if self.shape() != rhs.shape() {
                    return Err(Self::mismatch(Op::Add, self.shape(), rhs.shape()));
                }

                let cells = self.cells
                    .into_iter()
                    .zip(rhs.cells)
                    .map(|(left, right)| left.try_add(right))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(Symbol::Matrix(Matrix { cells, ..self }));
            },
            rhs => rhs,
        };

        let shape = rhs.shape()?;
        if shape.is_scalar() {
            self.map_cells(|cell| cell.try_add(rhs.clone())).map(Symbol::Matrix)
        } else if shape == self.shape() {
            Sum::pair(Symbol::Matrix(self), rhs)
        } else {
            Err(Self::mismatch(Op::Add, self.shape(), shape))
        }
    }

    /// Adds this matrix to the non-matrix `lhs`.
    pub(crate) fn try_radd(self, lhs: Symbol) -> Result<Symbol, ExprError> {
        let shape = lhs.shape()?;
        if shape.is_scalar() {
            self.map_cells(|cell| lhs.clone().try_add(cell)).map(Symbol::Matrix)
        } else if shape == self.shape() {
            Sum::pair(lhs, Symbol::Matrix(self))
        } else {
            Err(Self::mismatch(Op::Add, shape, self.shape()))
        }
    }

    /// Multiplies this matrix by `rhs`.
    ///
    /// Two matrices are multiplied with the usual row-by-column rule, which requires
    /// `self.cols == rhs.rows`; cell products where either side is zero are skipped. A scalar is
    /// multiplied into every cell.
    pub(crate) fn try_mul(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        let rhs = match rhs {
            Symbol::Matrix(rhs) => return self.mul_matrix(&rhs).map(Symbol::Matrix),
            rhs => rhs,
        };

        if rhs.shape()?.is_scalar() {
            self.map_cells(|cell| cell.try_mul(rhs.clone())).map(Symbol::Matrix)
        } else {
            Product::chain(Symbol::Matrix(self), rhs)
        }
    }

    /// Multiplies the non-matrix `lhs` by this matrix.
    pub(crate) fn try_rmul(self, lhs: Symbol) -> Result<Symbol, ExprError> {
        if lhs.shape()?.is_scalar() {
            self.map_cells(|cell| lhs.clone().try_mul(cell)).map(Symbol::Matrix)
        } else {
            Product::chain(lhs, Symbol::Matrix(self))
        }
    }

    fn mul_matrix(&self, rhs: &Matrix) -> Result<Matrix, ExprError> {
        if self.cols != rhs.rows {
            return Err(Self::mismatch(Op::Mul, self.shape(), rhs.shape()));
        }

        let mut cells = Vec::with_capacity(self.rows * rhs.cols);
        for i in 0..self.rows {
            for j in 0..rhs.cols {
                let mut cell = Symbol::default();
                for k in 0..self.cols {
                    let left = &self.cells[i * self.cols + k];
                    let right = &rhs.cells[k * rhs.cols + j];
                    if left.is_zero() || right.is_zero() {
                        continue;
                    }
                    cell = cell.try_add(left.clone().try_mul(right.clone())?)?;
                }
                cells.push(cell);
            }
        }

        Ok(Matrix {
            rows: self.rows,
            cols: rhs.cols,
            cells,
        })
    }

    /// Divides every cell by `rhs`, which must be a non-zero scalar.
    pub(crate) fn try_div(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        let shape = rhs.shape()?;
        if !shape.is_scalar() || matches!(rhs, Symbol::Matrix(_)) {
            return Err(ExprError::NonScalarDivisor { shape });
        } else if rhs.is_zero() {
            return Err(ExprError::DivisionByZero);
        }

        self.map_cells(|cell| cell.try_div(rhs.clone())).map(Symbol::Matrix)
    }
}

impl Neg for Matrix {
    type Output = Matrix;

    fn neg(self) -> Self::Output {
        Matrix {
            cells: self.cells.into_iter().map(Neg::neg).collect(),
            ..self
        }
    }
}
