use crate::{
    error::{ExprError, Op},
    shape::Shape,
};
use std::ops::Neg;
use super::Symbol;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Two or more terms added together.
///
/// Terms are partitioned by their free names (see [`Symbol::find_free_names`]): adding a term to a
/// sum merges it into the existing term with the same free names, and only appends it if there is
/// none. A merge that cannot combine into a single node leaves a nested sum in that term's place.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sum {
    terms: Vec<Symbol>,
}

impl Sum {
    /// Builds `lhs + rhs` as a two-term sum, without trying to merge them. Both terms must have
    /// the same shape.
    pub(crate) fn pair(lhs: Symbol, rhs: Symbol) -> Result<Symbol, ExprError> {
        let (left, right) = (lhs.shape()?, rhs.shape()?);
        if left != right {
            return Err(ExprError::DimensionMismatch { op: Op::Add, left, right });
        }

        Ok(Symbol::Sum(Sum { terms: vec![lhs, rhs] }))
    }

    /// Adds all of the given terms together.
    pub fn from_terms(terms: impl IntoIterator<Item = Symbol>) -> Result<Symbol, ExprError> {
        terms.into_iter().try_fold(Symbol::default(), Symbol::try_add)
    }

    pub fn terms(&self) -> &[Symbol] {
        &self.terms
    }

    pub fn into_terms(self) -> Vec<Symbol> {
        self.terms
    }

    /// Returns the shape shared by all terms.
    pub fn shape(&self) -> Result<Shape, ExprError> {
        let mut terms = self.terms.iter();
        let Some(first) = terms.next() else {
            return Ok(Shape::SCALAR);
        };

        let left = first.shape()?;
        for term in terms {
            let right = term.shape()?;
            if left != right {
                return Err(ExprError::DimensionMismatch { op: Op::Add, left, right });
            }
        }
        Ok(left)
    }

    /// Returns true if the terms cancel out.
    ///
    /// Each term is added to every term kept so far; if that produces zero (and not a sum that
    /// happens to be zero), the kept term is dropped, otherwise the new term is kept. The sum is
    /// zero if no term is left at the end.
    pub fn is_zero(&self) -> bool {
        let mut kept: Vec<&Symbol> = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            let cancelled = kept.iter().position(|other| {
                match (*other).clone().try_add(term.clone()) {
                    Ok(Symbol::Sum(_)) | Err(_) => false,
                    Ok(sum) => sum.is_zero(),
                }
            });

            match cancelled {
                Some(index) => {
                    kept.remove(index);
                },
                None if term.is_zero() => (),
                None => kept.push(term),
            }
        }
        kept.is_empty()
    }

    /// Applies `f` to every term, keeping the structure of the sum.
    pub(crate) fn map_terms<F>(self, f: F) -> Result<Sum, ExprError>
    where
        F: FnMut(Symbol) -> Result<Symbol, ExprError>,
    {
        let terms = self.terms.into_iter().map(f).collect::<Result<Vec<_>, _>>()?;
        Ok(Sum { terms })
    }

    /// Collapses the sum into a single node if it has fewer than two terms.
    fn collapse(mut self) -> Symbol {
        match self.terms.len() {
            0 => Symbol::default(),
            1 => self.terms.remove(0),
            _ => Symbol::Sum(self),
        }
    }

    /// Adds a term into the sum, merging it into a term with the same free names.
    ///
    /// A term that combines with the new one into a single node is preferred; a merge that results
    /// in zero removes the term. If every candidate only forms a sum with the new term, that sum
    /// takes the place of the first candidate, so that no two terms share their free names.
    fn add_term(&mut self, term: Symbol) -> Result<(), ExprError> {
        if term.is_zero() {
            return Ok(());
        }

        let names = term.find_free_names();
        let mut grouped = None;
        for index in 0..self.terms.len() {
            if self.terms[index].find_free_names() != names {
                continue;
            }

            match self.terms[index].clone().try_add(term.clone())? {
                merged @ Symbol::Sum(_) => {
                    grouped.get_or_insert((index, merged));
                },
                merged if merged.is_zero() => {
                    self.terms.remove(index);
                    return Ok(());
                },
                merged => {
                    self.terms[index] = merged;
                    return Ok(());
                },
            }
        }

        match grouped {
            Some((index, merged)) => self.terms[index] = merged,
            None => self.terms.push(term),
        }
        Ok(())
    }

    pub(crate) fn try_add(mut self, rhs: Symbol) -> Result<Symbol, ExprError> {
        let (left, right) = (self.shape()?, rhs.shape()?);
        if left != right {
            return Err(ExprError::DimensionMismatch { op: Op::Add, left, right });
        }

        match rhs {
            Symbol::Sum(rhs) => {
                for term in rhs.terms {
                    self.add_term(term)?;
                }
            },
            rhs => self.add_term(rhs)?,
        }
        Ok(self.collapse())
    }

    /// Multiplies this sum by `rhs`, distributing over the terms.
    ///
    /// When both sides are sums, every pair of terms is multiplied, and each cross term is folded
    /// into the first cross term produced so far that it cancels or combines with.
    pub(crate) fn try_mul(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        match rhs {
            Symbol::Sum(rhs) => {
                let mut products = Vec::with_capacity(self.terms.len() * rhs.terms.len());
                for left in &self.terms {
                    for right in &rhs.terms {
                        fold_cross_term(&mut products, left.clone().try_mul(right.clone())?)?;
                    }
                }
                Ok(Sum { terms: products }.collapse())
            },
            Symbol::Matrix(matrix) => matrix.try_rmul(Symbol::Sum(self)),
            rhs => Sum::from_terms(
                self.terms
                    .into_iter()
                    .map(|term| term.try_mul(rhs.clone()))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        }
    }

    /// Multiplies `lhs` by this sum, distributing over the terms.
    pub(crate) fn try_rmul(self, lhs: Symbol) -> Result<Symbol, ExprError> {
        match lhs {
            Symbol::Sum(lhs) => lhs.try_mul(Symbol::Sum(self)),
            Symbol::Matrix(matrix) => matrix.try_mul(Symbol::Sum(self)),
            lhs => Sum::from_terms(
                self.terms
                    .into_iter()
                    .map(|term| lhs.clone().try_mul(term))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        }
    }

    /// Divides every term by `rhs`. Dividing by another sum is not supported.
    pub(crate) fn try_div(self, rhs: Symbol) -> Result<Symbol, ExprError> {
        if rhs.is_zero() {
            return Err(ExprError::DivisionByZero);
        }

        match rhs {
            Symbol::Sum(_) => Err(ExprError::Unsupported {
                op: Op::Div,
                left: "sum",
                right: "sum",
            }),
            Symbol::Matrix(matrix) => Err(ExprError::NonScalarDivisor { shape: matrix.shape() }),
            rhs => Sum::from_terms(
                self.terms
                    .into_iter()
                    .map(|term| term.try_div(rhs.clone()))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        }
    }
}

/// Folds `term` into the first of `products` that it cancels with (removing it) or combines with
/// into a single node (replacing it). Otherwise, appends it.
fn fold_cross_term(products: &mut Vec<Symbol>, term: Symbol) -> Result<(), ExprError> {
    for index in 0..products.len() {
        match products[index].clone().try_add(term.clone())? {
            combined if combined.is_zero() => {
                products.remove(index);
                return Ok(());
            },
            Symbol::Sum(_) => continue,
            combined => {
                products[index] = combined;
                return Ok(());
            },
        }
    }

    if !term.is_zero() {
        products.push(term);
    }
    Ok(())
}

impl Neg for Sum {
    type Output = Sum;

    fn neg(self) -> Self::Output {
        Sum {
            terms: self.terms.into_iter().map(Neg::neg).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{consts::Value, matrix::Matrix, symbol::Variable};
    use pretty_assertions::assert_eq;
    use super::*;

    fn var(name: &str, quantity: Value, exponent: Value) -> Symbol {
        Symbol::Variable(Variable::with(name, quantity, exponent))
    }

    fn sum(terms: &[Symbol]) -> Symbol {
        Sum::from_terms(terms.iter().cloned()).unwrap()
    }

    #[test]
    fn merges_by_free_names() {
        let result = sum(&[Symbol::variable("x"), Symbol::constant(1.0), var("x", 2.0, 1.0)]);
        assert_eq!(result, Symbol::Sum(Sum {
            terms: vec![var("x", 3.0, 1.0), Symbol::constant(1.0)],
        }));
    }

    #[test]
    fn merges_with_later_candidate() {
        let result = sum(&[
            Symbol::variable("x"),
            var("x", 1.0, 2.0),
            var("x", 3.0, 2.0),
        ]);
        assert_eq!(result, Symbol::Sum(Sum {
            terms: vec![Symbol::variable("x"), var("x", 4.0, 2.0)],
        }));
    }

    #[test]
    fn same_names_share_one_term() {
        // 1 + x + x^2
        let result = sum(&[Symbol::constant(1.0), Symbol::variable("x"), var("x", 1.0, 2.0)]);
        let Symbol::Sum(outer) = &result else {
            panic!("expected a sum, got {:?}", result);
        };
        assert_eq!(outer.terms().len(), 2);
        assert_eq!(outer.terms()[0], Symbol::constant(1.0));
        assert_eq!(
            outer.terms()[1],
            Symbol::variable("x").try_add(var("x", 1.0, 2.0)).unwrap(),
        );

        // the grouped term keeps merging
        let result = result.try_add(var("x", 2.0, 1.0)).unwrap();
        let Symbol::Sum(outer) = result else {
            panic!("expected a sum");
        };
        assert_eq!(outer.terms()[1], Symbol::Sum(Sum {
            terms: vec![var("x", 3.0, 1.0), var("x", 1.0, 2.0)],
        }));
    }

    #[test]
    fn commuted_products_merge() {
        // 1 + x*y + y*x
        let xy = Symbol::variable("x").try_mul(Symbol::variable("y")).unwrap();
        let yx = Symbol::variable("y").try_mul(Symbol::variable("x")).unwrap();
        let result = sum(&[Symbol::constant(1.0), xy.clone(), yx]);
        assert_eq!(result, Symbol::Sum(Sum {
            terms: vec![Symbol::constant(1.0), Symbol::constant(2.0).try_mul(xy).unwrap()],
        }));
    }

    #[test]
    fn square_of_sum_has_three_terms() {
        let x_plus_y = sum(&[Symbol::variable("x"), Symbol::variable("y")]);
        let result = x_plus_y.clone().try_mul(x_plus_y).unwrap();
        let Symbol::Sum(result) = result else {
            panic!("expected a sum");
        };
        assert_eq!(result.terms().len(), 3);
    }

    #[test]
    fn cancelled_term_collapses_sum() {
        let result = sum(&[Symbol::variable("x"), Symbol::variable("y"), var("y", -1.0, 1.0)]);
        assert_eq!(result, Symbol::variable("x"));
    }

    #[test]
    fn add_then_sub_symbolic() {
        let a = sum(&[Symbol::variable("a"), Symbol::constant(2.0)]);
        let b = sum(&[Symbol::variable("b"), Symbol::variable("c")]);
        let result = a.clone().try_add(b.clone()).unwrap().try_sub(b).unwrap();
        assert_eq!(result, a);
    }

    #[test]
    fn structural_zero() {
        let terms = Sum {
            terms: vec![
                Symbol::variable("x"),
                Symbol::variable("y"),
                var("x", -1.0, 1.0),
                var("y", -1.0, 1.0),
            ],
        };
        assert!(terms.is_zero());

        let terms = Sum { terms: vec![Symbol::variable("x"), Symbol::variable("y")] };
        assert!(!terms.is_zero());
    }

    #[test]
    fn distributes_over_sums() {
        // (x + 1)(x - 1) = x^2 - 1
        let left = sum(&[Symbol::variable("x"), Symbol::constant(1.0)]);
        let right = sum(&[Symbol::variable("x"), Symbol::constant(-1.0)]);
        let result = left.try_mul(right).unwrap();
        assert_eq!(result, Symbol::Sum(Sum {
            terms: vec![var("x", 1.0, 2.0), Symbol::constant(-1.0)],
        }));
    }

    #[test]
    fn distributes_scalar() {
        let result = sum(&[Symbol::variable("x"), Symbol::constant(1.0)])
            .try_mul(Symbol::constant(3.0))
            .unwrap();
        assert_eq!(result, Symbol::Sum(Sum {
            terms: vec![var("x", 3.0, 1.0), Symbol::constant(3.0)],
        }));
    }

    #[test]
    fn divides_each_term() {
        let result = sum(&[var("x", 4.0, 1.0), Symbol::constant(2.0)])
            .try_div(Symbol::constant(2.0))
            .unwrap();
        assert_eq!(result, Symbol::Sum(Sum {
            terms: vec![var("x", 2.0, 1.0), Symbol::constant(1.0)],
        }));
    }

    #[test]
    fn mismatched_terms() {
        let result = Sum::pair(Matrix::zeros(2, 2).into(), Symbol::variable("x"));
        assert_eq!(
            result,
            Err(ExprError::DimensionMismatch {
                op: Op::Add,
                left: Shape::new(2, 2),
                right: Shape::SCALAR,
            }),
        );
    }
}
