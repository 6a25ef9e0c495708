use super::Symbol;

/// An iterator that traverses a tree of symbols in left-to-right post-order (children before
/// their parent).
///
/// This iterator is created by [`Symbol::post_order_iter`].
pub struct SymbolIter<'a> {
    stack: Vec<&'a Symbol>,
    last_visited: Option<&'a Symbol>,
}

impl<'a> SymbolIter<'a> {
    pub fn new(symbol: &'a Symbol) -> Self {
        Self {
            stack: vec![symbol],
            last_visited: None,
        }
    }

    /// Pops the current symbol off the stack and marks it as the last visited symbol.
    fn visit(&mut self) -> Option<&'a Symbol> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given symbol is the last visited symbol.
    fn is_last_visited(&self, symbol: &'a Symbol) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, symbol),
            None => false,
        }
    }

    /// Visits the node on top of the stack if all of `children` were visited, otherwise pushes
    /// them so that the leftmost child is visited first.
    fn descend(&mut self, children: &'a [Symbol]) -> Option<Option<&'a Symbol>> {
        match children.last() {
            Some(last) if !self.is_last_visited(last) => {
                self.stack.extend(children.iter().rev());
                None
            },
            _ => Some(self.visit()),
        }
    }
}

impl<'a> Iterator for SymbolIter<'a> {
    type Item = &'a Symbol;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let symbol = *self.stack.last()?;
            let visited = match symbol {
                Symbol::Constant(_) | Symbol::Variable(_) => return self.visit(),
                Symbol::Sum(sum) => self.descend(sum.terms()),
                Symbol::Product(product) => self.descend(product.factors()),
                Symbol::Matrix(matrix) => self.descend(matrix.cells()),
            };
            if let Some(visited) = visited {
                return visited;
            }
        }
    }
}
