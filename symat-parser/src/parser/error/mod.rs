pub mod kind;

use symat_error::ErrorKind;
use std::{fmt, ops::Range};

/// A parsing error, located both by span and by line and column.
#[derive(Debug)]
pub struct Error {
    /// Spans for the labels of `kind`, in label order.
    pub spans: Vec<Range<usize>>,

    /// What went wrong.
    pub kind: Box<dyn ErrorKind>,

    /// The line of the start of the first span, starting from 1.
    pub line: usize,

    /// The column of the start of the first span, in characters and starting from 1.
    pub col: usize,
}

impl Error {
    /// Creates a new error with the given spans and kind, locating it within `source`.
    pub fn new(source: &str, spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        let offset = spans.first().map_or(0, |span| span.start);
        let (line, col) = location(source, offset);
        Self { spans, kind: Box::new(kind), line, col }
    }

    /// Returns the kind of this error as `T`, if it is one.
    pub fn downcast_kind<T: ErrorKind + 'static>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }
}

/// Returns the line and column of the byte `offset` in `source`, both starting from 1.
fn location(source: &str, offset: usize) -> (usize, usize) {
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let col = before.rsplit('\n').next().map_or(0, |rest| rest.chars().count()) + 1;
    (line, col)
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at {}:{}: {}", self.line, self.col, self.kind.message())
    }
}

impl std::error::Error for Error {}

/// Drops the line and column, keeping what is needed to render a report.
impl From<Error> for symat_error::Error {
    fn from(err: Error) -> Self {
        symat_error::Error { spans: err.spans, kind: err.kind }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn locations() {
        let source = "a = 1;\nbb = 2 $;\n";
        assert_eq!(location(source, 0), (1, 1));
        assert_eq!(location(source, 4), (1, 5));
        assert_eq!(location(source, 7), (2, 1));
        assert_eq!(location(source, 14), (2, 8));
        assert_eq!(location(source, 100), (3, 1));
    }

    #[test]
    fn display_includes_location() {
        let err = Error::new("x = 1 $ 2;", vec![6..7], kind::UnexpectedCharacter {
            character: "$".to_string(),
        });
        assert_eq!(err.to_string(), "parse error at 1:7: unexpected character `$`");
    }
}
