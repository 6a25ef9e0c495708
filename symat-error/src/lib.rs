//! User-facing errors: the [`ErrorKind`] trait implemented by every kind of error, and [`Error`],
//! which attaches a kind to the spans of source code it is about.

#[cfg(test)]
extern crate self as symat_error;

use ariadne::{Color, Report, Source};
use std::{any::Any, fmt::{self, Debug, Display}, io::{self, Write}, ops::Range};

/// Highlight color for code fragments inside messages and labels.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// The text of an error: its message, labels and help.
///
/// This trait is usually derived with `symat_attrs::ErrorKind`.
pub trait ErrorKind: Debug + Send {
    /// Returns the error as [`Any`], so that callers can downcast to a specific kind.
    fn as_any(&self) -> &dyn Any;

    /// The one-line message describing this error.
    fn message(&self) -> String;

    /// Builds an `ariadne` report, attaching the labels to `spans` in order.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error kind, with the source spans its labels point at.
#[derive(Debug)]
pub struct Error {
    /// Spans for the labels of `kind`, in label order.
    pub spans: Vec<Range<usize>>,

    /// What went wrong.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Boxes `kind` into an error at `spans`.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Returns the kind of this error as `T`, if it is one.
    pub fn downcast_kind<T: ErrorKind + 'static>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    /// Builds the report for this error.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Writes the report for this error to the given writer, using `input` as the source code.
    pub fn write_report<W: Write>(&self, src_id: &str, input: &str, writer: W) -> io::Result<()> {
        self.build_report(src_id).write((src_id, Source::from(input)), writer)
    }

    /// Report this error to stderr.
    ///
    /// The `ariadne` crate's [`Report`] type does not have a `Display` implementation, so we can
    /// only use its `eprint` method to print to stderr.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) -> io::Result<()> {
        self.build_report(src_id).eprint((src_id, Source::from(input)))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.message())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use symat_attrs::ErrorKind;
    use super::*;

    #[derive(Debug, ErrorKind)]
    #[error(
        message = format!("`{}` went wrong", name),
        labels = ["right here"],
        help = "try something else",
    )]
    struct Oops {
        name: String,
    }

    #[derive(Debug, ErrorKind)]
    #[error(message = "plain")]
    struct Plain;

    #[test]
    fn message_uses_fields() {
        let err = Error::new(vec![4..5], Oops { name: "x".to_string() });
        assert_eq!(err.to_string(), "`x` went wrong");
    }

    #[test]
    fn downcast() {
        let err = Error::new(vec![0..1], Plain);
        assert!(err.downcast_kind::<Plain>().is_some());
        assert!(err.downcast_kind::<Oops>().is_none());
    }

    #[test]
    fn report_contains_labels() {
        let input = "abc = x + ;";
        let err = Error::new(vec![4..5], Oops { name: "x".to_string() });
        let mut out = Vec::new();
        err.write_report("input", input, &mut out).unwrap();

        let out = String::from_utf8(strip_ansi_escapes::strip(out)).unwrap();
        assert!(out.contains("`x` went wrong"));
        assert!(out.contains("right here"));
        assert!(out.contains("try something else"));
    }
}
