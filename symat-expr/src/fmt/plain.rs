use crate::{consts::Value, shape::Shape};
use super::{number, Formatter};

const TAB: &str = "    ";

/// Renders trees with the operators and matrix syntax of the definition language. Powers are
/// written with `^`, which the definition language has no token for.
///
/// In pretty mode, operators are surrounded by spaces, each matrix row goes on its own line, and
/// each definition ends with a newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter {
    pretty: bool,
}

impl PlainFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn operator(&self, left: &str, op: &str, right: &str) -> String {
        if self.pretty {
            format!("{} {} {}", left, op, right)
        } else {
            format!("{}{}{}", left, op, right)
        }
    }
}

impl Formatter for PlainFormatter {
    fn constant(&self, value: Value) -> String {
        let rendered = number(value);
        if value < 0.0 {
            self.parenthesis(&rendered)
        } else {
            rendered
        }
    }

    fn name(&self, name: &str) -> String {
        name.to_string()
    }

    fn matrix(&self, shape: Shape, cells: &[String]) -> String {
        let comma = if self.pretty { ", " } else { "," };
        let mut out = String::from("[");
        for (i, row) in cells.chunks(shape.cols.max(1)).enumerate() {
            if self.pretty {
                out.push('\n');
                out.push_str(TAB);
            }
            out.push_str(&row.join(comma));
            if i + 1 < shape.rows {
                out.push(';');
            }
        }
        if self.pretty {
            out.push('\n');
        }
        out.push(']');
        out
    }

    fn parenthesis(&self, inner: &str) -> String {
        if self.pretty {
            format!("( {} )", inner)
        } else {
            format!("({})", inner)
        }
    }

    fn plus(&self, left: &str, right: &str) -> String {
        self.operator(left, "+", right)
    }

    fn minus(&self, left: &str, right: &str) -> String {
        self.operator(left, "-", right)
    }

    fn times(&self, left: &str, right: &str) -> String {
        self.operator(left, "*", right)
    }

    fn divide(&self, top: &str, bottom: &str) -> String {
        self.operator(top, "/", bottom)
    }

    fn power(&self, base: &str, exponent: &str) -> String {
        format!("{}^{}", base, exponent)
    }

    fn assign(&self, name: &str, value: &str) -> String {
        if self.pretty {
            format!("{} = {};\n", name, value)
        } else {
            format!("{}={};", name, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn compact_and_pretty() {
        let compact = PlainFormatter::new(false);
        let pretty = PlainFormatter::new(true);
        assert_eq!(compact.times("a", "b"), "a*b");
        assert_eq!(pretty.times("a", "b"), "a * b");
        assert_eq!(compact.assign("x", "1"), "x=1;");
        assert_eq!(pretty.assign("x", "1"), "x = 1;\n");
        assert_eq!(pretty.parenthesis("a"), "( a )");
    }

    #[test]
    fn row_vector() {
        let cells = ["1", "2", "3"].map(String::from);
        assert_eq!(PlainFormatter::new(false).matrix(Shape::new(1, 3), &cells), "[1,2,3]");
    }
}
