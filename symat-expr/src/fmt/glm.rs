use crate::{consts::Value, shape::Shape};
use super::{number, Formatter};

/// Renders trees as C++ expressions for the GLM library.
///
/// GLM matrices are column-major, so matrix cells are written out column by column. Underscores
/// in names are rendered as `.`, so that `camera_position` refers to a struct member.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlmFormatter;

impl Formatter for GlmFormatter {
    fn constant(&self, value: Value) -> String {
        let rendered = number(value);
        if value < 0.0 {
            self.parenthesis(&rendered)
        } else {
            rendered
        }
    }

    fn name(&self, name: &str) -> String {
        name.replace('_', ".")
    }

    fn matrix(&self, shape: Shape, cells: &[String]) -> String {
        let mut out = String::from("{\n");
        for col in 0..shape.cols {
            let column = (0..shape.rows)
                .filter_map(|row| cells.get(row * shape.cols + col))
                .map(String::as_str)
                .collect::<Vec<_>>();
            out.push_str("    ");
            out.push_str(&column.join(", "));
            out.push_str(",\n");
        }
        out.push_str("};");
        out
    }

    fn parenthesis(&self, inner: &str) -> String {
        format!("({})", inner)
    }

    fn plus(&self, left: &str, right: &str) -> String {
        format!("{} + {}", left, right)
    }

    fn minus(&self, left: &str, right: &str) -> String {
        format!("{} - {}", left, right)
    }

    fn times(&self, left: &str, right: &str) -> String {
        format!("{} * {}", left, right)
    }

    fn divide(&self, top: &str, bottom: &str) -> String {
        format!("{} / {}", top, bottom)
    }

    /// Squares are written out as a multiplication, everything else uses `pow`.
    fn power(&self, base: &str, exponent: &str) -> String {
        if exponent == "2" {
            format!("{} * {}", base, base)
        } else {
            format!("pow({}, {})", base, exponent)
        }
    }

    fn assign(&self, name: &str, value: &str) -> String {
        if value.ends_with(';') {
            format!("{} = {}\n", self.name(name), value)
        } else {
            format!("{} = {};\n", self.name(name), value)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::symbol::{Symbol, Variable};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn column_major() {
        let cells = ["a", "b", "c", "d"].map(String::from);
        assert_eq!(GlmFormatter.matrix(Shape::new(2, 2), &cells), "{\n    a, c,\n    b, d,\n};");
    }

    #[test]
    fn powers() {
        let squared = Symbol::Variable(Variable::with("pos_x", 1.0, 2.0));
        assert_eq!(squared.format(&GlmFormatter), "pos.x * pos.x");

        let cubed = Symbol::Variable(Variable::with("t", 2.0, 3.0));
        assert_eq!(cubed.format(&GlmFormatter), "2 * pow(t, 3)");
    }

    #[test]
    fn assignment() {
        assert_eq!(GlmFormatter.assign("m_a", "{\n};"), "m.a = {\n};\n");
        assert_eq!(GlmFormatter.assign("x", "1"), "x = 1;\n");
    }
}
