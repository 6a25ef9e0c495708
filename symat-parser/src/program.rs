use crate::parser::{definition::Definition, error::{kind, Error}, Parser};
use levenshtein::levenshtein;
use log::debug;
use std::{collections::BTreeMap, fmt, mem, ops::Range};
use symat_expr::{fmt::Formatter, Symbol};

/// A parsed program: every definition, with the other definitions it mentions substituted in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    definitions: BTreeMap<String, Symbol>,
}

impl Program {
    /// Parses a program.
    ///
    /// After all definitions are read, every definition `A` is substituted into every other
    /// definition `B` that mentions it, for each ordered pair in name order. Each definition is
    /// then optimized and must end up with a valid shape. A definition that mentions itself is an
    /// error, but longer cycles are not: their names are left as variables.
    pub fn parse(source: &str) -> Result<Self, Error> {
        let mut parser = Parser::new(source);
        let mut definitions = BTreeMap::new();
        let mut spans = BTreeMap::<String, Range<usize>>::new();

        while !parser.at_end() {
            let definition = parser.try_parse::<Definition>()?;
            debug!("parsed definition `{}`", definition.name);

            if let Some(first) = spans.get(&definition.name) {
                return Err(parser.error_at(
                    vec![first.clone(), definition.name_span],
                    kind::DuplicateDefinition { name: definition.name },
                ));
            }
            if definition.value.find_free_names().contains(&definition.name) {
                return Err(parser.error_at(
                    vec![definition.span],
                    kind::SelfReference { name: definition.name },
                ));
            }

            spans.insert(definition.name.clone(), definition.span);
            definitions.insert(definition.name, definition.value);
        }

        let invalid = |name: &str, error| {
            let span = spans.get(name).cloned().unwrap_or_default();
            parser.error_at(vec![span], kind::InvalidExpression { error })
        };

        let names = definitions.keys().cloned().collect::<Vec<_>>();
        for source_name in &names {
            // the source is never a target in its own pass, so its value stays fixed
            let Some(value) = definitions.get(source_name).cloned() else {
                continue;
            };

            for target_name in names.iter().filter(|name| *name != source_name) {
                let Some(target) = definitions.get_mut(target_name) else {
                    continue;
                };
                if !target.find_free_names().contains(source_name) {
                    continue;
                }

                debug!("substituting `{}` into `{}`", source_name, target_name);
                *target = mem::take(target)
                    .substitute(source_name, &value)
                    .map_err(|error| invalid(target_name.as_str(), error))?;
            }
        }

        for (name, value) in definitions.iter_mut() {
            *value = mem::take(value)
                .optimize()
                .map_err(|error| invalid(name.as_str(), error))?;
            value.shape().map_err(|error| invalid(name.as_str(), error))?;
            debug!("optimized definition `{}`: {}", name, value);
        }

        Ok(Self { definitions })
    }

    /// Returns the value of the definition with the given name.
    pub fn get(&self, name: &str) -> Result<&Symbol, UnknownSymbol> {
        self.definitions.get(name).ok_or_else(|| UnknownSymbol {
            name: name.to_string(),
            similar: self.similar_names(name),
        })
    }

    /// Returns the defined names whose edit distance to `name` is less than 2.
    fn similar_names(&self, name: &str) -> Vec<String> {
        self.definitions
            .keys()
            .filter(|candidate| levenshtein(candidate, name) < 2)
            .cloned()
            .collect()
    }

    /// Returns the defined names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Returns the definitions, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.definitions.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Renders a single definition as an assignment.
    pub fn format_definition(
        &self,
        name: &str,
        formatter: &dyn Formatter,
    ) -> Result<String, UnknownSymbol> {
        let value = self.get(name)?;
        Ok(formatter.assign(name, &value.format(formatter)))
    }

    /// Renders every definition as an assignment, in name order.
    pub fn format(&self, formatter: &dyn Formatter) -> String {
        self.iter()
            .map(|(name, value)| formatter.assign(name, &value.format(formatter)))
            .collect()
    }
}

/// A name was looked up that the program does not define.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSymbol {
    /// The name that was looked up.
    pub name: String,

    /// Defined names that are spelled similarly.
    pub similar: Vec<String>,
}

impl fmt::Display for UnknownSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown symbol `{}`", self.name)?;
        if !self.similar.is_empty() {
            let similar = self.similar
                .iter()
                .map(|name| format!("`{}`", name))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "; did you mean {}?", similar)?;
        }
        Ok(())
    }
}

impl std::error::Error for UnknownSymbol {}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use super::*;
    use symat_expr::{fmt::{GlmFormatter, LatexFormatter, PlainFormatter}, ExprError, Op, Shape};

    fn constant(program: &Program, name: &str) -> f64 {
        program.get(name).unwrap().as_constant().unwrap()
    }

    #[test]
    fn single_definition() {
        let program = Program::parse("answer = 1 + 2;").unwrap();
        assert_float_absolute_eq!(constant(&program, "answer"), 3.0);
        assert_eq!(program.names().collect::<Vec<_>>(), vec!["answer"]);
    }

    #[test]
    fn empty_program() {
        let program = Program::parse(" \n ").unwrap();
        assert!(program.is_empty());
        assert_eq!(program.format(&PlainFormatter::new(false)), "");
    }

    #[test]
    fn substitutes_other_definitions() {
        let program = Program::parse("y = 3 * x;\nx = 2;").unwrap();
        assert_float_absolute_eq!(constant(&program, "y"), 6.0);
        assert_float_absolute_eq!(constant(&program, "x"), 2.0);
    }

    #[test]
    fn substitution_keeps_powers() {
        let program = Program::parse("a = 2 * b * b; b = c + 1;").unwrap();
        let a = program.get("a").unwrap();
        assert_eq!(a.find_free_names().into_iter().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn matrix_product_with_identity() {
        let program = Program::parse("A=[a,b;c,d];B=[1,0;0,1];C=A*B;").unwrap();
        assert_eq!(program.get("C").unwrap(), program.get("A").unwrap());
        assert_eq!(
            program.format_definition("C", &PlainFormatter::new(false)).unwrap(),
            "C=[a,b;c,d];",
        );
    }

    #[test]
    fn matrix_product_shapes() {
        let program = Program::parse("M = [1, 2; 3, 4]; v = [5; 6]; r = M * v;").unwrap();
        let r = program.get("r").unwrap().as_matrix().unwrap();
        assert_eq!(r.shape(), Shape::new(2, 1));
        assert_eq!(r.get(0, 0), Some(&Symbol::constant(17.0)));
        assert_eq!(r.get(1, 0), Some(&Symbol::constant(39.0)));
    }

    #[test]
    fn mismatched_definitions() {
        let err = Program::parse("A = [1, 0; 0, 1];\nB = [1, 2, 3];\nC = A + B;").unwrap_err();
        assert_eq!(
            err.downcast_kind::<kind::InvalidExpression>(),
            Some(&kind::InvalidExpression {
                error: ExprError::DimensionMismatch {
                    op: Op::Add,
                    left: Shape::new(2, 2),
                    right: Shape::new(1, 3),
                },
            }),
        );
        assert_eq!((err.line, err.col), (3, 1));
    }

    #[test]
    fn duplicate_definition() {
        let err = Program::parse("x = 1;\nx = 2;").unwrap_err();
        assert_eq!(
            err.downcast_kind::<kind::DuplicateDefinition>(),
            Some(&kind::DuplicateDefinition { name: "x".to_string() }),
        );
        assert_eq!(err.spans, vec![0..6, 7..8]);
    }

    #[test]
    fn self_reference() {
        let err = Program::parse("x = x + 1;").unwrap_err();
        assert_eq!(
            err.downcast_kind::<kind::SelfReference>(),
            Some(&kind::SelfReference { name: "x".to_string() }),
        );
    }

    #[test]
    fn cycles_stay_free() {
        let program = Program::parse("a = 2 * b; b = a;").unwrap();
        assert!(program.get("a").unwrap().find_free_names().contains("b"));
        assert!(program.get("b").unwrap().find_free_names().contains("b"));
    }

    #[test]
    fn unknown_symbol() {
        let program = Program::parse("alpha = 1; beta = 2;").unwrap();
        let err = program.get("alph").unwrap_err();
        assert_eq!(err, UnknownSymbol {
            name: "alph".to_string(),
            similar: vec!["alpha".to_string()],
        });
        assert_eq!(err.to_string(), "unknown symbol `alph`; did you mean `alpha`?");

        let err = program.get("gamma").unwrap_err();
        assert!(err.similar.is_empty());
        assert_eq!(err.to_string(), "unknown symbol `gamma`");
    }

    #[test]
    fn formats_every_definition() {
        let program = Program::parse("b = [1, 2]; a = -x / 2;").unwrap();
        assert_eq!(program.format(&PlainFormatter::new(false)), "a=(-0.5)*x;b=[1,2];");
        assert_eq!(
            program.format(&LatexFormatter),
            "a = -0.5 x\nb = \\begin{bmatrix} 1 & 2 \\end{bmatrix}\n",
        );
        assert_eq!(
            program.format_definition("b", &GlmFormatter).unwrap(),
            "b = {\n    1,\n    2,\n};\n",
        );
    }
}
