use ariadne::Fmt;
use symat_attrs::ErrorKind;
use symat_error::EXPR;
use symat_expr::ExprError;
use crate::tokenizer::TokenKind;

/// Joins token descriptions for an error label.
fn describe_all(kinds: &[TokenKind]) -> String {
    kinds.iter().map(|kind| kind.describe()).collect::<Vec<_>>().join(", ")
}

/// The source ended in the middle of a definition.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of file",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// A token that does not fit the grammar at this point.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", describe_all(expected))],
    help = format!("found {}", found.describe()),
)]
pub struct UnexpectedToken {
    /// Kinds that would have been accepted.
    pub expected: &'static [TokenKind],

    pub found: TokenKind,
}

/// A character that is not part of the language was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unexpected character `{}`", character),
    labels = ["this character is not allowed here"],
    help = "names start with a letter and may only contain letters and `_`",
)]
pub struct UnexpectedCharacter {
    pub character: String,
}

/// A number literal could not be read.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid number `{}`", lexeme),
    labels = ["this number"],
)]
pub struct InvalidNumber {
    pub lexeme: String,
}

/// A name was not followed by `=` before the end of the source code.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unterminated name `{}`", name),
    labels = ["this name is never assigned a value"],
    help = format!("a definition looks like {}", "`name = expression;`".fg(EXPR)),
)]
pub struct UnterminatedName {
    pub name: String,
}

/// The same name was defined twice.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is defined more than once", name),
    labels = ["first defined here", "defined again here"],
    help = "each name can only be defined once; rename or remove one of the definitions",
)]
pub struct DuplicateDefinition {
    pub name: String,
}

/// A definition uses its own name in its value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is defined in terms of itself", name),
    labels = ["this definition"],
    help = format!("remove `{}` from the right-hand side", name.fg(EXPR)),
)]
pub struct SelfReference {
    pub name: String,
}

/// A row of a matrix literal has a different number of entries than the first row.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("expected row to have {} columns, found {}", expected, found),
    labels = [format!("this row has {} columns", found)],
    help = "every row of a matrix must have the same number of entries",
)]
pub struct RowLength {
    /// The number of entries in the first row.
    pub expected: usize,

    /// The number of entries in the offending row.
    pub found: usize,
}

/// A matrix literal with no entries, `[]`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "empty matrix",
    labels = ["this matrix has no entries"],
    help = format!("write the entries between the brackets, like {}", "`[1, 0; 0, 1]`".fg(EXPR)),
)]
pub struct EmptyMatrix;

/// The transpose operator was applied to something that is not a matrix literal.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "cannot transpose a value that is not a matrix",
    labels = ["this value", "transposed here"],
    help = "only matrix literals, like `[1, 2]'`, can be transposed",
)]
pub struct TransposeNonMatrix;

/// Combining values failed, for example because their shapes do not match.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = error.to_string(),
    labels = [format!("while evaluating this {}", "expression".fg(EXPR))],
)]
pub struct InvalidExpression {
    pub error: ExprError,
}
