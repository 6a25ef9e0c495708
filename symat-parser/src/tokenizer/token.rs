use logos::Logos;
use std::ops::Range;

/// Every kind of token in the definition language.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    /// The postfix transpose operator.
    #[token("'")]
    Quote,

    #[token("=")]
    Assign,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("[")]
    OpenSquare,

    #[token("]")]
    CloseSquare,

    #[regex(r"[a-zA-Z][a-zA-Z_]*")]
    Name,

    /// A decimal number. `_` can be used to separate digits, and either the integer or the
    /// fractional part can be left out (`1.` and `.5`).
    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?")]
    #[regex(r"\.[0-9][0-9_]*")]
    Number,

    #[regex(r".", priority = 0)]
    Symbol,
}

impl TokenKind {
    /// Whitespace separates tokens and is otherwise ignored by the parser.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }

    /// A short description of the token, used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Add => "`+`",
            TokenKind::Sub => "`-`",
            TokenKind::Mul => "`*`",
            TokenKind::Div => "`/`",
            TokenKind::Quote => "`'`",
            TokenKind::Assign => "`=`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::OpenParen => "`(`",
            TokenKind::CloseParen => "`)`",
            TokenKind::OpenSquare => "`[`",
            TokenKind::CloseSquare => "`]`",
            TokenKind::Name => "a name",
            TokenKind::Number => "a number",
            TokenKind::Symbol => "an unknown character",
        }
    }
}

/// A token, borrowing its text from the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'source> {
    /// Byte range of the token in the source.
    pub span: Range<usize>,

    pub kind: TokenKind,

    /// The text of the token.
    pub lexeme: &'source str,
}

impl Token<'_> {
    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }
}
