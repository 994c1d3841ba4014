//! Token classes produced by the scanner and consumed by the builder.

use std::fmt;

/// Lexical class of a token.
///
/// Each class doubles as the identity of the recognizer that matches it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,
    String,
    Integer,
    Float,
    Boolean,
    Datetime,
    Whitespace,
    Comment,
    TableName,
    ArrayOfTables,
    NewLine,
    Key,
    Equal,
    ArrayLeftBrack,
    ArrayRightBrack,
    Comma,
}

impl TokenKind {
    /// Returns the display name of this token class.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::String => "String",
            TokenKind::Integer => "Integer",
            TokenKind::Float => "Float",
            TokenKind::Boolean => "Boolean",
            TokenKind::Datetime => "Datetime",
            TokenKind::Whitespace => "Whitespace",
            TokenKind::Comment => "Comment",
            TokenKind::TableName => "TableName",
            TokenKind::ArrayOfTables => "ArrayOfTables",
            TokenKind::NewLine => "NewLine",
            TokenKind::Key => "Key",
            TokenKind::Equal => "Equal",
            TokenKind::ArrayLeftBrack => "ArrayLeftBrack",
            TokenKind::ArrayRightBrack => "ArrayRightBrack",
            TokenKind::Comma => "Comma",
        }
    }

    /// True for the five scalar literal classes.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::Integer
                | TokenKind::Float
                | TokenKind::Boolean
                | TokenKind::Datetime
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
