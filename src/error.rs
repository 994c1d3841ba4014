//! Error types for parsing, editing and formatting documents.
//!
//! Errors fall into four groups:
//!
//! - **Lexical**: invalid UTF-8 ([`Error::Encoding`]) or a malformed literal of a
//!   token class that already committed ([`Error::InvalidToken`]).
//! - **Grammar**: no token class legal at this point matches the input
//!   ([`Error::Unexpected`], [`Error::UnexpectedEof`], [`Error::NestingTooDeep`]).
//! - **Semantic**: kind mismatches, duplicate declarations and range overflow
//!   raised while the document is built or edited.
//! - **Internal**: a builder invariant did not hold. These signal a bug, not bad input.
//!
//! Every error raised while parsing is wrapped in [`Error::Parse`], which carries the
//! 1-based line and column plus the full text of the offending line.
//!
//! ## Examples
//!
//! ```rust
//! use toml_layout::{parse, Error};
//!
//! let err = parse(b"[table]\n[table]\n").unwrap_err();
//! assert_eq!(err.line(), Some(2));
//! assert!(matches!(err.root(), Error::Redeclared(_)));
//! ```

use std::fmt;
use thiserror::Error;

use crate::token::TokenKind;

/// All errors produced by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error while reading a file or writing output
    #[error("IO error: {0}")]
    Io(String),

    /// The input is not valid UTF-8
    #[error("invalid UTF-8 encoding")]
    Encoding,

    /// A token class matched the start of the input but the rest is malformed
    #[error("invalid {0}")]
    InvalidToken(TokenKind),

    /// No token class of the current grammar stage matches
    #[error("unexpected input, expected one of: {expected}")]
    Unexpected { expected: String },

    /// Input ended where more tokens are required
    #[error("unexpected end of input, expected one of: {expected}")]
    UnexpectedEof { expected: String },

    /// Arrays nested deeper than the configured limit
    #[error("arrays nested deeper than {0} levels")]
    NestingTooDeep(usize),

    /// Kind mismatch between a value and the data written to it
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Integer literal or index outside the representable range
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// Path already declared with an incompatible kind
    #[error("duplicate definition of `{0}`")]
    Redeclared(String),

    /// Token sequence is legal but cannot describe a document
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// A builder invariant was violated
    #[error("internal error (this is a bug): {0}")]
    Internal(String),

    /// Any of the above with the position it was raised at
    #[error("{source} at line {line}, column {col}:\n{context}\n{}^", pad(.col))]
    Parse {
        line: usize,
        col: usize,
        context: String,
        #[source]
        source: Box<Error>,
    },

    /// Custom error raised through serde
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_layout::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error.
    pub fn io<T: fmt::Display>(msg: T) -> Self {
        Error::Io(msg.to_string())
    }

    pub(crate) fn internal<T: fmt::Display>(msg: T) -> Self {
        Error::Internal(msg.to_string())
    }

    pub(crate) fn not_supported<T: fmt::Display>(msg: T) -> Self {
        Error::NotSupported(msg.to_string())
    }

    pub(crate) fn out_of_range<T: fmt::Display>(msg: T) -> Self {
        Error::OutOfRange(msg.to_string())
    }

    pub(crate) fn redeclared<T: fmt::Display>(path: T) -> Self {
        Error::Redeclared(path.to_string())
    }

    pub(crate) fn invalid_format<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidFormat(msg.to_string())
    }

    pub(crate) fn at(self, line: usize, col: usize, context: String) -> Self {
        match self {
            err @ Error::Parse { .. } => err,
            err => Error::Parse {
                line,
                col,
                context,
                source: Box::new(err),
            },
        }
    }

    /// Returns the underlying error, looking through position information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toml_layout::{parse, Error};
    ///
    /// let err = parse(b"key = [1, \"x\"]").unwrap_err();
    /// assert!(matches!(err.root(), Error::Unexpected { .. }));
    /// ```
    #[must_use]
    pub fn root(&self) -> &Error {
        match self {
            Error::Parse { source, .. } => source.root(),
            err => err,
        }
    }

    /// 1-based line of a parse error.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// 1-based column of a parse error.
    #[must_use]
    pub fn column(&self) -> Option<usize> {
        match self {
            Error::Parse { col, .. } => Some(*col),
            _ => None,
        }
    }

    /// Full text of the line a parse error points at.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Error::Parse { context, .. } => Some(context),
            _ => None,
        }
    }

    /// True for errors that indicate a bug in this crate rather than bad input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self.root(), Error::Internal(_))
    }
}

fn pad(col: &usize) -> String {
    " ".repeat(col.saturating_sub(1))
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
