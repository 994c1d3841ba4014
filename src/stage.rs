//! Grammar stages and the driving loop.
//!
//! A [`Stage`] names the set of token classes legal at a point of the grammar. Each
//! stage maps to a static table of roles: a recognizer plus what happens to the
//! stage once that recognizer confirms. The [`Engine`] races all roles of the
//! current stage rune by rune and emits the first confirmed token.
//!
//! Array nesting is tracked on an explicit lift stack. Opening an array from a value
//! position pushes a lift that remembers the stage to return to; every nested `[`
//! raises its level and every `]` lowers it. When the level reaches zero the lift
//! is popped and the remembered stage resumes.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::options::ParseOptions;
use crate::recognizer::{step, Step};
use crate::scanner::{Rune, Scanner};
use crate::token::TokenKind;

/// A grammar position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Start of a line: comment, whitespace, newline, table header or key.
    Line,
    /// After a key: whitespace or `=`.
    AfterKey,
    /// After `=`: whitespace, `[` or a scalar.
    Value,
    /// After a value or table header: whitespace, comment, newline or EOF.
    EndOfLine,
    /// Inside an array that has no typed element yet.
    ArrayValue,
    /// After a nested array element: separator or `]`.
    ArraySeparator,
    /// Inside a typed array, expecting the next element of that class.
    TypedValue(TokenKind),
    /// Inside a typed array, after an element.
    TypedSeparator(TokenKind),
    /// Input fully consumed.
    End,
}

/// What a confirmed role does to the stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Next {
    Stay,
    Goto(Stage),
    /// Opens an outermost array and returns to the given stage once it closes.
    Lift(Stage),
    /// Opens a nested array.
    Nest,
    /// Closes the innermost array.
    Close,
}

#[derive(Clone, Copy, Debug)]
pub struct Role {
    pub token: TokenKind,
    pub next: Next,
}

const fn role(token: TokenKind, next: Next) -> Role {
    Role { token, next }
}

const WHITESPACE: Role = role(TokenKind::Whitespace, Next::Stay);
const NEWLINE: Role = role(TokenKind::NewLine, Next::Stay);
const COMMENT: Role = role(TokenKind::Comment, Next::Stay);
const CLOSE: Role = role(TokenKind::ArrayRightBrack, Next::Close);

static LINE: [Role; 7] = [
    role(TokenKind::Eof, Next::Goto(Stage::End)),
    WHITESPACE,
    NEWLINE,
    COMMENT,
    role(TokenKind::TableName, Next::Goto(Stage::EndOfLine)),
    role(TokenKind::ArrayOfTables, Next::Goto(Stage::EndOfLine)),
    role(TokenKind::Key, Next::Goto(Stage::AfterKey)),
];

static AFTER_KEY: [Role; 2] = [WHITESPACE, role(TokenKind::Equal, Next::Goto(Stage::Value))];

static VALUE: [Role; 7] = [
    WHITESPACE,
    role(TokenKind::ArrayLeftBrack, Next::Lift(Stage::EndOfLine)),
    role(TokenKind::String, Next::Goto(Stage::EndOfLine)),
    role(TokenKind::Boolean, Next::Goto(Stage::EndOfLine)),
    role(TokenKind::Integer, Next::Goto(Stage::EndOfLine)),
    role(TokenKind::Float, Next::Goto(Stage::EndOfLine)),
    role(TokenKind::Datetime, Next::Goto(Stage::EndOfLine)),
];

static END_OF_LINE: [Role; 4] = [
    role(TokenKind::Eof, Next::Goto(Stage::End)),
    WHITESPACE,
    COMMENT,
    role(TokenKind::NewLine, Next::Goto(Stage::Line)),
];

static ARRAY_VALUE: [Role; 10] = [
    WHITESPACE,
    COMMENT,
    NEWLINE,
    role(TokenKind::ArrayLeftBrack, Next::Nest),
    CLOSE,
    role(TokenKind::String, Next::Goto(Stage::TypedSeparator(TokenKind::String))),
    role(TokenKind::Boolean, Next::Goto(Stage::TypedSeparator(TokenKind::Boolean))),
    role(TokenKind::Integer, Next::Goto(Stage::TypedSeparator(TokenKind::Integer))),
    role(TokenKind::Float, Next::Goto(Stage::TypedSeparator(TokenKind::Float))),
    role(TokenKind::Datetime, Next::Goto(Stage::TypedSeparator(TokenKind::Datetime))),
];

static ARRAY_SEPARATOR: [Role; 5] = [
    WHITESPACE,
    COMMENT,
    NEWLINE,
    role(TokenKind::Comma, Next::Goto(Stage::ArrayValue)),
    CLOSE,
];

const fn typed_value(token: TokenKind) -> [Role; 5] {
    [
        WHITESPACE,
        COMMENT,
        NEWLINE,
        CLOSE,
        role(token, Next::Goto(Stage::TypedSeparator(token))),
    ]
}

const fn typed_separator(token: TokenKind) -> [Role; 5] {
    [
        WHITESPACE,
        COMMENT,
        NEWLINE,
        role(TokenKind::Comma, Next::Goto(Stage::TypedValue(token))),
        CLOSE,
    ]
}

static STRING_VALUE: [Role; 5] = typed_value(TokenKind::String);
static BOOLEAN_VALUE: [Role; 5] = typed_value(TokenKind::Boolean);
static INTEGER_VALUE: [Role; 5] = typed_value(TokenKind::Integer);
static FLOAT_VALUE: [Role; 5] = typed_value(TokenKind::Float);
static DATETIME_VALUE: [Role; 5] = typed_value(TokenKind::Datetime);

static STRING_SEPARATOR: [Role; 5] = typed_separator(TokenKind::String);
static BOOLEAN_SEPARATOR: [Role; 5] = typed_separator(TokenKind::Boolean);
static INTEGER_SEPARATOR: [Role; 5] = typed_separator(TokenKind::Integer);
static FLOAT_SEPARATOR: [Role; 5] = typed_separator(TokenKind::Float);
static DATETIME_SEPARATOR: [Role; 5] = typed_separator(TokenKind::Datetime);

const MAX_ROLES: usize = 10;

impl Stage {
    /// Roles of this stage in race order.
    #[must_use]
    pub fn roles(self) -> &'static [Role] {
        match self {
            Stage::Line => &LINE,
            Stage::AfterKey => &AFTER_KEY,
            Stage::Value => &VALUE,
            Stage::EndOfLine => &END_OF_LINE,
            Stage::ArrayValue => &ARRAY_VALUE,
            Stage::ArraySeparator => &ARRAY_SEPARATOR,
            Stage::TypedValue(token) => match token {
                TokenKind::String => &STRING_VALUE,
                TokenKind::Boolean => &BOOLEAN_VALUE,
                TokenKind::Integer => &INTEGER_VALUE,
                TokenKind::Float => &FLOAT_VALUE,
                TokenKind::Datetime => &DATETIME_VALUE,
                _ => &[],
            },
            Stage::TypedSeparator(token) => match token {
                TokenKind::String => &STRING_SEPARATOR,
                TokenKind::Boolean => &BOOLEAN_SEPARATOR,
                TokenKind::Integer => &INTEGER_SEPARATOR,
                TokenKind::Float => &FLOAT_SEPARATOR,
                TokenKind::Datetime => &DATETIME_SEPARATOR,
                _ => &[],
            },
            Stage::End => &[],
        }
    }

    fn expected(self) -> String {
        self.roles()
            .iter()
            .map(|r| r.token.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Lift {
    back: Stage,
    level: usize,
}

/// Tokenizer that enforces the grammar while it scans.
#[derive(Debug)]
pub struct Engine<'a> {
    scanner: Scanner<'a>,
    stage: Stage,
    lifts: Vec<Lift>,
    max_depth: usize,
}

impl<'a> Engine<'a> {
    #[must_use]
    pub fn new(input: &'a [u8], options: &ParseOptions) -> Self {
        Engine {
            scanner: Scanner::new(input),
            stage: Stage::Line,
            lifts: Vec::new(),
            max_depth: options.max_array_depth,
        }
    }

    /// Current grammar stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Scans the whole input, handing every token and its trimmed text to `emit`.
    ///
    /// The final token is always [`TokenKind::Eof`]. The first error, from the
    /// scanner, the grammar or `emit` itself, stops the run and is returned with
    /// its position.
    pub fn run<F>(&mut self, mut emit: F) -> Result<()>
    where
        F: FnMut(TokenKind, &str) -> Result<()>,
    {
        while self.stage != Stage::End {
            let role = self.race()?;
            let at = self.scanner.checkpoint();
            let text = self.scanner.take().map_err(|e| self.locate(e, at))?.trim();
            trace!(token = %role.token, text, "token");

            emit(role.token, text).map_err(|e| self.locate(e, at))?;

            self.advance(role.next).map_err(|e| self.locate(e, at))?;
        }
        Ok(())
    }

    /// Offers runes to the roles of the current stage until one confirms.
    fn race(&mut self) -> Result<Role> {
        let roles = self.stage.roles();
        if roles.is_empty() || roles.len() > MAX_ROLES {
            return Err(Error::internal(format!("no roles for {:?}", self.stage)));
        }

        let mut states = [0u8; MAX_ROLES];
        let mut out = [false; MAX_ROLES];
        let mut racing = 0usize;

        loop {
            let rune = self.scanner.next();
            let pos = self.scanner.position();
            if rune == Rune::Invalid {
                return Err(self.locate(Error::Encoding, pos));
            }

            for (i, role) in roles.iter().enumerate() {
                if out[i] {
                    continue;
                }
                match step(role.token, rune, states[i], racing > 0) {
                    Step::Maybe(state) => {
                        if states[i] == 0 {
                            racing += 1;
                        }
                        states[i] = state;
                    }
                    Step::Yes => return Ok(*role),
                    Step::No => {
                        if states[i] != 0 {
                            racing -= 1;
                        }
                        out[i] = true;
                    }
                    Step::Invalid => {
                        return Err(self.locate(Error::InvalidToken(role.token), pos));
                    }
                }
            }

            let at_end = self.scanner.at_eof();
            if racing == 0 || at_end {
                let expected = self.stage.expected();
                let err = if at_end {
                    Error::UnexpectedEof { expected }
                } else {
                    Error::Unexpected { expected }
                };
                return Err(self.locate(err, pos));
            }
        }
    }

    fn advance(&mut self, next: Next) -> Result<()> {
        match next {
            Next::Stay => {}
            Next::Goto(stage) => self.stage = stage,
            Next::Lift(back) => {
                if self.max_depth == 0 {
                    return Err(Error::NestingTooDeep(self.max_depth));
                }
                self.lifts.push(Lift { back, level: 1 });
                debug!(back = ?back, "array opened");
                self.stage = Stage::ArrayValue;
            }
            Next::Nest => {
                let lift = self
                    .lifts
                    .last_mut()
                    .ok_or_else(|| Error::internal("nested array without an open array"))?;
                if lift.level >= self.max_depth {
                    return Err(Error::NestingTooDeep(self.max_depth));
                }
                lift.level += 1;
                debug!(level = lift.level, "nested array opened");
                self.stage = Stage::ArrayValue;
            }
            Next::Close => {
                let lift = self
                    .lifts
                    .last_mut()
                    .ok_or_else(|| Error::internal("array closed without an open array"))?;
                lift.level -= 1;
                if lift.level == 0 {
                    let back = lift.back;
                    self.lifts.pop();
                    debug!(back = ?back, "array closed");
                    self.stage = back;
                } else {
                    self.stage = Stage::ArraySeparator;
                }
            }
        }
        Ok(())
    }

    fn locate(&self, err: Error, pos: usize) -> Error {
        let (line, col, context) = self.scanner.location(pos);
        err.at(line, col, context)
    }
}

/// Collects the token stream of `input` without building a document.
///
/// # Examples
///
/// ```rust
/// use toml_layout::{tokenize, ParseOptions, TokenKind};
///
/// let tokens = tokenize(b"key = 1", &ParseOptions::default()).unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|(k, _)| *k).collect();
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::Key,
///         TokenKind::Whitespace,
///         TokenKind::Equal,
///         TokenKind::Whitespace,
///         TokenKind::Integer,
///         TokenKind::Eof,
///     ]
/// );
/// ```
pub fn tokenize(input: &[u8], options: &ParseOptions) -> Result<Vec<(TokenKind, String)>> {
    let mut tokens = Vec::new();
    Engine::new(input, options).run(|kind, text| {
        tokens.push((kind, text.to_string()));
        Ok(())
    })?;
    Ok(tokens)
}
